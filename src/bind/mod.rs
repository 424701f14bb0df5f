// src/bind/mod.rs
//
// The one control-flow pattern the site repeats: a filter widget's value
// changes, the chart is recomputed from the immutable table, and the host
// replaces the displayed figure. Synchronous, no debounce, no queue; each
// new value fully supersedes the last.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::chart::{city_detail_chart, median_time_chart, ChartSpec};
use crate::dataset::PermitTable;

/// Current value of a filter widget, snapshotted per recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Checklist: any subset of the table's cities. Empty is valid.
    Cities(BTreeSet<String>),
    /// Dropdown: exactly one city.
    City(String),
}

impl Selection {
    pub fn cities<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Cities(names.into_iter().map(Into::into).collect())
    }

    pub fn city(name: impl Into<String>) -> Self {
        Self::City(name.into())
    }
}

/// Pure recompute: filter the table to the selection and build the matching
/// chart. Total over all selections; an empty or unknown selection produces
/// an empty chart rather than an error.
pub fn recompute(table: &PermitTable, selection: &Selection) -> ChartSpec {
    match selection {
        Selection::Cities(cities) => median_time_chart(table, cities),
        Selection::City(city) => city_detail_chart(table, city),
    }
}

/// Where recomputed figures go. The real page host renders them; tests and
/// the site builder capture them.
pub trait GraphHost {
    fn replace_figure(&mut self, graph_id: &str, figure: &ChartSpec);
}

/// Binds one graph to one filter widget.
///
/// Two states: Idle (the held chart reflects the last committed selection)
/// and, transiently inside `apply`, Recomputing. The transition is
/// synchronous and carries no partial state; `apply` returns with the new
/// chart committed and pushed to the host.
pub struct Binder {
    table: Arc<PermitTable>,
    graph_id: String,
    current: ChartSpec,
}

impl Binder {
    /// Register a graph with its initial selection; the initial chart is
    /// computed immediately, so the binder never holds a stale figure.
    pub fn new(table: Arc<PermitTable>, graph_id: impl Into<String>, initial: &Selection) -> Self {
        let current = recompute(&table, initial);
        Self {
            table,
            graph_id: graph_id.into(),
            current,
        }
    }

    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    /// The chart for the last committed selection.
    pub fn chart(&self) -> &ChartSpec {
        &self.current
    }

    /// Handle a widget value change: recompute from the table snapshot and
    /// replace the displayed figure.
    pub fn apply(&mut self, selection: &Selection, host: &mut dyn GraphHost) -> &ChartSpec {
        debug!(graph = %self.graph_id, ?selection, "recomputing");
        self.current = recompute(&self.table, selection);
        host.replace_figure(&self.graph_id, &self.current);
        &self.current
    }
}
