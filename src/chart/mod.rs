// src/chart/mod.rs
//
// Pure chart construction: (table, filter criteria) -> ChartSpec. Nothing in
// here touches I/O or mutable state; every figure is rebuilt from scratch.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;

use crate::dataset::PermitTable;

/// Display name for the median column, renamed from the raw dataset header.
pub const MEDIAN_DAYS_LABEL: &str = "Median Permit Issue Time (Days)";
pub const APPLICATION_COUNT_LABEL: &str = "Applications (Trailing 365 Days)";
pub const DATE_LABEL: &str = "Date";

const SF_PERMIT_TITLE: &str = "Median New Single Family Permit Issue Time";

/// Which y-axis a series is plotted against. Secondary only appears on the
/// combined single-city chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub axis: YAxis,
    pub points: Vec<Point>,
}

/// A complete line-chart description. Stateless and serializable; the page
/// host (or the site builder) turns it into an actual rendered figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Label for the right-hand axis, present only on combined charts.
    pub y2_label: Option<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// Render as a Plotly figure: `{ "data": [...], "layout": {...} }`.
    pub fn to_plotly(&self) -> Value {
        let data: Vec<Value> = self
            .series
            .iter()
            .map(|s| {
                json!({
                    "type": "scatter",
                    "mode": "lines",
                    "line": { "shape": "linear" },
                    "name": s.name,
                    "x": s.points.iter().map(|p| p.date.to_string()).collect::<Vec<_>>(),
                    "y": s.points.iter().map(|p| p.value).collect::<Vec<_>>(),
                    "yaxis": match s.axis {
                        YAxis::Primary => "y",
                        YAxis::Secondary => "y2",
                    },
                })
            })
            .collect();

        let mut layout = json!({
            "title": self.title,
            "xaxis": { "title": self.x_label },
            "yaxis": { "title": self.y_label },
        });
        if let Some(y2) = &self.y2_label {
            layout["yaxis2"] = json!({
                "title": y2,
                "overlaying": "y",
                "side": "right",
            });
        }

        json!({ "data": data, "layout": layout })
    }
}

/// The checklist chart: one series per selected city that is present in the
/// table, x = date, y = median issue time.
///
/// Cities absent from the table are silently ignored and an empty selection
/// yields a chart with no series. Series are ordered by city name and points
/// by date, so the output is independent of input row order.
pub fn median_time_chart(table: &PermitTable, selected: &BTreeSet<String>) -> ChartSpec {
    let series = selected
        .iter()
        .filter_map(|city| {
            let points = city_points(table, city, |r| r.median_issue_days);
            if points.is_empty() {
                None
            } else {
                Some(Series {
                    name: city.clone(),
                    axis: YAxis::Primary,
                    points,
                })
            }
        })
        .collect();

    ChartSpec {
        title: SF_PERMIT_TITLE.to_string(),
        x_label: DATE_LABEL.to_string(),
        y_label: MEDIAN_DAYS_LABEL.to_string(),
        y2_label: None,
        series,
    }
}

/// A single-city variant of the checklist chart, used for the static
/// per-city figures embedded in the narrative.
pub fn single_city_chart(table: &PermitTable, city: &str) -> ChartSpec {
    let mut selected = BTreeSet::new();
    selected.insert(city.to_string());
    let mut spec = median_time_chart(table, &selected);
    spec.title = format!("{SF_PERMIT_TITLE} In {city}");
    spec
}

/// The dropdown chart: for one city, the median-time series against the left
/// axis and the application-count series against the right axis.
///
/// A city with no rows yields a chart with no series, same as an empty
/// checklist selection.
pub fn city_detail_chart(table: &PermitTable, city: &str) -> ChartSpec {
    let medians = city_points(table, city, |r| r.median_issue_days);
    let counts = city_points(table, city, |r| r.application_count as f64);

    let mut series = Vec::new();
    if !medians.is_empty() {
        series.push(Series {
            name: MEDIAN_DAYS_LABEL.to_string(),
            axis: YAxis::Primary,
            points: medians,
        });
        series.push(Series {
            name: APPLICATION_COUNT_LABEL.to_string(),
            axis: YAxis::Secondary,
            points: counts,
        });
    }

    ChartSpec {
        title: format!("{SF_PERMIT_TITLE} In {city}"),
        x_label: DATE_LABEL.to_string(),
        y_label: MEDIAN_DAYS_LABEL.to_string(),
        y2_label: Some(APPLICATION_COUNT_LABEL.to_string()),
        series,
    }
}

fn city_points(table: &PermitTable, city: &str, value: impl Fn(&crate::dataset::PermitRecord) -> f64) -> Vec<Point> {
    let mut points: Vec<Point> = table
        .records()
        .iter()
        .filter(|r| r.city == city)
        .map(|r| Point {
            date: r.date,
            value: value(r),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PermitRecord;

    fn rec(city: &str, date: &str, median: f64, count: i64) -> PermitRecord {
        PermitRecord {
            city: city.to_string(),
            date: date.parse().unwrap(),
            median_issue_days: median,
            application_count: count,
        }
    }

    fn fixture() -> PermitTable {
        // Bellevue listed first to check order independence.
        PermitTable::from_records(vec![
            rec("Bellevue", "2020-01-01", 80.0, 3),
            rec("Kirkland", "2020-01-01", 100.0, 5),
        ])
    }

    fn cities(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn series_set_is_selection_intersected_with_table() {
        let table = fixture();
        let spec = median_time_chart(&table, &cities(&["Kirkland", "Tacoma"]));
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Kirkland"]);
    }

    #[test]
    fn empty_selection_yields_empty_chart() {
        let table = fixture();
        let spec = median_time_chart(&table, &BTreeSet::new());
        assert!(spec.series.is_empty());
        // Still a well-formed figure.
        let fig = spec.to_plotly();
        assert_eq!(fig["data"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn single_selection_has_one_series_one_point() {
        let table = fixture();
        let spec = median_time_chart(&table, &cities(&["Kirkland"]));
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].name, "Kirkland");
        assert_eq!(
            spec.series[0].points,
            [Point {
                date: "2020-01-01".parse().unwrap(),
                value: 100.0
            }]
        );
    }

    #[test]
    fn two_cities_two_series_independent_of_row_order() {
        let table = fixture();
        let reversed = PermitTable::from_records(vec![
            rec("Kirkland", "2020-01-01", 100.0, 5),
            rec("Bellevue", "2020-01-01", 80.0, 3),
        ]);
        let selection = cities(&["Kirkland", "Bellevue"]);

        let a = median_time_chart(&table, &selection);
        let b = median_time_chart(&reversed, &selection);
        assert_eq!(a, b);
        assert_eq!(a.series.len(), 2);
        assert!(a.series.iter().all(|s| s.points.len() == 1));
    }

    #[test]
    fn recompute_is_idempotent() {
        let table = fixture();
        let selection = cities(&["Kirkland", "Bellevue"]);
        assert_eq!(
            median_time_chart(&table, &selection),
            median_time_chart(&table, &selection)
        );
    }

    #[test]
    fn detail_chart_plots_both_metrics_on_two_axes() {
        let table = fixture();
        let spec = city_detail_chart(&table, "Bellevue");

        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].axis, YAxis::Primary);
        assert_eq!(spec.series[0].points[0].value, 80.0);
        assert_eq!(spec.series[1].axis, YAxis::Secondary);
        assert_eq!(spec.series[1].points[0].value, 3.0);
        assert_eq!(spec.y2_label.as_deref(), Some(APPLICATION_COUNT_LABEL));
    }

    #[test]
    fn detail_chart_for_unknown_city_is_empty() {
        let table = fixture();
        let spec = city_detail_chart(&table, "Tacoma");
        assert!(spec.series.is_empty());
    }

    #[test]
    fn plotly_figure_carries_secondary_axis() {
        let table = fixture();
        let fig = city_detail_chart(&table, "Kirkland").to_plotly();

        assert_eq!(fig["data"][0]["yaxis"], "y");
        assert_eq!(fig["data"][1]["yaxis"], "y2");
        assert_eq!(fig["layout"]["yaxis2"]["overlaying"], "y");
        assert_eq!(fig["data"][0]["x"][0], "2020-01-01");
    }

    #[test]
    fn points_are_sorted_by_date() {
        let table = PermitTable::from_records(vec![
            rec("Kirkland", "2020-02-01", 110.0, 6),
            rec("Kirkland", "2020-01-01", 100.0, 5),
        ]);
        let spec = single_city_chart(&table, "Kirkland");
        let dates: Vec<String> = spec.series[0]
            .points
            .iter()
            .map(|p| p.date.to_string())
            .collect();
        assert_eq!(dates, ["2020-01-01", "2020-02-01"]);
    }
}
