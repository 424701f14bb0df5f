// src/pages/mod.rs
//
// Pages as plain values. A page is an ordered list of blocks (prose, rules,
// images, graphs, filter widgets) that a host framework renders; nothing in
// here knows how rendering works.

use serde::Serialize;

use crate::chart::ChartSpec;
use crate::dataset::PermitTable;

pub mod council_calendar;
pub mod home;
pub mod permitting_time;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Markdown {
        text: String,
    },
    Rule,
    Image {
        src: String,
        width: u32,
        height: u32,
    },
    /// A chart slot. `figure` is the chart for the widgets' initial values;
    /// interactive graphs are re-filled through their `Binder`.
    Graph {
        id: String,
        figure: ChartSpec,
    },
    Checklist {
        id: String,
        options: Vec<String>,
        selected: Vec<String>,
    },
    Dropdown {
        id: String,
        options: Vec<String>,
        selected: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// URL path the host mounts this page at.
    pub path: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Every page on the site, in navigation order.
pub fn all(table: &PermitTable) -> Vec<Page> {
    vec![
        home::page(),
        permitting_time::page(table),
        council_calendar::page(),
    ]
}

fn markdown(text: &str) -> Block {
    Block::Markdown {
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PermitRecord;

    #[test]
    fn site_has_three_pages_with_distinct_paths() {
        let table = PermitTable::from_records(vec![PermitRecord {
            city: "Kirkland".to_string(),
            date: "2020-01-01".parse().unwrap(),
            median_issue_days: 100.0,
            application_count: 5,
        }]);
        let pages = all(&table);
        assert_eq!(pages.len(), 3);

        let mut paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&"/"));
    }

    #[test]
    fn blocks_serialize_with_a_type_tag() {
        let json = serde_json::to_value(markdown("hello")).unwrap();
        assert_eq!(json["type"], "markdown");
        assert_eq!(json["text"], "hello");
    }
}
