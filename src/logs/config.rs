//! User display preferences for the log table and histogram.
//!
//! The configuration is owned by the backend: it is re-fetched on mount and
//! mutated only through explicit update requests. Everything here is plain
//! data handed to the presentation layer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::logs::types::HistogramDatum;

/// How the severity column is rendered.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SeverityFormat {
    Dot,
    #[default]
    DotText,
    Text,
}

/// Color assigned to one severity level, used by both the table and the
/// histogram groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityLevelColor {
    pub level: String,
    pub color: String,
}

/// One column of the log table: internal result name, display label, and
/// whether the user kept it visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub internal_name: String,
    pub display_name: String,
    pub visible: bool,
}

impl TableColumn {
    pub fn new(internal_name: &str, display_name: &str, visible: bool) -> Self {
        Self {
            internal_name: internal_name.to_string(),
            display_name: display_name.to_string(),
            visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    pub table_columns: Vec<TableColumn>,
    pub severity_level_colors: Vec<SeverityLevelColor>,
    pub severity_format: SeverityFormat,
    pub is_truncated: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            table_columns: vec![
                TableColumn::new("time", "Timestamp", true),
                TableColumn::new("severity", "Severity", true),
                TableColumn::new("message", "Message", true),
                TableColumn::new("facility", "Facility", false),
                TableColumn::new("procid", "Proc ID", false),
                TableColumn::new("appname", "Application", true),
                TableColumn::new("host", "Host", true),
            ],
            severity_level_colors: Vec::new(),
            severity_format: SeverityFormat::default(),
            is_truncated: true,
        }
    }
}

/// Syslog severity levels from most to least severe; drives histogram group
/// ordering so stacked bars keep a stable, meaningful order.
pub const SEVERITY_SORTING_ORDER: &[&str] = &[
    "emerg", "alert", "crit", "err", "warning", "notice", "info", "debug",
];

/// Rank of a severity level in the sorting order. Unknown levels sort last.
pub fn severity_sort_rank(level: &str) -> usize {
    SEVERITY_SORTING_ORDER
        .iter()
        .position(|known| *known == level)
        .unwrap_or(SEVERITY_SORTING_ORDER.len())
}

/// Comparator for histogram bar groups: more severe groups first.
pub fn sort_histogram_bar_groups(a: &HistogramDatum, b: &HistogramDatum) -> Ordering {
    severity_sort_rank(&a.group).cmp(&severity_sort_rank(&b.group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn datum(group: &str) -> HistogramDatum {
        HistogramDatum {
            time: Utc::now(),
            value: 1,
            group: group.to_string(),
        }
    }

    #[test]
    fn test_severity_rank_ordering() {
        assert!(severity_sort_rank("emerg") < severity_sort_rank("err"));
        assert!(severity_sort_rank("err") < severity_sort_rank("debug"));
        // Unknown levels sort after every known level
        assert!(severity_sort_rank("debug") < severity_sort_rank("made-up"));
    }

    #[test]
    fn test_histogram_group_sort() {
        let mut groups = vec![datum("info"), datum("crit"), datum("warning")];
        groups.sort_by(sort_histogram_bar_groups);
        let order: Vec<&str> = groups.iter().map(|d| d.group.as_str()).collect();
        assert_eq!(order, vec!["crit", "warning", "info"]);
    }

    #[test]
    fn test_default_config_has_visible_core_columns() {
        let config = LogConfig::default();
        for name in ["time", "severity", "message"] {
            assert!(config
                .table_columns
                .iter()
                .any(|c| c.internal_name == name && c.visible));
        }
    }
}
