use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Relative-time value that means "follow the most recent entries".
pub const RELATIVE_NOW: i64 = 0;

/// Time option string for live mode; the backend interprets bounds built
/// from it as a rolling window ending at query time.
pub const TIME_OPTION_NOW: &str = "now";

/// The user's time selection, independent of resolved bounds.
///
/// `time_option` is either `"now"` or an ISO timestamp pivot. `seconds` is
/// the span of the window around a pivot, `None` while in live mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub time_option: String,
    pub window_option: String,
    pub seconds: Option<i64>,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            time_option: TIME_OPTION_NOW.to_string(),
            window_option: "5m".to_string(),
            seconds: None,
        }
    }
}

/// A window choice from the time dropdown: display token plus its span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub window_option: String,
    pub seconds: i64,
}

/// Resolved bound expressions sent verbatim to the backend query layer.
///
/// `lower` is either a relative expression (`"now() - 5m"`) or an ISO
/// instant; `upper` is `None` for rolling windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub lower: String,
    pub upper: Option<String>,
}

impl Default for TimeBounds {
    fn default() -> Self {
        Self {
            lower: "now() - 5m".to_string(),
            upper: None,
        }
    }
}

/// The mode the table is anchored to: a relative offset from now (0 means
/// live) or a fixed custom timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableTime {
    Relative { seconds: i64 },
    Custom { time: String },
}

impl TableTime {
    pub fn is_live(&self) -> bool {
        matches!(self, TableTime::Relative { seconds: RELATIVE_NOW })
    }
}

impl Default for TableTime {
    fn default() -> Self {
        TableTime::Relative {
            seconds: RELATIVE_NOW,
        }
    }
}

/// A bounded, ordered batch of log rows plus shared column metadata.
/// Rows are kept strictly time-ordered, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub values: Vec<Vec<String>>,
}

impl TableData {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The two loaded chunks around the pivot time. `forward` holds rows newer
/// than the live-tail pivot, `backward` rows older than the initial load
/// point; the two never overlap in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableInfiniteData {
    pub forward: TableData,
    pub backward: TableData,
}

impl TableInfiniteData {
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.backward.is_empty()
    }
}

/// State machine gating whether background fetch loops may run and what
/// loading affordance a frontend shows.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SearchStatus {
    #[default]
    None,
    Loading,
    Loaded,
    Clearing,
    Cleared,
    UpdatingFilters,
    UpdatingTimeBounds,
}

impl SearchStatus {
    /// Fetch operations are suppressed while a reload is in flight or
    /// before the first load.
    pub fn blocks_fetching(self) -> bool {
        matches!(self, SearchStatus::None | SearchStatus::Clearing)
    }
}

/// A server-side filter term. Identity is carried by `id` so individual
/// chips can be changed or deleted from the filter bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub operator: String,
}

impl Filter {
    pub fn new(key: impl Into<String>, value: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            value: value.into(),
            operator: operator.into(),
        }
    }
}

/// One histogram bucket: entry count per time slot per severity group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramDatum {
    pub time: DateTime<Utc>,
    pub value: u64,
    pub group: String,
}

/// A queryable log source as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default: bool,
}

/// A database/retention-policy pair inside a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub database: String,
    pub retention_policy: String,
}
