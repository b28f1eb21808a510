//! Log domain vocabulary.
//!
//! This module defines the data types shared between the explorer core, the
//! query client seam, and any presentation frontend: time selections and
//! resolved bounds, table chunks, filters, the search state machine, and the
//! user-facing display configuration.

pub mod config;
pub mod search;
pub mod types;

pub use config::{LogConfig, SeverityFormat, SeverityLevelColor, TableColumn};
pub use types::{
    Filter, HistogramDatum, Namespace, SearchStatus, Source, TableData, TableInfiniteData,
    TableTime, TimeBounds, TimeRange, TimeWindow,
};
