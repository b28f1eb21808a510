//! Query backend seam.
//!
//! The explorer core never talks to a concrete backend; everything it needs
//! is expressed through [`LogQueryClient`]. Implementations can target any
//! store that can answer bounded, time-ordered row queries. The trait is
//! independent of the state store and the event bus, so it can be mocked in
//! tests with a scripted client.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::logs::{
    config::LogConfig,
    types::{Filter, HistogramDatum, Namespace, Source, TableData, TimeBounds},
};

/// Parameters for one chunk fetch.
///
/// `cursor` is the stored boundary marker for the direction being fetched
/// (`None` before the first fetch in that direction). `limit` is the
/// current chunk-size limit; a response shorter than `limit` signals that
/// the direction is exhausted.
#[derive(Debug, Clone)]
pub struct ChunkQuery {
    pub cursor: Option<DateTime<Utc>>,
    pub bounds: TimeBounds,
    pub filters: Vec<Filter>,
    pub limit: usize,
}

/// One fetched chunk plus the updated boundary cursor for its direction.
/// The caller persists `cursor` before issuing the next call in that
/// direction.
#[derive(Debug, Clone, Default)]
pub struct ChunkFetch {
    pub chunk: TableData,
    pub cursor: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait LogQueryClient: Send + Sync {
    /// Fetch rows older than the stored older-direction cursor.
    async fn fetch_older_chunk(&self, query: ChunkQuery) -> Result<ChunkFetch>;

    /// Fetch rows newer than the stored newer-direction cursor.
    async fn fetch_newer_chunk(&self, query: ChunkQuery) -> Result<ChunkFetch>;

    /// Fetch rows past the tail cursor; the cursor only moves forward in
    /// time. Used by the live polling loop.
    async fn fetch_tail_chunk(&self, query: ChunkQuery) -> Result<ChunkFetch>;

    /// Entry counts over time, grouped by severity, for the histogram.
    async fn fetch_histogram(
        &self,
        bounds: &TimeBounds,
        filters: &[Filter],
    ) -> Result<Vec<HistogramDatum>>;

    /// Read the display configuration stored under an opaque link.
    async fn get_log_config(&self, link: &str) -> Result<LogConfig>;

    /// Persist the display configuration under an opaque link.
    async fn update_log_config(&self, link: &str, config: &LogConfig) -> Result<()>;

    async fn list_sources(&self) -> Result<Vec<Source>>;

    async fn select_source_namespaces(&self, source_id: &str) -> Result<Vec<Namespace>>;
}
