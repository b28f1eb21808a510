//! Shared view-state aggregate.
//!
//! All loaded chunks, cursors, size limits, and mode flags live in a single
//! [`ExplorerState`] value behind a [`StateHandle`]. Every mutation goes
//! through the closure accessors; nothing else aliases the aggregate, so
//! interleaved forward/backward mutations from concurrent fetches stay
//! well-defined (they touch disjoint buffers).

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::logs::{
    config::LogConfig,
    types::{
        Filter, HistogramDatum, Namespace, SearchStatus, Source, TableInfiniteData, TableTime,
        TimeBounds, TimeRange,
    },
};

/// Starting chunk-size limit for newer-direction fetches; also the step the
/// limit grows by when the user scrolls against the newer edge.
pub const DEFAULT_NEWER_CHUNK_SIZE_LIMIT: usize = 20;

/// Starting chunk-size limit for older-direction fetches; also the growth
/// step for the older edge.
pub const DEFAULT_OLDER_CHUNK_SIZE_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct ExplorerState {
    pub time_range: TimeRange,
    pub time_bounds: TimeBounds,
    pub table_time: TableTime,
    pub filters: Vec<Filter>,
    pub search_status: SearchStatus,

    pub infinite: TableInfiniteData,
    pub histogram_data: Vec<HistogramDatum>,

    pub log_config: LogConfig,
    pub log_config_link: String,

    pub sources: Vec<Source>,
    pub current_source: Option<Source>,
    pub current_namespaces: Vec<Namespace>,
    pub current_namespace: Option<Namespace>,

    // Boundary markers, each owned by exactly one fetch direction and
    // mutated only by that direction's fetch-completion handler.
    pub next_older_upper_bound: Option<DateTime<Utc>>,
    pub next_newer_lower_bound: Option<DateTime<Utc>>,
    pub next_tail_lower_bound: Option<DateTime<Utc>>,

    pub newer_chunk_size_limit: usize,
    pub older_chunk_size_limit: usize,
    pub newer_exhausted: bool,
    pub older_exhausted: bool,

    pub live_updating: bool,
    pub has_scrolled: bool,
    pub loading_newer: bool,
    pub new_rows_added: usize,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            time_range: TimeRange::default(),
            time_bounds: TimeBounds::default(),
            table_time: TableTime::default(),
            filters: Vec::new(),
            search_status: SearchStatus::None,
            infinite: TableInfiniteData::default(),
            histogram_data: Vec::new(),
            log_config: LogConfig::default(),
            log_config_link: String::new(),
            sources: Vec::new(),
            current_source: None,
            current_namespaces: Vec::new(),
            current_namespace: None,
            next_older_upper_bound: None,
            next_newer_lower_bound: None,
            next_tail_lower_bound: None,
            newer_chunk_size_limit: DEFAULT_NEWER_CHUNK_SIZE_LIMIT,
            older_chunk_size_limit: DEFAULT_OLDER_CHUNK_SIZE_LIMIT,
            newer_exhausted: false,
            older_exhausted: false,
            live_updating: false,
            has_scrolled: false,
            loading_newer: false,
            new_rows_added: 0,
        }
    }
}

impl ExplorerState {
    /// Drop loaded rows; keeps cursors, limits, and time selection.
    pub fn clear_table_data(&mut self) {
        self.infinite = TableInfiniteData::default();
        self.loading_newer = false;
        self.new_rows_added = 0;
    }

    /// Forget all boundary markers so the next fetch in each direction
    /// re-anchors at the resolved time bounds.
    pub fn clear_bounds(&mut self) {
        self.next_older_upper_bound = None;
        self.next_newer_lower_bound = None;
        self.next_tail_lower_bound = None;
    }

    /// Reset per-direction limits and exhaustion markers to their load-time
    /// values. Part of every full reload.
    pub fn reset_chunk_limits(&mut self) {
        self.newer_chunk_size_limit = DEFAULT_NEWER_CHUNK_SIZE_LIMIT;
        self.older_chunk_size_limit = DEFAULT_OLDER_CHUNK_SIZE_LIMIT;
        self.newer_exhausted = false;
        self.older_exhausted = false;
    }

    /// Session reset on source/namespace change: time selection, filters,
    /// and search status all go back to their defaults, loaded data is
    /// dropped. The live-updating flag survives so a live view stays live
    /// across the switch.
    pub fn reset_session(&mut self) {
        self.time_range = TimeRange::default();
        self.time_bounds = TimeBounds::default();
        self.table_time = TableTime::default();
        self.filters.clear();
        self.search_status = SearchStatus::None;
        self.histogram_data.clear();
        self.has_scrolled = false;
        self.clear_table_data();
        self.clear_bounds();
        self.reset_chunk_limits();
    }
}

/// Cheap cloneable handle to the shared state aggregate.
#[derive(Clone)]
pub struct StateHandle {
    inner: Arc<RwLock<ExplorerState>>,
}

impl StateHandle {
    pub fn new(state: ExplorerState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Read from the state under a short-lived shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&ExplorerState) -> R) -> R {
        f(&self.inner.read())
    }

    /// Mutate the state under a short-lived exclusive lock. The closure
    /// must not block or await; fetches happen outside the lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut ExplorerState) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::types::TableData;

    #[test]
    fn test_reset_session_keeps_live_flag() {
        let mut state = ExplorerState {
            live_updating: true,
            filters: vec![Filter::new("host", "server01", "==")],
            search_status: SearchStatus::Loaded,
            ..ExplorerState::default()
        };
        state.infinite.backward = TableData {
            columns: vec!["time".into()],
            values: vec![vec!["2024-01-15T14:30:25Z".into()]],
        };

        state.reset_session();

        assert!(state.live_updating);
        assert!(state.filters.is_empty());
        assert_eq!(state.search_status, SearchStatus::None);
        assert!(state.infinite.is_empty());
    }

    #[test]
    fn test_clear_bounds_drops_all_cursors() {
        let mut state = ExplorerState {
            next_older_upper_bound: Some(Utc::now()),
            next_newer_lower_bound: Some(Utc::now()),
            next_tail_lower_bound: Some(Utc::now()),
            ..ExplorerState::default()
        };
        state.clear_bounds();
        assert!(state.next_older_upper_bound.is_none());
        assert!(state.next_newer_lower_bound.is_none());
        assert!(state.next_tail_lower_bound.is_none());
    }

    #[test]
    fn test_handle_read_write_roundtrip() {
        let handle = StateHandle::new(ExplorerState::default());
        handle.write(|s| s.older_chunk_size_limit += DEFAULT_OLDER_CHUNK_SIZE_LIMIT);
        let limit = handle.read(|s| s.older_chunk_size_limit);
        assert_eq!(limit, 2 * DEFAULT_OLDER_CHUNK_SIZE_LIMIT);
    }
}
