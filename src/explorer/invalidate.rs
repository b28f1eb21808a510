//! Search/filter invalidation and the clear/reload cycle.
//!
//! Any mutation that changes what the backend would return (search text,
//! filter set, time bounds) marks the loaded dataset stale and drives a
//! full reload: the mutation-specific status is announced, loaded chunks
//! and cursors are dropped under `Clearing`, and the `Cleared` transition
//! triggers exactly one fresh older-chunk load, re-arming the tail first
//! when the view was live.

use anyhow::Result;
use uuid::Uuid;

use crate::logs::{search::search_to_filters, types::Filter, types::SearchStatus};
use crate::state::DEFAULT_OLDER_CHUNK_SIZE_LIMIT;

use super::LogExplorer;

impl LogExplorer {
    /// Submit the search box: every term becomes a filter, then reload.
    pub async fn submit_search(&self, text: &str) -> Result<()> {
        let filters = search_to_filters(text);
        if !filters.is_empty() {
            self.state.write(|s| s.filters.extend(filters));
        }
        self.update_table_data(SearchStatus::Loading).await
    }

    pub async fn add_filter(&self, filter: Filter) -> Result<()> {
        self.state.write(|s| s.filters.push(filter));
        self.update_table_data(SearchStatus::UpdatingFilters).await
    }

    pub async fn remove_filter(&self, id: Uuid) -> Result<()> {
        self.state.write(|s| s.filters.retain(|f| f.id != id));
        self.update_table_data(SearchStatus::UpdatingFilters).await
    }

    pub async fn change_filter(&self, id: Uuid, operator: &str, value: &str) -> Result<()> {
        self.state.write(|s| {
            if let Some(filter) = s.filters.iter_mut().find(|f| f.id == id) {
                filter.operator = operator.to_string();
                filter.value = value.to_string();
            }
        });
        self.update_table_data(SearchStatus::UpdatingFilters).await
    }

    /// Clicking a tag cell narrows the view to that key/value pair.
    pub async fn handle_tag_selection(&self, key: &str, value: &str) -> Result<()> {
        self.state.write(|s| s.filters.push(Filter::new(key, value, "==")));
        self.update_table_data(SearchStatus::UpdatingFilters).await
    }

    /// Run the full clear/reload cycle for a stale dataset. `status` names
    /// the mutation that caused it (`Loading`, `UpdatingFilters`,
    /// `UpdatingTimeBounds`).
    pub async fn update_table_data(&self, status: SearchStatus) -> Result<()> {
        self.set_search_status(status);

        self.set_search_status(SearchStatus::Clearing);
        self.state.write(|s| {
            s.clear_table_data();
            s.clear_bounds();
        });
        self.refresh_props();

        self.set_search_status(SearchStatus::Cleared);
        self.handle_cleared().await
    }

    /// The `Cleared` transition: reset pagination to its load-time shape,
    /// re-arm the tail when the view was live, and load one fresh backward
    /// dataset.
    async fn handle_cleared(&self) -> Result<()> {
        let live_updating = self.state.write(|s| {
            s.older_chunk_size_limit = DEFAULT_OLDER_CHUNK_SIZE_LIMIT;
            s.older_exhausted = false;
            s.newer_exhausted = false;
            s.live_updating
        });
        log::debug!("[SEARCH] cleared; reloading (live={live_updating})");

        if live_updating {
            self.start_live_tail();
        }
        self.fetch_older_chunk().await
    }

    /// Leave the loading affordance as soon as data genuinely arrives: any
    /// status other than `Clearing`/`Loaded` advances to `Loaded` once the
    /// buffers are no longer empty.
    pub(crate) fn advance_if_loaded(&self) {
        let advance = self.state.read(|s| {
            !matches!(
                s.search_status,
                SearchStatus::Clearing | SearchStatus::Loaded
            ) && !s.infinite.is_empty()
        });
        if advance {
            self.set_search_status(SearchStatus::Loaded);
        }
    }
}
