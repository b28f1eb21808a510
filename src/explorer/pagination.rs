//! Bidirectional chunk pagination.
//!
//! Each direction (older/newer) runs an explicit fetch loop: request up to
//! the direction's chunk-size limit, apply the result, and continue only
//! while the backend keeps returning exactly-full chunks. A short chunk
//! marks the direction exhausted, which is the loop's terminal condition;
//! accumulated row counts alone cannot distinguish "still catching up"
//! from "no more data upstream". Within one direction fetches are
//! sequential. Forward and backward are disjoint buffers, so the two
//! directions may interleave freely.

use anyhow::Result;

use crate::{
    client::ChunkQuery,
    logs::types::TableData,
    state::{DEFAULT_NEWER_CHUNK_SIZE_LIMIT, DEFAULT_OLDER_CHUNK_SIZE_LIMIT},
};

use super::LogExplorer;

/// Which end of a chunk new rows attach to. Rows are stored newest-first,
/// so older data appends and newer data prepends.
enum Attach {
    Prepend,
    Append,
}

fn merge_chunk(target: &mut TableData, chunk: TableData, attach: Attach) -> usize {
    if target.columns.is_empty() {
        target.columns = chunk.columns;
    }
    let added = chunk.values.len();
    match attach {
        Attach::Append => target.values.extend(chunk.values),
        Attach::Prepend => {
            let mut merged = chunk.values;
            merged.append(&mut target.values);
            target.values = merged;
        }
    }
    added
}

impl LogExplorer {
    /// Fetch older rows until the backend returns a short chunk or the
    /// search gate closes. No-op when the direction is already exhausted.
    pub async fn fetch_older_chunk(&self) -> Result<()> {
        loop {
            let query = self.state.read(|s| {
                if s.search_status.blocks_fetching() || s.older_exhausted {
                    None
                } else {
                    Some(ChunkQuery {
                        cursor: s.next_older_upper_bound,
                        bounds: s.time_bounds.clone(),
                        filters: s.filters.clone(),
                        limit: s.older_chunk_size_limit,
                    })
                }
            });
            let Some(query) = query else { return Ok(()) };

            let requested = query.limit;
            let fetch = self.client.fetch_older_chunk(query).await?;
            let got = fetch.chunk.values.len();
            log::debug!("[PAGE] older chunk: {got}/{requested} rows");

            self.state.write(|s| {
                // An empty chunk carries no cursor; the stored boundary
                // marker must survive it so a later refetch resumes here
                // instead of re-anchoring at the resolved bounds.
                if fetch.cursor.is_some() {
                    s.next_older_upper_bound = fetch.cursor;
                }
                merge_chunk(&mut s.infinite.backward, fetch.chunk, Attach::Append);
                if got < requested {
                    s.older_exhausted = true;
                }
            });
            self.advance_if_loaded();
            self.refresh_props();

            if got < requested {
                return Ok(());
            }
        }
    }

    /// Fetch newer rows until the backend returns a short chunk or the
    /// search gate closes. Newly fetched rows are recorded so the view can
    /// keep the previous top row in place.
    pub async fn fetch_newer_chunk(&self) -> Result<()> {
        loop {
            let query = self.state.read(|s| {
                if s.search_status.blocks_fetching() || s.newer_exhausted {
                    None
                } else {
                    Some(ChunkQuery {
                        cursor: s.next_newer_lower_bound,
                        bounds: s.time_bounds.clone(),
                        filters: s.filters.clone(),
                        limit: s.newer_chunk_size_limit,
                    })
                }
            });
            let Some(query) = query else { return Ok(()) };

            let requested = query.limit;
            let fetch = self.client.fetch_newer_chunk(query).await?;
            let got = fetch.chunk.values.len();
            log::debug!("[PAGE] newer chunk: {got}/{requested} rows");

            self.state.write(|s| {
                if fetch.cursor.is_some() {
                    s.next_newer_lower_bound = fetch.cursor;
                }
                let added = merge_chunk(&mut s.infinite.forward, fetch.chunk, Attach::Prepend);
                s.new_rows_added = added;
                if got < requested {
                    s.newer_exhausted = true;
                }
            });
            self.advance_if_loaded();
            self.refresh_props();

            if got < requested {
                return Ok(());
            }
        }
    }

    /// One tail round: fetch everything past the tail cursor and advance
    /// it. The cursor only moves forward in time.
    pub async fn fetch_tail_chunk(&self) -> Result<()> {
        let query = self.state.read(|s| {
            if s.search_status.blocks_fetching() {
                None
            } else {
                Some(ChunkQuery {
                    cursor: s.next_tail_lower_bound,
                    bounds: s.time_bounds.clone(),
                    filters: s.filters.clone(),
                    limit: s.newer_chunk_size_limit,
                })
            }
        });
        let Some(query) = query else { return Ok(()) };

        let fetch = self.client.fetch_tail_chunk(query).await?;
        self.state.write(|s| {
            if fetch.cursor.is_some() {
                s.next_tail_lower_bound = fetch.cursor;
            }
            let added = merge_chunk(&mut s.infinite.forward, fetch.chunk, Attach::Prepend);
            s.new_rows_added = added;
        });
        self.advance_if_loaded();
        self.refresh_props();
        Ok(())
    }

    /// Scroll hook for the older edge: once the loaded backward rows have
    /// caught up with the limit, grow the limit by one step and fetch more.
    pub async fn handle_scroll_to_older_edge(&self) -> Result<()> {
        let proceed = self.state.write(|s| {
            if s.infinite.backward.values.len() < s.older_chunk_size_limit {
                return false;
            }
            s.older_chunk_size_limit += DEFAULT_OLDER_CHUNK_SIZE_LIMIT;
            s.older_exhausted = false;
            log::debug!(
                "[PAGE] older chunk size limit -> {}",
                s.older_chunk_size_limit
            );
            true
        });
        if proceed {
            self.fetch_older_chunk().await?;
        }
        Ok(())
    }

    /// Scroll hook for the newer edge. In live mode the tail scheduler owns
    /// newer-data acquisition, so the hook only re-arms it if needed;
    /// otherwise it grows the newer limit and fetches.
    pub async fn handle_scroll_to_newer_edge(&self) -> Result<()> {
        let (is_live_mode, live_updating) =
            self.state.read(|s| (s.table_time.is_live(), s.live_updating));
        if is_live_mode {
            if !live_updating {
                self.start_live_tail();
            }
            return Ok(());
        }

        let proceed = self.state.write(|s| {
            let loaded = s.infinite.forward.values.len();
            if loaded > 0 && loaded < s.newer_chunk_size_limit {
                return false;
            }
            s.newer_chunk_size_limit += DEFAULT_NEWER_CHUNK_SIZE_LIMIT;
            s.newer_exhausted = false;
            s.loading_newer = true;
            log::debug!(
                "[PAGE] newer chunk size limit -> {}",
                s.newer_chunk_size_limit
            );
            true
        });
        if proceed {
            self.fetch_newer_chunk().await?;
        }
        Ok(())
    }
}
