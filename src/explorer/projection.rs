//! View projection.
//!
//! Merges the forward and backward chunks into one ordered display buffer
//! and computes every derived value the presentation layer needs. The
//! projection runs once per state mutation and is cached by the explorer
//! until the next mutation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logs::{
    config::{SeverityFormat, SeverityLevelColor, TableColumn},
    types::{SearchStatus, TableData},
};
use crate::state::ExplorerState;

/// Color mapping for one histogram severity group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramColor {
    pub group: String,
    pub color: String,
}

/// Fully computed props for a presentation layer. Everything here is
/// derived deterministically from the state aggregate; frontends render it
/// without further queries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderProps {
    pub table_data: TableData,
    pub row_count: usize,
    /// Row the table should scroll to, `None` to leave the scroll position
    /// untouched.
    pub scroll_to_row: Option<usize>,
    pub histogram_total: u64,
    pub histogram_colors: Vec<HistogramColor>,
    pub severity_format: SeverityFormat,
    pub severity_level_colors: Vec<SeverityLevelColor>,
    pub is_truncated: bool,
    pub live_updating: bool,
    pub has_scrolled: bool,
    pub search_status: SearchStatus,
    pub next_older_upper_bound: Option<DateTime<Utc>>,
    pub next_newer_lower_bound: Option<DateTime<Utc>>,
}

impl RenderProps {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

/// Keep only the configured, visible columns, in configured order. A chunk
/// whose columns match nothing in the config is passed through unchanged
/// (the config may simply not be loaded yet).
pub fn apply_changes_to_table_data(data: &TableData, table_columns: &[TableColumn]) -> TableData {
    let picks: Vec<usize> = table_columns
        .iter()
        .filter(|column| column.visible)
        .filter_map(|column| {
            data.columns
                .iter()
                .position(|name| name == &column.internal_name)
        })
        .collect();

    if picks.is_empty() {
        return data.clone();
    }

    TableData {
        columns: picks.iter().map(|&i| data.columns[i].clone()).collect(),
        values: data
            .values
            .iter()
            .map(|row| {
                picks
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect(),
    }
}

/// Compute render props from the current state. Takes the state mutably
/// because a pending "scroll to the newly added rows" request is consumed
/// by the projection that reports it.
pub fn project(state: &mut ExplorerState) -> RenderProps {
    let forward = apply_changes_to_table_data(&state.infinite.forward, &state.log_config.table_columns);
    let backward =
        apply_changes_to_table_data(&state.infinite.backward, &state.log_config.table_columns);

    // Forward's column set is authoritative for the merged result.
    let mut values = forward.values;
    values.extend(backward.values);
    let table_data = TableData {
        columns: forward.columns,
        values,
    };

    let scroll_to_row = if state.live_updating {
        Some(0)
    } else if state.loading_newer && state.new_rows_added > 0 {
        state.loading_newer = false;
        Some(state.new_rows_added)
    } else if state.has_scrolled {
        None
    } else {
        Some(state.infinite.forward.values.len().saturating_sub(3))
    };

    let histogram_colors = state
        .log_config
        .severity_level_colors
        .iter()
        .map(|lc| HistogramColor {
            group: lc.level.clone(),
            color: lc.color.clone(),
        })
        .collect();

    RenderProps {
        row_count: table_data.values.len(),
        table_data,
        scroll_to_row,
        histogram_total: state.histogram_data.iter().map(|d| d.value).sum(),
        histogram_colors,
        severity_format: state.log_config.severity_format,
        severity_level_colors: state.log_config.severity_level_colors.clone(),
        is_truncated: state.log_config.is_truncated,
        live_updating: state.live_updating,
        has_scrolled: state.has_scrolled,
        search_status: state.search_status,
        next_older_upper_bound: state.next_older_upper_bound,
        next_newer_lower_bound: state.next_newer_lower_bound,
    }
}
