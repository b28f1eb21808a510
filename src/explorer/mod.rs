//! Log-exploration page core.
//!
//! [`LogExplorer`] is the single owner of the view state: it coordinates the
//! live-tail polling loop, bidirectional pagination, search/filter
//! invalidation, and time-window resolution, and projects the result into
//! render props. Frontends inject a [`LogQueryClient`] implementation and
//! consume the event bus; they never mutate the state directly.

pub mod invalidate;
pub mod pagination;
pub mod projection;
pub mod tail;
pub mod time_bounds;

use anyhow::Result;
use parking_lot::RwLock;
use std::{sync::Arc, time::Duration};

use crate::{
    client::LogQueryClient,
    core::bus::{Bus, ExplorerEvent},
    logs::{
        config::{LogConfig, SeverityFormat, SeverityLevelColor, TableColumn},
        types::{Namespace, SearchStatus, TIME_OPTION_NOW},
    },
    state::{ExplorerState, StateHandle},
};
use projection::RenderProps;
use tail::{TailHandle, DEFAULT_TAIL_CHUNK_PERIOD};

#[derive(Clone)]
pub struct LogExplorer {
    pub(crate) client: Arc<dyn LogQueryClient>,
    pub(crate) state: StateHandle,
    pub(crate) bus: Bus,
    pub(crate) tail: TailHandle,
    pub(crate) tail_period: Duration,
    props: Arc<RwLock<RenderProps>>,
}

impl LogExplorer {
    /// Create an explorer bound to a query client and a display-config
    /// link. The returned receiver carries [`ExplorerEvent`]s for the
    /// frontend; call [`LogExplorer::mount`] before using the view.
    pub fn new(
        client: Arc<dyn LogQueryClient>,
        log_config_link: impl Into<String>,
    ) -> (Self, flume::Receiver<ExplorerEvent>) {
        let (bus, rx) = Bus::new();
        let state = ExplorerState {
            log_config_link: log_config_link.into(),
            ..ExplorerState::default()
        };

        let explorer = Self {
            client,
            state: StateHandle::new(state),
            bus,
            tail: TailHandle::new(),
            tail_period: DEFAULT_TAIL_CHUNK_PERIOD,
            props: Arc::new(RwLock::new(RenderProps::default())),
        };
        (explorer, rx)
    }

    /// Override the tail polling period (tests use short periods).
    pub fn with_tail_period(mut self, period: Duration) -> Self {
        self.tail_period = period;
        self
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Latest cached render props, recomputed once per state mutation.
    pub fn props(&self) -> RenderProps {
        self.props.read().clone()
    }

    /// Acknowledge a consumed `Refreshed` event so the next redraw request
    /// can be queued.
    pub fn acknowledge_refresh(&self) {
        self.bus.mark_refresh_complete();
    }

    /// Load sources, namespaces, and display config, run the initial table
    /// load, and arm the tail scheduler when starting in live mode.
    pub async fn mount(&self) -> Result<()> {
        let sources = self.client.list_sources().await?;
        let source = sources
            .iter()
            .find(|src| src.default)
            .or_else(|| sources.first())
            .cloned();

        let namespaces = match &source {
            Some(src) => self.client.select_source_namespaces(&src.id).await?,
            None => Vec::new(),
        };

        let link = self.state.read(|s| s.log_config_link.clone());
        let config = self.client.get_log_config(&link).await?;

        self.state.write(|s| {
            s.sources = sources;
            s.current_source = source;
            s.current_namespace = namespaces.first().cloned();
            s.current_namespaces = namespaces;
            s.log_config = config;
        });
        log::info!("[EXPLORER] mounted, config loaded from {link}");

        self.update_table_data(SearchStatus::Loading).await?;

        if self.state.read(|s| s.time_range.time_option == TIME_OPTION_NOW) {
            self.start_live_tail();
        }

        self.execute_histogram_query().await?;
        Ok(())
    }

    /// Tear down background work. Called when the page goes away.
    pub fn shutdown(&self) {
        self.tail.cancel();
        log::info!("[EXPLORER] shut down");
    }

    /// Re-run the histogram query for the current bounds and filters.
    pub async fn execute_histogram_query(&self) -> Result<()> {
        let (bounds, filters) = self.state.read(|s| (s.time_bounds.clone(), s.filters.clone()));
        let data = self.client.fetch_histogram(&bounds, &filters).await?;
        self.state.write(|s| s.histogram_data = data);
        self.refresh_props();
        Ok(())
    }

    /// Switch to another source and reload with its namespaces. Resets the
    /// session state; only the live-updating flag survives.
    pub async fn set_source(&self, source_id: &str) -> Result<()> {
        let namespaces = self.client.select_source_namespaces(source_id).await?;
        self.state.write(|s| {
            s.current_source = s.sources.iter().find(|src| src.id == source_id).cloned();
            s.current_namespace = namespaces.first().cloned();
            s.current_namespaces = namespaces;
            s.reset_session();
        });
        log::info!("[EXPLORER] source changed to {source_id}");
        self.update_table_data(SearchStatus::Loading).await
    }

    /// Switch the namespace within the current source and reload.
    pub async fn set_namespace(&self, namespace: Namespace) -> Result<()> {
        self.state.write(|s| {
            s.current_namespace = Some(namespace);
            s.reset_session();
        });
        self.update_table_data(SearchStatus::Loading).await
    }

    /// User toggled the live indicator: leave live mode, or re-enter it by
    /// selecting relative time zero.
    pub async fn toggle_live_updating(&self) -> Result<()> {
        if self.state.read(|s| s.live_updating) {
            self.stop_live_tail();
            Ok(())
        } else {
            self.choose_relative_time(crate::logs::types::RELATIVE_NOW)
                .await
        }
    }

    /// Expanding a message row pins the view; live updates stop so the row
    /// does not scroll away.
    pub fn handle_expand_message(&self) {
        self.stop_live_tail();
    }

    /// Manual vertical scroll always wins over live mode.
    pub fn handle_vertical_scroll(&self) {
        self.tail.cancel();
        self.state.write(|s| {
            s.live_updating = false;
            s.has_scrolled = true;
        });
        self.refresh_props();
    }

    pub async fn update_severity_levels(
        &self,
        severity_level_colors: Vec<SeverityLevelColor>,
    ) -> Result<()> {
        let config = self.state.read(|s| LogConfig {
            severity_level_colors,
            ..s.log_config.clone()
        });
        self.push_config(config).await
    }

    pub async fn update_severity_format(&self, severity_format: SeverityFormat) -> Result<()> {
        let config = self.state.read(|s| LogConfig {
            severity_format,
            ..s.log_config.clone()
        });
        self.push_config(config).await
    }

    pub async fn update_columns(&self, table_columns: Vec<TableColumn>) -> Result<()> {
        let config = self.state.read(|s| LogConfig {
            table_columns,
            ..s.log_config.clone()
        });
        self.push_config(config).await
    }

    pub async fn update_truncation(&self, is_truncated: bool) -> Result<()> {
        let config = self.state.read(|s| LogConfig {
            is_truncated,
            ..s.log_config.clone()
        });
        self.push_config(config).await
    }

    /// Persist a merged config through the client, then adopt it locally.
    async fn push_config(&self, config: LogConfig) -> Result<()> {
        let link = self.state.read(|s| s.log_config_link.clone());
        self.client.update_log_config(&link, &config).await?;
        self.state.write(|s| s.log_config = config);
        self.refresh_props();
        Ok(())
    }

    /// Recompute the cached render props from the current state and ask the
    /// frontend to redraw.
    pub(crate) fn refresh_props(&self) {
        let next = self.state.write(projection::project);
        *self.props.write() = next;
        self.bus.publish_refresh();
    }

    pub(crate) fn set_search_status(&self, status: SearchStatus) {
        self.state.write(|s| s.search_status = status);
        log::debug!("[SEARCH] status -> {status}");
        self.bus.publish(ExplorerEvent::StatusChanged(status));
    }
}
