//! Control/state core for a log-exploration dashboard.
//!
//! This crate implements the data-fetching and view-state synchronization
//! logic behind a log-exploration page: live-tail polling, bidirectional
//! infinite-scroll pagination around a pivot time, adaptive chunk-size
//! growth, and search/filter invalidation. It owns a single source of truth
//! for "what time window and rows are currently displayed" and projects it
//! into fully computed render props for a presentation layer.
//!
//! Rendering, styling, and the query backend are external collaborators:
//! the backend is consumed through the [`client::LogQueryClient`] trait and
//! frontends consume [`explorer::projection::RenderProps`] plus the
//! [`core::bus::ExplorerEvent`] stream.

pub mod client;
pub mod core;
pub mod explorer;
pub mod logs;
pub mod state;

pub use client::{ChunkFetch, ChunkQuery, LogQueryClient};
pub use core::bus::{Bus, ExplorerEvent};
pub use explorer::{projection::RenderProps, LogExplorer};
pub use state::{ExplorerState, StateHandle};
