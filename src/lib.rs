//! quake-vis - Live earthquake visualization pipeline
//!
//! Ingests a live seismic-event feed and turns it into filtered, sorted,
//! styled, and aggregated views: ring or heat layers for a map, plus a
//! magnitude histogram and a 24-hour activity chart. The map and chart
//! engines themselves are external; this crate produces draw commands.

pub mod app;
pub mod core;
pub mod feed;
pub mod scheduler;

pub use app::{DrawCommand, RenderCoordinator, UserCommand, ViewState};
pub use feed::{FeedClient, FeedError};
pub use scheduler::{RefreshScheduler, REFRESH_INTERVAL};
