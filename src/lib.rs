//! Client-side controller of an incremental product feed for a price tracker.
//!
//! Every stateful component is an actor reached through a cheap, clonable
//! handle. [`app::Context`] spawns and owns them all.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod feed;
pub mod filter;
pub mod fs;
pub mod history;
pub mod log;
pub mod net;
pub mod utils;

pub use utils::*;

/// Capacity of the message channels between actors.
pub const BUFFER_SIZE: usize = 128;
