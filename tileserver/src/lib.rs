//! # Tileserver
//!
//! Serves vector tiles and UTF grids from a directory of MBTiles archives over HTTP.
//!
//! - [`config`]: YAML configuration with environment fallbacks
//! - [`server`]: the axum based HTTP server
//!
//! The archive handling lives in [`tileserver_container`], the shared types in [`tileserver_core`].

pub mod config;
pub mod server;

pub use tileserver_container as container;
pub use tileserver_core as core;
