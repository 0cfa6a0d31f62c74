//! Contains the core types of the tile server: coordinates, tile formats, metadata, format detection and compression.

mod error;
pub use error::*;

pub mod types;
pub use types::*;

pub mod utils;
