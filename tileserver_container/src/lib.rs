//! Tilesets backed by MBTiles archives and the registry that serves them.
//!
//! A [`Tileset`] is opened once, validated and then only read. The [`TilesetRegistry`] loads every
//! archive of a directory concurrently and maps tileset ids to shared tilesets.

pub mod mbtiles;
pub use mbtiles::*;

mod registry;
pub use registry::*;

#[cfg(any(test, feature = "test"))]
pub mod testing;
