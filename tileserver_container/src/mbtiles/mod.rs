//! `SQLite` files `*.mbtiles` as tilesets
//!
//! - `Tileset`: validates an archive on open and reads tiles, UTF grids and metadata from it.
//! - `merge_grid_keys`: splices the key data of a UTF grid into its compressed JSON.

mod grid;
mod tileset;

pub use grid::merge_grid_keys;
pub use tileset::{MBTILES_EXTENSION, Tileset};
