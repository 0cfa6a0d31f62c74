//! Named error conditions that callers must be able to tell apart.
//!
//! All fallible functions in this workspace return [`anyhow::Result`]. The conditions that the
//! HTTP layer maps to specific status codes are raised as a [`TileError`] and can be recovered
//! from any `anyhow::Error` with [`TileError::find`], no matter how much context has been
//! layered on top of them.
//!
//! # Examples
//!
//! ```
//! use tileserver_core::TileError;
//!
//! let err = anyhow::Error::new(TileError::TileNotFound).context("fetching tile 3/2/1");
//! assert_eq!(TileError::find(&err), Some(&TileError::TileNotFound));
//! ```

use crate::TileFormat;
use std::fmt::{self, Display};

/// Errors with a meaning beyond "something failed".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileError {
	/// No tileset is registered under the given identifier.
	TilesetNotFound(String),
	/// The tile table has no row for the requested coordinate.
	TileNotFound,
	/// The grid view has no row for the requested coordinate.
	GridNotFound,
	/// The tileset was loaded without UTFGrid support.
	NoUtfGrid,
	/// A coordinate field could not be parsed as a number.
	MalformedTileCoord(String),
	/// A coordinate field was parsed but lies outside `[0, 2^zoom)`.
	TileCoordOutOfRange { axis: char, value: u64, zoom: u8 },
	/// No signature of the format table matched.
	UnknownTileFormat,
	/// The format was detected but cannot be served.
	UnsupportedTileFormat(TileFormat),
}

impl TileError {
	/// Searches the cause chain of `err` for a [`TileError`].
	pub fn find(err: &anyhow::Error) -> Option<&TileError> {
		err.downcast_ref::<TileError>()
			.or_else(|| err.chain().find_map(|cause| cause.downcast_ref::<TileError>()))
	}

	/// Tile, grid or UTFGrid support is missing. Not a failure of the server.
	pub fn is_no_content(&self) -> bool {
		matches!(self, TileError::TileNotFound | TileError::GridNotFound | TileError::NoUtfGrid)
	}

	/// Malformed or out-of-range tile coordinates.
	pub fn is_invalid_coord(&self) -> bool {
		matches!(
			self,
			TileError::MalformedTileCoord(_) | TileError::TileCoordOutOfRange { .. }
		)
	}
}

impl Display for TileError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TileError::TilesetNotFound(id) => write!(f, "tileset '{id}' not found"),
			TileError::TileNotFound => f.write_str("tile not found"),
			TileError::GridNotFound => f.write_str("grid not found"),
			TileError::NoUtfGrid => f.write_str("tileset does not contain UTF grids"),
			TileError::MalformedTileCoord(cause) => write!(f, "tile coordinates are not valid: {cause}"),
			TileError::TileCoordOutOfRange { axis, value, zoom } => write!(
				f,
				"tile coordinates are not valid: {axis} coordinate ({value}) is out of bounds for zoom level {zoom}"
			),
			TileError::UnknownTileFormat => f.write_str("unknown tile format pattern"),
			TileError::UnsupportedTileFormat(format) => {
				write!(f, "the tile format '{format}' is currently not supported")
			}
		}
	}
}

impl std::error::Error for TileError {}
