//! This module defines the [`TileFormat`] enum, the closed set of payload encodings a tile or
//! grid blob can be classified as, together with its textual representation, MIME type and
//! HTTP content encoding.
//!
//! `GZIP` and `ZLIB` describe compression wrappers rather than tile contents. Vector tiles are
//! stored gzip-compressed, so a tile sampled from an archive that looks like `GZIP` is really a
//! `PBF` tile; see [`detect_tile_format`](crate::utils::detect_tile_format).
//!
//! # Examples
//!
//! ```rust
//! use tileserver_core::TileFormat;
//!
//! let format = TileFormat::try_from_str("pbf").unwrap();
//! assert_eq!(format, TileFormat::PBF);
//! assert_eq!(format.as_str(), "pbf");
//! assert_eq!(format.content_type(), Some("application/x-protobuf"));
//! assert_eq!(format.content_encoding(), Some("gzip"));
//!
//! assert!(TileFormat::try_from_str("tiff").is_err());
//! ```

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt::{Display, Formatter};

/// Enum representing the payload formats of tiles and grids.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileFormat {
	#[default]
	UNKNOWN,
	PBF,
	PNG,
	JPG,
	WEBP,
	GZIP,
	ZLIB,
}

impl TileFormat {
	/// Returns the lowercase string identifier used in MBTiles metadata and TileJSON.
	pub fn as_str(&self) -> &'static str {
		match self {
			TileFormat::UNKNOWN => "unknown",
			TileFormat::PBF => "pbf",
			TileFormat::PNG => "png",
			TileFormat::JPG => "jpg",
			TileFormat::WEBP => "webp",
			TileFormat::GZIP => "gzip",
			TileFormat::ZLIB => "zlib",
		}
	}

	/// Inverse of [`as_str`](Self::as_str). Unrecognized values are rejected.
	pub fn try_from_str(value: &str) -> Result<Self> {
		Ok(match value.trim() {
			"unknown" => TileFormat::UNKNOWN,
			"pbf" => TileFormat::PBF,
			"png" => TileFormat::PNG,
			"jpg" => TileFormat::JPG,
			"webp" => TileFormat::WEBP,
			"gzip" => TileFormat::GZIP,
			"zlib" => TileFormat::ZLIB,
			_ => bail!("invalid or unknown tile format: '{}'", value),
		})
	}

	/// Returns the MIME type of a tile in this format, if it is servable as a tile.
	///
	/// Vector tiles are served with `Content-Encoding: gzip`, see [`content_encoding`](Self::content_encoding).
	pub fn content_type(&self) -> Option<&'static str> {
		match self {
			TileFormat::PNG => Some("image/png"),
			TileFormat::JPG => Some("image/jpeg"),
			TileFormat::PBF => Some("application/x-protobuf"),
			TileFormat::WEBP => Some("image/webp"),
			TileFormat::UNKNOWN | TileFormat::GZIP | TileFormat::ZLIB => None,
		}
	}

	/// Returns the HTTP `Content-Encoding` a payload of this format is transferred with.
	pub fn content_encoding(&self) -> Option<&'static str> {
		match self {
			TileFormat::PBF | TileFormat::GZIP => Some("gzip"),
			TileFormat::ZLIB => Some("deflate"),
			TileFormat::UNKNOWN | TileFormat::PNG | TileFormat::JPG | TileFormat::WEBP => None,
		}
	}
}

impl Display for TileFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for TileFormat {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for TileFormat {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		TileFormat::try_from_str(&value).map_err(de::Error::custom)
	}
}
