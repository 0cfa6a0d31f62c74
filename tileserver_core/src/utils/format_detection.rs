//! Classify tile and grid payloads by their leading bytes.
//!
//! The signatures are disjoint, so the order of the table does not matter. The one intended
//! overlap is semantic: gzip-compressed vector tiles start with the gzip signature. The
//! detector reports [`TileFormat::GZIP`] for both, and only callers that know the bytes came
//! from the tile table may reinterpret that as [`TileFormat::PBF`].

use crate::{TileError, TileFormat};
use anyhow::Result;

/// A signature is a list of byte strings, each expected at a fixed offset.
struct Signature {
	format: TileFormat,
	parts: &'static [(usize, &'static [u8])],
}

const SIGNATURES: &[Signature] = &[
	Signature {
		format: TileFormat::GZIP,
		parts: &[(0, b"\x1f\x8b")],
	},
	Signature {
		format: TileFormat::ZLIB,
		parts: &[(0, b"\x78\x9c")],
	},
	Signature {
		format: TileFormat::PNG,
		parts: &[(0, b"\x89PNG\r\n\x1a\n")],
	},
	Signature {
		format: TileFormat::JPG,
		parts: &[(0, b"\xff\xd8\xff")],
	},
	// bytes 4..8 hold the RIFF chunk size
	Signature {
		format: TileFormat::WEBP,
		parts: &[(0, b"RIFF"), (8, b"WEBPVP")],
	},
];

impl Signature {
	fn matches(&self, data: &[u8]) -> bool {
		self
			.parts
			.iter()
			.all(|(offset, bytes)| data.get(*offset..offset + bytes.len()) == Some(*bytes))
	}
}

/// Detect the format of `data` from its signature.
///
/// # Errors
/// [`TileError::UnknownTileFormat`] if no signature matches.
///
/// # Examples
/// ```
/// use tileserver_core::{TileFormat, utils::detect_tile_format};
///
/// assert_eq!(detect_tile_format(b"\x1f\x8b\x08\x00").unwrap(), TileFormat::GZIP);
/// assert!(detect_tile_format(b"hello").is_err());
/// ```
pub fn detect_tile_format(data: &[u8]) -> Result<TileFormat> {
	SIGNATURES
		.iter()
		.find(|signature| signature.matches(data))
		.map(|signature| signature.format)
		.ok_or_else(|| TileError::UnknownTileFormat.into())
}
