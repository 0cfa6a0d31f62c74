//! Gzip and zlib codecs used by tiles and UTF grids.

use crate::{Blob, TileFormat};
use anyhow::{Context, Result, bail};
use flate2::{
	Compression,
	bufread::{GzDecoder, GzEncoder, ZlibDecoder, ZlibEncoder},
};
use std::io::Read;

/// Compress `blob` with the codec named by `format`.
///
/// # Errors
/// Fails if `format` is not [`TileFormat::GZIP`] or [`TileFormat::ZLIB`].
pub fn compress(blob: &Blob, format: TileFormat) -> Result<Blob> {
	let mut compressed = Vec::new();
	match format {
		TileFormat::GZIP => GzEncoder::new(blob.as_slice(), Compression::default())
			.read_to_end(&mut compressed)
			.context("Failed to compress data using Gzip")?,
		TileFormat::ZLIB => ZlibEncoder::new(blob.as_slice(), Compression::default())
			.read_to_end(&mut compressed)
			.context("Failed to compress data using Zlib")?,
		_ => bail!("cannot compress with '{format}', only gzip and zlib are supported"),
	};
	Ok(Blob::from(compressed))
}

/// Decompress `blob` with the codec named by `format`.
///
/// # Errors
/// Fails if `format` is not [`TileFormat::GZIP`] or [`TileFormat::ZLIB`], or if the data is
/// not valid for that codec.
pub fn decompress(blob: &Blob, format: TileFormat) -> Result<Blob> {
	let mut decompressed = Vec::new();
	match format {
		TileFormat::GZIP => GzDecoder::new(blob.as_slice())
			.read_to_end(&mut decompressed)
			.context("Failed to decompress data using Gzip")?,
		TileFormat::ZLIB => ZlibDecoder::new(blob.as_slice())
			.read_to_end(&mut decompressed)
			.context("Failed to decompress data using Zlib")?,
		_ => bail!("cannot decompress with '{format}', only gzip and zlib are supported"),
	};
	Ok(Blob::from(decompressed))
}
