use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tileserver_core::{Blob, TileError, TileFormat, utils};

/// Set the `data` field of a compressed UTF grid to `keys`.
///
/// The grid is decompressed with `codec`, parsed as a JSON object, extended and compressed again
/// with the same codec. Without keys the grid is returned unchanged.
///
/// # Errors
/// [`TileError::UnsupportedTileFormat`] if `codec` is neither gzip nor zlib. Fails if the grid
/// cannot be decompressed or is not a JSON object.
pub fn merge_grid_keys(grid: Blob, codec: TileFormat, keys: Map<String, Value>) -> Result<Blob> {
	if keys.is_empty() {
		return Ok(grid);
	}

	if !matches!(codec, TileFormat::GZIP | TileFormat::ZLIB) {
		return Err(TileError::UnsupportedTileFormat(codec)).context("merging UTF grid keys");
	}

	let json = utils::decompress(&grid, codec)?;
	let mut object: Map<String, Value> =
		serde_json::from_slice(json.as_slice()).context("parsing UTF grid as JSON object")?;
	object.insert(String::from("data"), Value::Object(keys));

	let json = serde_json::to_vec(&object).context("encoding UTF grid")?;
	utils::compress(&Blob::from(json), codec)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use serde_json::json;

	fn grid(codec: TileFormat) -> Blob {
		let json = json!({"grid": ["  ", " !"], "keys": ["", "7"]});
		utils::compress(&Blob::from(json.to_string()), codec).unwrap()
	}

	fn keys() -> Map<String, Value> {
		let mut keys = Map::new();
		keys.insert(String::from("7"), json!({"name": "Dorms", "floors": 3}));
		keys
	}

	#[rstest]
	#[case(TileFormat::GZIP)]
	#[case(TileFormat::ZLIB)]
	fn merged_grid_keeps_its_codec(#[case] codec: TileFormat) -> Result<()> {
		let merged = merge_grid_keys(grid(codec), codec, keys())?;
		assert_eq!(utils::detect_tile_format(merged.as_slice())?, codec);

		let json: Value = serde_json::from_slice(utils::decompress(&merged, codec)?.as_slice())?;
		assert_eq!(
			json,
			json!({
				"grid": ["  ", " !"],
				"keys": ["", "7"],
				"data": {"7": {"name": "Dorms", "floors": 3}}
			})
		);
		Ok(())
	}

	#[test]
	fn existing_data_is_replaced() -> Result<()> {
		let raw = json!({"grid": [], "keys": [], "data": {"old": 1}}).to_string();
		let grid = utils::compress(&Blob::from(raw), TileFormat::ZLIB)?;
		let merged = merge_grid_keys(grid, TileFormat::ZLIB, keys())?;
		let json: Value = serde_json::from_slice(utils::decompress(&merged, TileFormat::ZLIB)?.as_slice())?;
		assert_eq!(json["data"], json!({"7": {"name": "Dorms", "floors": 3}}));
		Ok(())
	}

	#[test]
	fn without_keys_the_bytes_are_untouched() -> Result<()> {
		let original = Blob::from("not even compressed");
		assert_eq!(merge_grid_keys(original.clone(), TileFormat::PNG, Map::new())?, original);
		Ok(())
	}

	#[test]
	fn unsupported_codec() {
		let err = merge_grid_keys(grid(TileFormat::GZIP), TileFormat::PNG, keys()).unwrap_err();
		assert_eq!(
			TileError::find(&err),
			Some(&TileError::UnsupportedTileFormat(TileFormat::PNG))
		);
	}

	#[test]
	fn grid_must_be_a_json_object() {
		let grid = utils::compress(&Blob::from("[1,2,3]"), TileFormat::GZIP).unwrap();
		assert!(merge_grid_keys(grid, TileFormat::GZIP, keys()).is_err());
	}
}
