//! Descriptive metadata of an MBTiles tileset.
//!
//! [`Metadata`] is assembled from the `name`/`value` rows of the archive's `metadata` table
//! through [`Metadata::apply`]. The `json` row carries the vector tile schema, which is
//! deserialized into [`LayerData`].

use crate::{LayerType, TileFormat};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata of a tileset, recomputed whenever it is requested.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Metadata {
	pub name: String,
	pub format: TileFormat,
	pub bounds: [f64; 4],
	pub center: [f64; 3],
	pub minzoom: u8,
	pub maxzoom: u8,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub description: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub version: String,
	#[serde(rename = "type")]
	pub layer_type: LayerType,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub attribution: String,
	#[serde(rename = "layerData", skip_serializing_if = "Option::is_none")]
	pub layer_data: Option<LayerData>,
}

impl Metadata {
	/// Apply one row of the `metadata` table.
	///
	/// Unknown keys are ignored. An unrecognized `format` becomes [`TileFormat::UNKNOWN`] and an
	/// unrecognized `type` becomes [`LayerType::BaseLayer`]; both are logged.
	///
	/// # Errors
	/// Fails if `minzoom`, `maxzoom`, `bounds`, `center` or `json` cannot be parsed.
	pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
		match key {
			"name" => self.name = value.to_string(),
			"description" => self.description = value.to_string(),
			"attribution" => self.attribution = value.to_string(),
			"version" => self.version = value.to_string(),
			"format" => {
				self.format = TileFormat::try_from_str(value).unwrap_or_else(|_| {
					warn!("unknown tile format '{value}' in metadata");
					TileFormat::UNKNOWN
				});
			}
			"type" => {
				self.layer_type = LayerType::try_from_str(value).unwrap_or_else(|_| {
					warn!("unknown layer type '{value}' in metadata, using '{}'", LayerType::BaseLayer);
					LayerType::BaseLayer
				});
			}
			"minzoom" => self.minzoom = parse_zoom(key, value)?,
			"maxzoom" => self.maxzoom = parse_zoom(key, value)?,
			"bounds" => self.bounds = parse_floats(key, value)?,
			"center" => self.center = parse_floats(key, value)?,
			"json" => {
				self.layer_data =
					Some(serde_json::from_str(value).context("parsing metadata field 'json' as layer data")?);
			}
			_ => {}
		}
		Ok(())
	}
}

fn parse_zoom(key: &str, value: &str) -> Result<u8> {
	value
		.trim()
		.parse::<u8>()
		.with_context(|| format!("parsing metadata field '{key}': '{value}' is not a zoom level"))
}

/// Parse a comma separated list of exactly `N` floats.
fn parse_floats<const N: usize>(key: &str, value: &str) -> Result<[f64; N]> {
	let parts: Vec<&str> = value.split(',').collect();
	ensure!(
		parts.len() == N,
		"parsing metadata field '{key}': expected {N} comma separated numbers, found {}",
		parts.len()
	);

	let mut result = [0.0; N];
	for (slot, part) in result.iter_mut().zip(parts) {
		*slot = part
			.trim()
			.parse::<f64>()
			.with_context(|| format!("parsing metadata field '{key}': '{part}' is not a number"))?;
	}
	Ok(result)
}

/// The vector tile schema stored in the `json` metadata row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vector_layers: Option<Vec<VectorLayer>>,
	#[serde(rename = "tilestats", skip_serializing_if = "Option::is_none")]
	pub tile_stats: Option<TileStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorLayer {
	pub id: String,
	#[serde(default)]
	pub fields: Map<String, Value>,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub description: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub minzoom: Option<u8>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub maxzoom: Option<u8>,
}

/// Feature statistics as written by tippecanoe and mapbox-geostats.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileStats {
	pub layer_count: u64,
	pub layers: Vec<LayerStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStats {
	#[serde(rename = "layer")]
	pub name: String,
	pub count: u64,
	pub geometry: String,
	pub attribute_count: u64,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub attributes: Vec<AttributeStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeStats {
	#[serde(rename = "attribute")]
	pub name: String,
	pub count: u64,
	#[serde(rename = "type")]
	pub value_type: String,
	#[serde(default)]
	pub values: Vec<Value>,
}
