//! The TileJSON 2.2.0 manifest of a tileset.
//!
//! # Examples
//!
//! ```
//! use tileserver_core::{Metadata, TileFormat, TileJson};
//!
//! let mut metadata = Metadata::default();
//! metadata.apply("name", "Interchange").unwrap();
//!
//! let tilejson = TileJson::new(&metadata, TileFormat::PBF, "https://tiles.example.org/v1/interchange", "", false);
//! assert_eq!(tilejson.tiles, ["https://tiles.example.org/v1/interchange/tiles/{z}/{x}/{y}.pbf"]);
//! assert!(tilejson.grids.is_none());
//! ```

use crate::{LayerData, Metadata, TileFormat};
use serde::Serialize;

pub const TILEJSON_VERSION: &str = "2.2.0";
pub const TILEJSON_SCHEME: &str = "xyz";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileJson {
	pub tilejson: &'static str,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub name: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub description: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub version: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub attribution: String,
	pub scheme: &'static str,
	pub tiles: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub grids: Option<Vec<String>>,
	pub minzoom: u8,
	pub maxzoom: u8,
	pub bounds: [f64; 4],
	pub center: [f64; 3],
	pub format: String,
	#[serde(rename = "type")]
	pub layer_type: String,
	#[serde(flatten)]
	pub layer_data: Option<LayerData>,
}

impl TileJson {
	/// Build the manifest of a tileset reachable under `base_url`.
	///
	/// `format` is the detected tile format and determines the extension of the tile URL
	/// template. `query` is appended verbatim to every template and is expected to be empty or
	/// to start with `?`. Grid templates are only listed if `has_grids` is set.
	#[must_use]
	pub fn new(metadata: &Metadata, format: TileFormat, base_url: &str, query: &str, has_grids: bool) -> TileJson {
		let base_url = base_url.trim_end_matches('/');
		TileJson {
			tilejson: TILEJSON_VERSION,
			name: metadata.name.clone(),
			description: metadata.description.clone(),
			version: metadata.version.clone(),
			attribution: metadata.attribution.clone(),
			scheme: TILEJSON_SCHEME,
			tiles: vec![format!("{base_url}/tiles/{{z}}/{{x}}/{{y}}.{format}{query}")],
			grids: has_grids.then(|| vec![format!("{base_url}/tiles/{{z}}/{{x}}/{{y}}.json{query}")]),
			minzoom: metadata.minzoom,
			maxzoom: metadata.maxzoom,
			bounds: metadata.bounds,
			center: metadata.center,
			format: metadata.format.to_string(),
			layer_type: metadata.layer_type.to_string(),
			layer_data: metadata.layer_data.clone(),
		}
	}
}
