//! The MBTiles `type` metadata value.

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt::{Display, Formatter};

/// Whether a tileset is meant to be shown as a base map or on top of one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerType {
	#[default]
	BaseLayer,
	Overlay,
}

impl LayerType {
	pub fn as_str(&self) -> &'static str {
		match self {
			LayerType::BaseLayer => "baselayer",
			LayerType::Overlay => "overlay",
		}
	}

	/// Inverse of [`as_str`](Self::as_str). Unrecognized values are rejected.
	pub fn try_from_str(value: &str) -> Result<Self> {
		Ok(match value.trim() {
			"baselayer" => LayerType::BaseLayer,
			"overlay" => LayerType::Overlay,
			_ => bail!("invalid or unknown layer type: '{}'", value),
		})
	}
}

impl Display for LayerType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for LayerType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for LayerType {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		LayerType::try_from_str(&value).map_err(de::Error::custom)
	}
}
