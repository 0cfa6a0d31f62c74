use super::{CorsConfig, ServerConfig, TilesetsConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Cross-Origin Resource Sharing (CORS) settings
	#[serde(default)]
	pub cors: CorsConfig,

	/// Tileset directory and loading
	#[serde(default)]
	pub tilesets: TilesetsConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))
	}

	/// Fills values that are still unset from environment variables.
	///
	/// `lookup` returns the value of a variable, e.g. `|key| std::env::var(key).ok()`.
	/// Empty values count as unset.
	pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

		if self.tilesets.directory.is_none() {
			self.tilesets.directory = get("TILE_DIR").map(PathBuf::from);
		}

		if self.server.host_url.is_none() {
			self.server.host_url = get("HOST_URL");
		}

		if self.cors.allowed_origins.is_empty() {
			if let Some(origins) = get("CORS_ALLOWED_ORIGINS") {
				self.cors.allowed_origins =
					CorsConfig::parse_origin_list(&origins).context("parsing CORS_ALLOWED_ORIGINS")?;
			}
		}

		Ok(())
	}

	pub fn validate(&self) -> Result<()> {
		self.server.validate()?;
		self.cors.validate()?;
		Ok(())
	}
}
