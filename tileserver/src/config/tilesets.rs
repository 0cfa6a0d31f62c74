use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_TILE_DIR: &str = "./tilesets";

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TilesetsConfig {
	/// Directory containing the `*.mbtiles` archives. Default: ./tilesets
	pub directory: Option<PathBuf>,

	/// How many archives are opened at the same time during startup.
	/// Default: number of CPUs
	pub concurrency: Option<usize>,
}

impl TilesetsConfig {
	pub fn override_optional_directory(&mut self, directory: &Option<PathBuf>) {
		if directory.is_some() {
			self.directory = directory.clone();
		}
	}

	pub fn override_optional_concurrency(&mut self, concurrency: &Option<usize>) {
		if concurrency.is_some() {
			self.concurrency = *concurrency;
		}
	}

	pub fn directory(&self) -> &Path {
		self.directory.as_deref().unwrap_or(Path::new(DEFAULT_TILE_DIR))
	}

	/// 0 lets the registry pick one task per CPU.
	pub fn concurrency(&self) -> usize {
		self.concurrency.unwrap_or(0)
	}
}
