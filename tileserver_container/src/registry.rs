//! The registry of all tilesets served by one process.
//!
//! The registry is built once at startup, either by [`TilesetRegistry::load_dir`] or from
//! already opened tilesets, and is read-only afterwards. Lookups therefore need no locking.

use crate::{MBTILES_EXTENSION, Tileset};
use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use log::{error, info};
use std::{
	collections::HashMap,
	fmt::Debug,
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};
use tileserver_core::TileError;

/// Maps tileset ids (file names without `.mbtiles`) to tilesets.
#[derive(Default)]
pub struct TilesetRegistry {
	tilesets: HashMap<String, Arc<Tileset>>,
}

impl TilesetRegistry {
	/// Opens every `*.mbtiles` file directly inside `path`.
	///
	/// At most `concurrency` archives are opened at the same time; 0 means one per CPU. Archives
	/// that fail to load are logged and left out.
	///
	/// # Errors
	/// Fails only if the directory itself cannot be read.
	pub async fn load_dir(path: &Path, concurrency: usize) -> Result<TilesetRegistry> {
		let files = list_archives(path).context("reading tileset directory failed")?;
		let concurrency = if concurrency == 0 { num_cpus::get() } else { concurrency };
		log::debug!("loading {} archive(s) from {path:?} with concurrency {concurrency}", files.len());

		let results: Vec<(PathBuf, Result<Tileset>)> = stream::iter(files)
			.map(|file| async move {
				let task_file = file.clone();
				let result = tokio::task::spawn_blocking(move || Tileset::open(&task_file)).await;
				match result {
					Ok(result) => (file, result),
					Err(e) => (file, Err(anyhow::anyhow!("loading task failed: {e}"))),
				}
			})
			.buffer_unordered(concurrency)
			.collect()
			.await;

		let mut tilesets = Vec::with_capacity(results.len());
		for (file, result) in results {
			match result {
				Ok(tileset) => tilesets.push(tileset),
				Err(e) => error!("Loading tileset {file:?} failed: {e:#}"),
			}
		}

		let registry = TilesetRegistry::from_tilesets(tilesets);
		info!("{} tileset(s) loaded successfully", registry.len());
		Ok(registry)
	}

	/// Builds a registry from opened tilesets, keyed by [`Tileset::id`].
	pub fn from_tilesets(tilesets: impl IntoIterator<Item = Tileset>) -> TilesetRegistry {
		TilesetRegistry {
			tilesets: tilesets
				.into_iter()
				.map(|tileset| (tileset.id().to_string(), Arc::new(tileset)))
				.collect(),
		}
	}

	/// # Errors
	/// [`TileError::TilesetNotFound`] if no tileset has this id.
	pub fn lookup(&self, id: &str) -> Result<&Arc<Tileset>> {
		self
			.tilesets
			.get(id)
			.ok_or_else(|| TileError::TilesetNotFound(id.to_string()).into())
	}

	/// All tileset ids in ascending order.
	pub fn ids(&self) -> Vec<&str> {
		let mut ids: Vec<&str> = self.tilesets.keys().map(String::as_str).collect();
		ids.sort_unstable();
		ids
	}

	pub fn len(&self) -> usize {
		self.tilesets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tilesets.is_empty()
	}
}

impl Debug for TilesetRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TilesetRegistry").field("ids", &self.ids()).finish()
	}
}

fn list_archives(path: &Path) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	for entry in fs::read_dir(path)? {
		let file = entry?.path();
		let is_archive = file
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(|name| name.len() > MBTILES_EXTENSION.len() && name.ends_with(MBTILES_EXTENSION));
		if is_archive && file.is_file() {
			files.push(file);
		}
	}
	files.sort();
	Ok(files)
}
