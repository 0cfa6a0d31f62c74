//! Builders for MBTiles archives used in tests.

use anyhow::{Context, Result};
use r2d2_sqlite::rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use tileserver_core::{Blob, TileFormat, utils::compress};

/// A gzip-compressed stand-in for a vector tile.
pub fn pbf_tile(content: &str) -> Vec<u8> {
	compress(&Blob::from(content), TileFormat::GZIP)
		.expect("gzip compression of a test tile")
		.into_vec()
}

/// Writes an MBTiles archive with `tiles` and `metadata` tables.
///
/// Rows are passed as stored, so tile rows are in the TMS scheme.
pub struct ArchiveBuilder {
	path: PathBuf,
	conn: Connection,
}

impl ArchiveBuilder {
	pub fn create(path: &Path) -> Result<ArchiveBuilder> {
		let conn = Connection::open(path).with_context(|| format!("creating {path:?}"))?;
		conn.execute_batch(
			"CREATE TABLE metadata (name TEXT, value TEXT, UNIQUE (name));
			CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);
			CREATE UNIQUE INDEX tile_index ON tiles (zoom_level, tile_column, tile_row);",
		)?;
		Ok(ArchiveBuilder {
			path: path.to_path_buf(),
			conn,
		})
	}

	pub fn add_metadata(&self, name: &str, value: &str) -> Result<()> {
		self.conn.execute(
			"INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)",
			params![name, value],
		)?;
		Ok(())
	}

	pub fn add_tile(&self, level: u8, x: u32, y: u32, data: &[u8]) -> Result<()> {
		self.conn.execute(
			"INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
			params![level, x, y, data],
		)?;
		Ok(())
	}

	/// Creates the UTF grid layout of MBTiles 1.1: tables joined into the views `grids` and `grid_data`.
	pub fn create_grid_tables(&self) -> Result<()> {
		self.conn.execute_batch(
			"CREATE TABLE map (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, grid_id TEXT);
			CREATE TABLE grid_utfgrid (grid_id TEXT, grid_utfgrid BLOB);
			CREATE TABLE keymap (key_name TEXT, key_json TEXT, UNIQUE (key_name));
			CREATE TABLE grid_key (grid_id TEXT, key_name TEXT);
			CREATE VIEW grids AS
				SELECT map.zoom_level AS zoom_level, map.tile_column AS tile_column, map.tile_row AS tile_row,
					grid_utfgrid.grid_utfgrid AS grid
				FROM map JOIN grid_utfgrid ON grid_utfgrid.grid_id = map.grid_id;
			CREATE VIEW grid_data AS
				SELECT map.zoom_level AS zoom_level, map.tile_column AS tile_column, map.tile_row AS tile_row,
					keymap.key_name AS key_name, keymap.key_json AS key_json
				FROM map
				JOIN grid_key ON map.grid_id = grid_key.grid_id
				JOIN keymap ON grid_key.key_name = keymap.key_name;",
		)?;
		Ok(())
	}

	/// Adds a stored grid and its `(key_name, key_json)` pairs.
	pub fn add_grid(&self, level: u8, x: u32, y: u32, grid: &[u8], keys: &[(&str, &str)]) -> Result<()> {
		let grid_id = format!("{level}/{x}/{y}");
		self.conn.execute(
			"INSERT INTO map (zoom_level, tile_column, tile_row, grid_id) VALUES (?1, ?2, ?3, ?4)",
			params![level, x, y, grid_id],
		)?;
		self.conn.execute(
			"INSERT INTO grid_utfgrid (grid_id, grid_utfgrid) VALUES (?1, ?2)",
			params![grid_id, grid],
		)?;
		for (name, json) in keys {
			self.conn.execute(
				"INSERT OR REPLACE INTO keymap (key_name, key_json) VALUES (?1, ?2)",
				params![name, json],
			)?;
			self.conn.execute(
				"INSERT INTO grid_key (grid_id, key_name) VALUES (?1, ?2)",
				params![grid_id, name],
			)?;
		}
		Ok(())
	}

	/// Runs raw SQL, for layouts the other helpers do not cover.
	pub fn execute_batch(&self, sql: &str) -> Result<()> {
		self.conn.execute_batch(sql)?;
		Ok(())
	}

	/// Closes the connection and returns the path of the archive.
	pub fn finish(self) -> PathBuf {
		drop(self.conn);
		self.path
	}
}

/// Writes a minimal valid vector tile archive named `{id}.mbtiles` into `dir`.
pub fn write_vector_archive(dir: &Path, id: &str) -> Result<PathBuf> {
	let archive = ArchiveBuilder::create(&dir.join(format!("{id}.mbtiles")))?;
	archive.add_metadata("name", id)?;
	archive.add_metadata("format", "pbf")?;
	archive.add_tile(0, 0, 0, &pbf_tile(id))?;
	Ok(archive.finish())
}
