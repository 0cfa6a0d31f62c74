//! Read tiles, UTF grids and metadata from an MBTiles (SQLite) archive.
//!
//! Opening a [`Tileset`] validates the archive once:
//!
//! - the relations `tiles` and `metadata` must exist,
//! - a sample row of `tiles` must be a gzip-compressed vector tile (`pbf`),
//! - if the UTF grid relations `grids`, `grid_data`, `grid_utfgrid`, `keymap` and `grid_key` exist
//!   and `grid_utfgrid` holds at least one row, its codec is detected and grids are enabled.
//!
//! Afterwards the tileset is immutable. Every read is a self-contained query on a pooled,
//! read-only connection.
//!
//! Tile rows are addressed in the TMS scheme, which is what [`TileCoord::parse`] produces.
//!
//! ```rust,no_run
//! use tileserver_container::Tileset;
//! use tileserver_core::TileCoord;
//! use anyhow::Result;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let tileset = Tileset::open(Path::new("tilesets/customs.mbtiles"))?;
//!     let tile = tileset.get_tile(&TileCoord::parse("3", "4", "2.pbf")?)?;
//!     println!("{} bytes of {}", tile.len(), tileset.format());
//!     Ok(())
//! }
//! ```

use super::grid::merge_grid_keys;
use anyhow::{Context, Result, bail, ensure};
use log::{debug, trace};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension},
};
use serde_json::{Map, Value};
use std::{
	fmt::Debug,
	fs,
	path::Path,
	time::{Duration, SystemTime, UNIX_EPOCH},
};
use tileserver_core::{Blob, Metadata, TileCoord, TileError, TileFormat, utils::detect_tile_format};

/// File extension of MBTiles archives, including the dot.
pub const MBTILES_EXTENSION: &str = ".mbtiles";

const POOL_SIZE: u32 = 10;

/// An opened, validated MBTiles archive.
pub struct Tileset {
	name: String,
	format: TileFormat,
	timestamp: SystemTime,
	grid_format: Option<TileFormat>,
	pool: Pool<SqliteConnectionManager>,
}

impl Tileset {
	/// Open and validate the archive at `path`.
	///
	/// # Errors
	/// Fails if the file cannot be read, a required relation is missing, the sample tile is not a
	/// vector tile or the sample grid has no known signature.
	pub fn open(path: &Path) -> Result<Tileset> {
		Self::load(path).with_context(|| format!("loading MBTiles at '{}'", path.display()))
	}

	fn load(path: &Path) -> Result<Tileset> {
		debug!("open {path:?}");

		let file_meta = fs::metadata(path).context("could not read file stats of the archive")?;
		ensure!(file_meta.is_file(), "{path:?} is not a file");
		let timestamp = round_to_second(file_meta.modified()?)?;

		let name = path
			.file_name()
			.and_then(|name| name.to_str())
			.with_context(|| format!("{path:?} has no valid file name"))?
			.to_string();

		let manager = SqliteConnectionManager::file(path)
			.with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX);
		let pool = Pool::builder()
			.max_size(POOL_SIZE)
			.min_idle(Some(1))
			.build(manager)
			.context("opening SQLite connection pool")?;

		let mut tileset = Tileset {
			name,
			format: TileFormat::UNKNOWN,
			timestamp,
			grid_format: None,
			pool,
		};

		tileset.check_required_tables()?;
		tileset.format = tileset.sample_tile_format()?;
		tileset.grid_format = tileset.sample_grid_format()?;

		debug!("opened {tileset:?}");
		Ok(tileset)
	}

	fn count_relations(&self, names: &[&str]) -> Result<usize> {
		let list = names
			.iter()
			.map(|name| format!("'{name}'"))
			.collect::<Vec<_>>()
			.join(", ");
		let sql = format!("SELECT COUNT(*) FROM sqlite_master WHERE name IN ({list})");
		trace!("SQL: {sql}");

		let conn = self.pool.get()?;
		let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
		Ok(usize::try_from(count)?)
	}

	fn check_required_tables(&self) -> Result<()> {
		let count = self.count_relations(&["tiles", "metadata"])?;
		ensure!(count >= 2, "missing required table: 'tiles' or 'metadata'");
		Ok(())
	}

	fn sample_tile_format(&self) -> Result<TileFormat> {
		let conn = self.pool.get()?;
		let sample: Vec<u8> = conn
			.query_row("SELECT tile_data FROM tiles LIMIT 1", [], |row| row.get(0))
			.context("reading a sample tile")?;

		// gzip is how vector tiles are stored
		let format = match detect_tile_format(&sample)? {
			TileFormat::GZIP => TileFormat::PBF,
			format => format,
		};

		if format != TileFormat::PBF {
			return Err(TileError::UnsupportedTileFormat(format).into());
		}
		Ok(format)
	}

	fn sample_grid_format(&self) -> Result<Option<TileFormat>> {
		let count = self.count_relations(&["grids", "grid_data", "grid_utfgrid", "keymap", "grid_key"])?;
		if count != 5 {
			return Ok(None);
		}

		// `grid_utfgrid` is sampled directly, joining through `grids` can be slow on large archives
		let conn = self.pool.get()?;
		let sample: Option<Vec<u8>> = conn
			.query_row("SELECT grid_utfgrid FROM grid_utfgrid LIMIT 1", [], |row| row.get(0))
			.optional()
			.context("could not read sample grid to determine type")?;

		match sample {
			None => Ok(None),
			Some(sample) => Ok(Some(
				detect_tile_format(&sample).context("could not determine UTF grid compression type")?,
			)),
		}
	}

	/// Returns the raw bytes of the tile at `coord`.
	///
	/// # Errors
	/// [`TileError::TileNotFound`] if the archive has no such tile.
	pub fn get_tile(&self, coord: &TileCoord) -> Result<Blob> {
		trace!("get tile {coord:?} from '{}'", self.name);

		let conn = self.pool.get()?;
		let data: Option<Vec<u8>> = conn
			.query_row(
				"SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
				sql_params(coord)?,
				|row| row.get(0),
			)
			.optional()
			.with_context(|| format!("reading tile {coord} from '{}'", self.name))?;

		data.map(Blob::from).ok_or_else(|| TileError::TileNotFound.into())
	}

	/// Returns the UTF grid at `coord` with its key data merged into the `data` field.
	///
	/// The grid keeps the compression it is stored with, see [`grid_format`](Self::grid_format).
	///
	/// # Errors
	/// [`TileError::NoUtfGrid`] if the tileset has no grids, [`TileError::GridNotFound`] if there
	/// is no grid at `coord`.
	pub fn get_grid(&self, coord: &TileCoord) -> Result<Blob> {
		let Some(codec) = self.grid_format else {
			return Err(TileError::NoUtfGrid.into());
		};
		trace!("get grid {coord:?} from '{}'", self.name);

		let params = sql_params(coord)?;
		let conn = self.pool.get()?;

		let grid: Vec<u8> = conn
			.query_row(
				"SELECT grid FROM grids WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
				params,
				|row| row.get(0),
			)
			.optional()
			.with_context(|| format!("reading grid {coord} from '{}'", self.name))?
			.ok_or(TileError::GridNotFound)?;

		let mut stmt = conn
			.prepare("SELECT CAST(key_name AS TEXT), CAST(key_json AS TEXT) FROM grid_data WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3")
			.context("cannot fetch grid data")?;
		let rows = stmt.query_map(params, |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

		let mut keys = Map::new();
		for row in rows {
			let (name, json) = row.context("could not fetch grid data")?;
			let value: Value =
				serde_json::from_str(&json).with_context(|| format!("parsing JSON of grid key '{name}'"))?;
			keys.insert(name, value);
		}

		merge_grid_keys(Blob::from(grid), codec, keys)
	}

	/// Reads the `metadata` table.
	///
	/// If `maxzoom` is missing or 0, the zoom range is taken from the `tiles` table instead.
	///
	/// # Errors
	/// Fails if a value cannot be parsed or a query fails.
	pub fn get_metadata(&self) -> Result<Metadata> {
		self
			.read_metadata()
			.with_context(|| format!("reading metadata of '{}'", self.name))
	}

	fn read_metadata(&self) -> Result<Metadata> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare(
			"SELECT CAST(name AS TEXT), CAST(value AS TEXT) FROM metadata WHERE value IS NOT NULL AND value != ''",
		)?;
		let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

		let mut metadata = Metadata::default();
		for row in rows {
			let (key, value) = row?;
			metadata.apply(&key, &value)?;
		}

		if metadata.maxzoom == 0 {
			let (min, max): (Option<i64>, Option<i64>) =
				conn.query_row("SELECT MIN(zoom_level), MAX(zoom_level) FROM tiles", [], |row| {
					Ok((row.get(0)?, row.get(1)?))
				})?;
			let (Some(min), Some(max)) = (min, max) else {
				bail!("cannot derive the zoom range, the tiles table is empty");
			};
			metadata.minzoom = u8::try_from(min).with_context(|| format!("minimum zoom level {min} is invalid"))?;
			metadata.maxzoom = u8::try_from(max).with_context(|| format!("maximum zoom level {max} is invalid"))?;
		}

		Ok(metadata)
	}

	/// The file name of the archive.
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The file name without the `.mbtiles` extension.
	#[must_use]
	pub fn id(&self) -> &str {
		self.name.strip_suffix(MBTILES_EXTENSION).unwrap_or(&self.name)
	}

	#[must_use]
	pub fn format(&self) -> TileFormat {
		self.format
	}

	/// The MIME type of the tiles.
	#[must_use]
	pub fn content_type(&self) -> Option<&'static str> {
		self.format.content_type()
	}

	/// Modification time of the archive, rounded to the nearest second.
	#[must_use]
	pub fn timestamp(&self) -> SystemTime {
		self.timestamp
	}

	#[must_use]
	pub fn has_utf_grid(&self) -> bool {
		self.grid_format.is_some()
	}

	/// Compression of the stored UTF grids, `None` if the tileset has none.
	#[must_use]
	pub fn grid_format(&self) -> Option<TileFormat> {
		self.grid_format
	}

	/// Releases the connection pool.
	pub fn close(self) {
		debug!("close '{}'", self.name);
	}
}

impl Debug for Tileset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Tileset")
			.field("name", &self.name)
			.field("format", &self.format)
			.field("grid_format", &self.grid_format)
			.finish_non_exhaustive()
	}
}

fn sql_params(coord: &TileCoord) -> Result<[i64; 3]> {
	Ok([i64::from(coord.level), i64::try_from(coord.x)?, i64::try_from(coord.y)?])
}

fn round_to_second(time: SystemTime) -> Result<SystemTime> {
	let since_epoch = time
		.duration_since(UNIX_EPOCH)
		.context("modification time lies before the unix epoch")?;
	let mut seconds = since_epoch.as_secs();
	if since_epoch.subsec_nanos() >= 500_000_000 {
		seconds += 1;
	}
	Ok(UNIX_EPOCH + Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{ArchiveBuilder, pbf_tile};
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use tempfile::TempDir;
	use tileserver_core::{LayerType, utils};

	fn gzip(text: &str) -> Vec<u8> {
		utils::compress(&Blob::from(text), TileFormat::GZIP).unwrap().into_vec()
	}

	fn zlib(text: &str) -> Vec<u8> {
		utils::compress(&Blob::from(text), TileFormat::ZLIB).unwrap().into_vec()
	}

	fn find_err(result: Result<impl Debug>) -> TileError {
		let err = result.unwrap_err();
		TileError::find(&err).cloned().unwrap_or_else(|| panic!("not a TileError: {err:?}"))
	}

	fn vector_archive(dir: &TempDir) -> ArchiveBuilder {
		let archive = ArchiveBuilder::create(&dir.path().join("woods.mbtiles")).unwrap();
		archive.add_tile(0, 0, 0, &pbf_tile("z0")).unwrap();
		archive.add_tile(3, 2, 6, &pbf_tile("z3")).unwrap();
		archive
	}

	#[test]
	fn open_vector_archive() -> Result<()> {
		let dir = TempDir::new()?;
		let path = vector_archive(&dir).finish();
		let tileset = Tileset::open(&path)?;

		assert_eq!(tileset.name(), "woods.mbtiles");
		assert_eq!(tileset.id(), "woods");
		assert_eq!(tileset.format(), TileFormat::PBF);
		assert_eq!(tileset.content_type(), Some("application/x-protobuf"));
		assert!(!tileset.has_utf_grid());
		assert_eq!(tileset.grid_format(), None);

		let since_epoch = tileset.timestamp().duration_since(UNIX_EPOCH)?;
		assert_eq!(since_epoch.subsec_nanos(), 0);
		assert!(tileset.timestamp() <= SystemTime::now() + Duration::from_secs(1));

		assert_eq!(format!("{tileset:?}"), "Tileset { name: \"woods.mbtiles\", format: PBF, grid_format: None, .. }");
		tileset.close();
		Ok(())
	}

	#[rstest]
	#[case(b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR".to_vec(), TileFormat::PNG)]
	#[case(b"\xff\xd8\xff\xe0\x00\x10JFIF".to_vec(), TileFormat::JPG)]
	#[case(b"RIFF\x24\x1a\x00\x00WEBPVP8 ".to_vec(), TileFormat::WEBP)]
	#[case(zlib("zlib wrapped"), TileFormat::ZLIB)]
	fn non_vector_archives_are_rejected(#[case] sample: Vec<u8>, #[case] format: TileFormat) {
		let dir = TempDir::new().unwrap();
		let archive = ArchiveBuilder::create(&dir.path().join("raster.mbtiles")).unwrap();
		archive.add_tile(0, 0, 0, &sample).unwrap();
		assert_eq!(
			find_err(Tileset::open(&archive.finish())),
			TileError::UnsupportedTileFormat(format)
		);
	}

	#[test]
	fn unknown_sample_is_rejected() {
		let dir = TempDir::new().unwrap();
		let archive = ArchiveBuilder::create(&dir.path().join("text.mbtiles")).unwrap();
		archive.add_tile(0, 0, 0, b"plain text").unwrap();
		assert_eq!(find_err(Tileset::open(&archive.finish())), TileError::UnknownTileFormat);
	}

	#[test]
	fn empty_tiles_table_is_rejected() {
		let dir = TempDir::new().unwrap();
		let path = ArchiveBuilder::create(&dir.path().join("empty.mbtiles")).unwrap().finish();
		let err = Tileset::open(&path).unwrap_err();
		assert!(format!("{err:#}").contains("reading a sample tile"), "{err:#}");
	}

	#[rstest]
	#[case("CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB)")]
	#[case("CREATE TABLE metadata (name TEXT, value TEXT)")]
	#[case("CREATE TABLE other (a INTEGER)")]
	fn missing_tables_are_rejected(#[case] sql: &str) {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("broken.mbtiles");
		let conn = r2d2_sqlite::rusqlite::Connection::open(&path).unwrap();
		conn.execute_batch(sql).unwrap();
		drop(conn);

		let err = Tileset::open(&path).unwrap_err();
		assert!(
			format!("{err:#}").contains("missing required table: 'tiles' or 'metadata'"),
			"{err:#}"
		);
	}

	#[test]
	fn not_an_sqlite_file() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("garbage.mbtiles");
		fs::write(&path, "this is not a database, but it is long enough to look like one".repeat(10))?;
		assert!(Tileset::open(&path).is_err());
		assert!(Tileset::open(&dir.path().join("missing.mbtiles")).is_err());
		assert!(Tileset::open(dir.path()).is_err());
		Ok(())
	}

	#[test]
	fn get_tile() -> Result<()> {
		let dir = TempDir::new()?;
		let tileset = Tileset::open(&vector_archive(&dir).finish())?;

		assert_eq!(tileset.get_tile(&TileCoord::new(0, 0, 0)?)?, Blob::from(pbf_tile("z0")));
		// XYZ 3/2/1 is stored in TMS row 6
		assert_eq!(tileset.get_tile(&TileCoord::parse("3", "2", "1.pbf")?)?, Blob::from(pbf_tile("z3")));

		assert_eq!(find_err(tileset.get_tile(&TileCoord::new(3, 2, 1)?)), TileError::TileNotFound);
		assert_eq!(find_err(tileset.get_tile(&TileCoord::new(1, 0, 0)?)), TileError::TileNotFound);
		Ok(())
	}

	#[rstest]
	#[case(0, 0, 0)]
	#[case(3, 2, 6)]
	#[case(10, 512, 511)]
	fn no_grids_for_any_coordinate(#[case] level: u8, #[case] x: u64, #[case] y: u64) -> Result<()> {
		let dir = TempDir::new()?;
		let tileset = Tileset::open(&vector_archive(&dir).finish())?;
		assert_eq!(find_err(tileset.get_grid(&TileCoord::new(level, x, y)?)), TileError::NoUtfGrid);
		Ok(())
	}

	#[test]
	fn empty_grid_tables_disable_grids() -> Result<()> {
		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		archive.create_grid_tables()?;
		let tileset = Tileset::open(&archive.finish())?;
		assert!(!tileset.has_utf_grid());
		assert_eq!(find_err(tileset.get_grid(&TileCoord::new(0, 0, 0)?)), TileError::NoUtfGrid);
		Ok(())
	}

	#[rstest]
	#[case(TileFormat::GZIP)]
	#[case(TileFormat::ZLIB)]
	fn grids(#[case] codec: TileFormat) -> Result<()> {
		let compress = |text: &str| if codec == TileFormat::GZIP { gzip(text) } else { zlib(text) };
		let raw_grid = r#"{"grid":["  ","!!"],"keys":["","12"]}"#;

		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		archive.create_grid_tables()?;
		archive.add_grid(0, 0, 0, &compress(raw_grid), &[])?;
		archive.add_grid(1, 1, 0, &compress(raw_grid), &[("12", r#"{"name":"Crane","height":31.5}"#)])?;
		let tileset = Tileset::open(&archive.finish())?;

		assert!(tileset.has_utf_grid());
		assert_eq!(tileset.grid_format(), Some(codec));

		// without keys the stored bytes are returned as they are
		let plain = tileset.get_grid(&TileCoord::new(0, 0, 0)?)?;
		assert_eq!(plain.as_slice(), compress(raw_grid).as_slice());

		let merged = tileset.get_grid(&TileCoord::new(1, 1, 0)?)?;
		assert_eq!(utils::detect_tile_format(merged.as_slice())?, codec);
		let json: Value = serde_json::from_slice(utils::decompress(&merged, codec)?.as_slice())?;
		assert_eq!(
			json,
			serde_json::json!({
				"grid": ["  ", "!!"],
				"keys": ["", "12"],
				"data": {"12": {"name": "Crane", "height": 31.5}}
			})
		);

		assert_eq!(find_err(tileset.get_grid(&TileCoord::new(1, 0, 0)?)), TileError::GridNotFound);
		Ok(())
	}

	#[test]
	fn unknown_grid_codec_fails_on_open() -> Result<()> {
		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		archive.create_grid_tables()?;
		archive.add_grid(0, 0, 0, b"{\"grid\":[]}", &[])?;
		assert_eq!(find_err(Tileset::open(&archive.finish())), TileError::UnknownTileFormat);
		Ok(())
	}

	#[test]
	fn unreadable_grid_sample_fails_on_open() -> Result<()> {
		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		archive.execute_batch(
			"CREATE TABLE grids (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, grid BLOB);
			CREATE TABLE grid_data (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, key_name TEXT, key_json TEXT);
			CREATE TABLE grid_utfgrid (grid_id TEXT, utfgrid BLOB);
			CREATE TABLE keymap (key_name TEXT, key_json TEXT);
			CREATE TABLE grid_key (grid_id TEXT, key_name TEXT);",
		)?;
		let err = Tileset::open(&archive.finish()).unwrap_err();
		assert!(format!("{err:#}").contains("could not read sample grid"), "{err:#}");
		Ok(())
	}

	#[test]
	fn numeric_cells_are_read_as_text() -> Result<()> {
		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		archive.create_grid_tables()?;
		archive.add_grid(0, 0, 0, &gzip(r#"{"grid":[" "],"keys":["1"]}"#), &[])?;
		archive.execute_batch("INSERT INTO grid_key (grid_id, key_name) VALUES ('0/0/0', '1');")?;
		// columns without a declared type keep integers as integers
		archive.execute_batch(
			"DROP TABLE metadata;
			CREATE TABLE metadata (name, value);
			INSERT INTO metadata (name, value) VALUES ('minzoom', 1), ('maxzoom', 5);
			DROP TABLE keymap;
			CREATE TABLE keymap (key_name, key_json);
			INSERT INTO keymap (key_name, key_json) VALUES ('1', 42);",
		)?;
		let path = archive.finish();

		let conn = r2d2_sqlite::rusqlite::Connection::open(&path)?;
		let kind: String = conn.query_row("SELECT typeof(value) FROM metadata WHERE name = 'maxzoom'", [], |row| {
			row.get(0)
		})?;
		assert_eq!(kind, "integer");
		drop(conn);

		let tileset = Tileset::open(&path)?;
		let metadata = tileset.get_metadata()?;
		assert_eq!((metadata.minzoom, metadata.maxzoom), (1, 5));

		let merged = tileset.get_grid(&TileCoord::new(0, 0, 0)?)?;
		let json: Value = serde_json::from_slice(utils::decompress(&merged, TileFormat::GZIP)?.as_slice())?;
		assert_eq!(json["data"], serde_json::json!({"1": 42}));
		Ok(())
	}

	#[test]
	fn metadata() -> Result<()> {
		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		for (key, value) in [
			("name", "Woods"),
			("format", "pbf"),
			("type", "overlay"),
			("minzoom", "2"),
			("maxzoom", "5"),
			("bounds", "-1.5,-2,3,4"),
			("center", "1,2,3"),
			("description", ""),
			("json", r#"{"vector_layers":[{"id":"trees","fields":{}}]}"#),
		] {
			archive.add_metadata(key, value)?;
		}
		let metadata = Tileset::open(&archive.finish())?.get_metadata()?;

		assert_eq!(metadata.name, "Woods");
		assert_eq!(metadata.format, TileFormat::PBF);
		assert_eq!(metadata.layer_type, LayerType::Overlay);
		assert_eq!((metadata.minzoom, metadata.maxzoom), (2, 5));
		assert_eq!(metadata.bounds, [-1.5, -2.0, 3.0, 4.0]);
		assert_eq!(metadata.center, [1.0, 2.0, 3.0]);
		assert_eq!(metadata.description, "");
		assert_eq!(metadata.layer_data.unwrap().vector_layers.unwrap()[0].id, "trees");
		Ok(())
	}

	#[rstest]
	#[case(None)]
	#[case(Some("0"))]
	fn zoom_range_falls_back_to_tiles(#[case] maxzoom: Option<&str>) -> Result<()> {
		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		archive.add_tile(7, 1, 1, &pbf_tile("z7"))?;
		archive.add_metadata("minzoom", "4")?;
		if let Some(maxzoom) = maxzoom {
			archive.add_metadata("maxzoom", maxzoom)?;
		}
		let metadata = Tileset::open(&archive.finish())?.get_metadata()?;
		assert_eq!((metadata.minzoom, metadata.maxzoom), (0, 7));
		Ok(())
	}

	#[test]
	fn invalid_metadata_fails_the_whole_read() -> Result<()> {
		let dir = TempDir::new()?;
		let archive = vector_archive(&dir);
		archive.add_metadata("name", "Woods")?;
		archive.add_metadata("bounds", "1,2,3")?;
		let err = Tileset::open(&archive.finish())?.get_metadata().unwrap_err();
		assert!(format!("{err:#}").contains("'bounds'"), "{err:#}");
		Ok(())
	}

	#[test]
	fn rounding_to_the_nearest_second() -> Result<()> {
		let at = |secs: u64, nanos: u32| UNIX_EPOCH + Duration::new(secs, nanos);
		assert_eq!(round_to_second(at(10, 0))?, at(10, 0));
		assert_eq!(round_to_second(at(10, 499_999_999))?, at(10, 0));
		assert_eq!(round_to_second(at(10, 500_000_000))?, at(11, 0));
		assert!(round_to_second(UNIX_EPOCH - Duration::from_secs(1)).is_err());
		Ok(())
	}
}
