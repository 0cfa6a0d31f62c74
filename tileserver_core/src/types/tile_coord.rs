//! Tile coordinates as stored in MBTiles archives.
//!
//! Clients address tiles in the XYZ ("slippy map") scheme where row 0 is the northernmost row.
//! MBTiles archives store rows in the TMS scheme where row 0 is the southernmost row. A
//! [`TileCoord`] always holds the **archive** row: [`TileCoord::parse`] converts the client row
//! via `y' = 2^z - 1 - y`, and [`TileCoord::flip_y`] converts in either direction.
//!
//! # Examples
//!
//! ```
//! use tileserver_core::TileCoord;
//!
//! // XYZ request 3/2/1 addresses TMS row 6 in the archive
//! let coord = TileCoord::parse("3", "2", "1.pbf").unwrap();
//! assert_eq!((coord.level, coord.x, coord.y), (3, 2, 6));
//!
//! let mut xyz = coord;
//! xyz.flip_y();
//! assert_eq!(xyz.y, 1);
//! ```

use crate::TileError;
use anyhow::Result;
use std::fmt::{self, Debug, Display};

/// A tile coordinate with zoom `level`, column `x` and archive row `y`.
///
/// Every `TileCoord` satisfies `x < 2^level` and `y < 2^level`.
#[derive(Eq, PartialEq, Clone, Copy, Hash)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column index.
	pub x: u64,
	/// The row index in the bottom-origin (TMS) scheme.
	pub y: u64,
}

impl TileCoord {
	/// Create a new `TileCoord` from archive indices, checking that `x` and `y` fit the level.
	pub fn new(level: u8, x: u64, y: u64) -> Result<TileCoord> {
		check_range('x', x, level)?;
		check_range('y', y, level)?;
		Ok(TileCoord { level, x, y })
	}

	/// Parse the three textual fields of a tile request.
	///
	/// `y` may carry a file extension (`"5.png"`), which is removed before parsing.
	/// `z` must fit into 8 bits, `x` and `y` into 64 bits, and both must be smaller than `2^z`.
	/// The returned row is converted from the XYZ to the TMS scheme.
	///
	/// # Errors
	/// [`TileError::MalformedTileCoord`] if a field is not a number,
	/// [`TileError::TileCoordOutOfRange`] if `x` or `y` is not smaller than `2^z`.
	pub fn parse(z: &str, x: &str, y: &str) -> Result<TileCoord> {
		let level: u8 = parse_number("zoom level", z)?;

		let x: u64 = parse_number("x coordinate", x)?;
		check_range('x', x, level)?;

		let y = match y.rfind('.') {
			Some(index) => &y[..index],
			None => y,
		};
		let y: u64 = parse_number("y coordinate", y)?;
		check_range('y', y, level)?;

		let mut coord = TileCoord { level, x, y };
		coord.flip_y();
		Ok(coord)
	}

	/// Returns `2^level - 1`, the largest valid column or row.
	#[must_use]
	pub fn max_value(&self) -> u64 {
		tile_count(self.level).map_or(u64::MAX, |count| count - 1)
	}

	/// Flip the row between the XYZ and the TMS scheme.
	pub fn flip_y(&mut self) {
		self.y = self.max_value() - self.y;
	}
}

/// Number of tiles per axis at `level`, `None` if `2^level` does not fit into 64 bits.
fn tile_count(level: u8) -> Option<u64> {
	1u64.checked_shl(u32::from(level))
}

fn check_range(axis: char, value: u64, level: u8) -> Result<()> {
	// levels of 64 and above cannot be flipped within 64 bits and are treated as out of bounds
	match tile_count(level) {
		Some(count) if value < count => Ok(()),
		_ => Err(TileError::TileCoordOutOfRange {
			axis,
			value,
			zoom: level,
		}
		.into()),
	}
}

fn parse_number<T>(name: &str, value: &str) -> Result<T>
where
	T: std::str::FromStr,
	T::Err: Display,
{
	if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
		return Err(TileError::MalformedTileCoord(format!("cannot parse {name} '{value}': not an unsigned integer")).into());
	}
	value
		.parse::<T>()
		.map_err(|err| TileError::MalformedTileCoord(format!("cannot parse {name} '{value}': {err}")).into())
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_fmt(format_args!("TileCoord({}, [{}, {}])", &self.level, &self.x, &self.y))
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn parse_err(z: &str, x: &str, y: &str) -> TileError {
		let err = TileCoord::parse(z, x, y).unwrap_err();
		TileError::find(&err).cloned().expect("expected a TileError")
	}

	fn sample_values(level: u8) -> Vec<u64> {
		let max = (1u64 << level) - 1;
		let mut values = vec![0, 1.min(max), max / 3, max / 2, max.saturating_sub(1), max];
		// a few pseudo random values from a linear congruential generator
		let mut state = u64::from(level).wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
		for _ in 0..8 {
			state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
			values.push(state % (max + 1));
		}
		values.sort_unstable();
		values.dedup();
		values
	}

	#[test]
	fn parse_converts_row_for_all_levels_up_to_22() {
		for level in 0..=22u8 {
			let count = 1u64 << level;
			for &x in &sample_values(level) {
				for &y in &sample_values(level) {
					let coord = TileCoord::parse(&level.to_string(), &x.to_string(), &y.to_string()).unwrap();
					assert_eq!(coord.level, level);
					assert_eq!(coord.x, x);
					assert_eq!(coord.y, count - 1 - y, "level {level}, x {x}, y {y}");

					// and back again
					let mut xyz = coord;
					xyz.flip_y();
					assert_eq!(xyz.y, y);
					assert_eq!(TileCoord::new(level, x, count - 1 - xyz.y).unwrap(), coord);
				}
			}
		}
	}

	#[rstest]
	#[case("5", "png")]
	#[case("5", "pbf")]
	#[case("5", "json")]
	#[case("5", "")]
	fn extension_is_stripped(#[case] y: &str, #[case] ext: &str) {
		let with_ext = TileCoord::parse("4", "3", &format!("{y}.{ext}")).unwrap();
		let without = TileCoord::parse("4", "3", y).unwrap();
		assert_eq!(with_ext, without);
		assert_eq!(with_ext, TileCoord::new(4, 3, 10).unwrap());
	}

	#[test]
	fn only_the_last_extension_is_stripped() {
		assert!(matches!(
			parse_err("4", "3", "5.tar.gz"),
			TileError::MalformedTileCoord(_)
		));
	}

	#[rstest]
	#[case("2", "4", "0", 'x', 4)]
	#[case("2", "0", "4", 'y', 4)]
	#[case("0", "1", "0", 'x', 1)]
	#[case("0", "0", "1", 'y', 1)]
	#[case("10", "1024", "0", 'x', 1024)]
	#[case("64", "0", "0", 'x', 0)]
	#[case("255", "0", "0", 'x', 0)]
	fn out_of_range(#[case] z: &str, #[case] x: &str, #[case] y: &str, #[case] axis: char, #[case] value: u64) {
		let zoom = z.parse().unwrap();
		assert_eq!(parse_err(z, x, y), TileError::TileCoordOutOfRange { axis, value, zoom });
	}

	#[rstest]
	#[case("a", "0", "0")]
	#[case("", "0", "0")]
	#[case("256", "0", "0")]
	#[case("-1", "0", "0")]
	#[case("+1", "0", "0")]
	#[case("1", "x", "0")]
	#[case("1", "0", "y")]
	#[case("1", "0", ".png")]
	#[case("1", "0", "1.5.png")]
	#[case("1", "-0", "0")]
	#[case("20", "18446744073709551616", "0")]
	fn malformed(#[case] z: &str, #[case] x: &str, #[case] y: &str) {
		let err = parse_err(z, x, y);
		assert!(matches!(err, TileError::MalformedTileCoord(_)), "{err:?}");
		assert!(err.is_invalid_coord());
	}

	#[test]
	fn malformed_message_names_the_field() {
		let err = TileCoord::parse("300", "0", "0").unwrap_err();
		assert_eq!(
			err.to_string(),
			"tile coordinates are not valid: cannot parse zoom level '300': number too large to fit in target type"
		);
	}

	#[test]
	fn new_checks_range() {
		assert!(TileCoord::new(3, 7, 7).is_ok());
		assert!(TileCoord::new(3, 8, 0).is_err());
		assert!(TileCoord::new(3, 0, 8).is_err());
		assert_eq!(TileCoord::new(63, u64::MAX >> 1, 0).unwrap().max_value(), u64::MAX >> 1);
	}

	#[test]
	fn flip_y_is_an_involution() {
		let mut coord = TileCoord::new(3, 1, 2).unwrap();
		coord.flip_y();
		assert_eq!(coord, TileCoord::new(3, 1, 5).unwrap());
		coord.flip_y();
		assert_eq!(coord, TileCoord::new(3, 1, 2).unwrap());
	}

	#[test]
	fn formatting() {
		let coord = TileCoord::new(4, 7, 8).unwrap();
		assert_eq!(format!("{coord:?}"), "TileCoord(4, [7, 8])");
		assert_eq!(coord.to_string(), "4/7/8");
	}
}
