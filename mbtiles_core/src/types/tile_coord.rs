//! Tile coordinates: a zoom level plus the column and row within that level.
//!
//! Coordinates are stored exactly as given, in whatever row convention the
//! caller uses; the archive never flips rows.

use crate::ArchiveError;
use std::fmt::{self, Debug, Display};

/// A (zoom, column, row) triple identifying one tile position.
///
/// Ordering is by level, then column, then row, which gives callers of
/// `list_tiles` a stable way to sort the storage-ordered result.
#[derive(Eq, PartialEq, Clone, Hash, Copy, PartialOrd, Ord)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column (`tile_column`) of the tile.
	pub x: u32,
	/// The row (`tile_row`) of the tile.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord`.
	///
	/// # Errors
	/// Returns [`ArchiveError::InvalidLevel`] if `level` > 31.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord, ArchiveError> {
		if level > 31 {
			return Err(ArchiveError::InvalidLevel(level));
		}
		Ok(TileCoord { level, x, y })
	}

	/// Converts a coordinate read back from storage.
	///
	/// SQLite columns hold any 64-bit integer, so a file written by another
	/// producer may contain rows this type cannot represent. Those fail with
	/// [`ArchiveError::InvalidCoordinate`].
	pub fn from_stored(level: i64, x: i64, y: i64) -> Result<TileCoord, ArchiveError> {
		let invalid = || ArchiveError::InvalidCoordinate { level, x, y };
		let level = u8::try_from(level).map_err(|_| invalid())?;
		let x = u32::try_from(x).map_err(|_| invalid())?;
		let y = u32::try_from(y).map_err(|_| invalid())?;
		TileCoord::new(level, x, y).map_err(|_| invalid())
	}

	/// Returns `(level, x, y)`.
	pub fn as_tuple(&self) -> (u8, u32, u32) {
		(self.level, self.x, self.y)
	}
}

impl TryFrom<(u8, u32, u32)> for TileCoord {
	type Error = ArchiveError;

	fn try_from((level, x, y): (u8, u32, u32)) -> Result<Self, Self::Error> {
		TileCoord::new(level, x, y)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}
