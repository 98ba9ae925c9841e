use crate::{ArchiveError, Blob, TileCoord};

/// A tile payload together with its coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
	pub coord: TileCoord,
	pub data: Blob,
}

impl Tile {
	/// Create a tile at `level`/`x`/`y`.
	///
	/// # Errors
	/// Returns [`ArchiveError::InvalidLevel`] if `level` > 31.
	pub fn new(level: u8, x: u32, y: u32, data: impl Into<Blob>) -> Result<Tile, ArchiveError> {
		Ok(Tile {
			coord: TileCoord::new(level, x, y)?,
			data: data.into(),
		})
	}

	pub fn from_coord(coord: TileCoord, data: impl Into<Blob>) -> Tile {
		Tile {
			coord,
			data: data.into(),
		}
	}
}
