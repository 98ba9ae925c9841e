//! Set operations across archives: extend, union and difference.
//!
//! They use nothing but the public [`Archive`](crate::Archive) API. Source tiles
//! are enumerated in windows of `batch_size` coordinates, filtered, and each
//! window that still holds tiles is written with one batch transaction, so
//! memory stays bounded by the window size.
//!
//! Every archive handle is scoped to the operation. On success writable handles
//! are closed (and compacted); on error they are dropped, which releases the file.
//!
//! None of the operations reconcile metadata beyond what is documented on each
//! function; that is left to the caller.

mod difference;
pub use difference::*;

mod extend;
pub use extend::*;

mod union;
pub use union::*;

use crate::Archive;
use anyhow::{Result, anyhow};
use mbtiles_core::{Tile, TileCoord};
use std::path::Path;

/// Copies tiles from `source` into `destination`, one batch transaction per window.
///
/// `keep` decides per coordinate whether the tile is copied; it sees the
/// destination as it was before the current window is written.
fn copy_tiles_where<F>(source: &Archive, destination: &mut Archive, batch_size: usize, mut keep: F) -> Result<usize>
where
	F: FnMut(&Archive, &TileCoord) -> Result<bool>,
{
	let mut copied = 0;

	for batch in source.list_tiles_batched(batch_size)? {
		let batch = batch?;

		let mut selected = Vec::with_capacity(batch.len());
		for coord in batch {
			if keep(&*destination, &coord)? {
				selected.push(coord);
			}
		}

		if selected.is_empty() {
			continue;
		}

		log::trace!("copying {} tiles", selected.len());

		let tiles = selected.into_iter().map(|coord| -> Result<Tile> {
			let data = source
				.read_tile(&coord)?
				.ok_or_else(|| anyhow!("tile {coord} disappeared from {:?}", source.path()))?;
			Ok(Tile::from_coord(coord, data))
		});
		copied += destination.try_write_tiles(tiles)?;
	}

	Ok(copied)
}

fn same_file(a: &Path, b: &Path) -> bool {
	match (a.canonicalize(), b.canonicalize()) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}
