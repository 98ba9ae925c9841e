use super::Archive;
use anyhow::Result;
use mbtiles_core::TileCoord;
use std::iter::FusedIterator;

/// Successive windows of at most `batch_size` coordinates, in storage order.
///
/// Each window is fetched with its own `LIMIT`/`OFFSET` query; no cursor stays
/// open between windows, so only one window is held in memory at a time. The
/// scan is forward-only: to start over, ask the archive for a new `TileBatches`.
///
/// Created by [`Archive::list_tiles_batched`].
#[derive(Debug)]
pub struct TileBatches<'a> {
	archive: &'a Archive,
	batch_size: usize,
	offset: usize,
	done: bool,
}

impl<'a> TileBatches<'a> {
	pub(crate) fn new(archive: &'a Archive, batch_size: usize) -> Self {
		TileBatches {
			archive,
			batch_size,
			offset: 0,
			done: false,
		}
	}
}

impl Iterator for TileBatches<'_> {
	type Item = Result<Vec<TileCoord>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}

		let batch = match self.archive.list_tiles_page(self.batch_size, self.offset) {
			Ok(batch) => batch,
			Err(err) => {
				self.done = true;
				return Some(Err(err));
			}
		};

		log::trace!("batch at offset {}: {} coordinates", self.offset, batch.len());

		if batch.is_empty() {
			self.done = true;
			return None;
		}
		if batch.len() < self.batch_size {
			self.done = true;
		}
		self.offset += batch.len();
		Some(Ok(batch))
	}
}

impl FusedIterator for TileBatches<'_> {}
