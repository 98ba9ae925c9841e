//! A single MBTiles file opened in a fixed [`OpenMode`].
//!
//! Writes go to the content store and the coordinate index inside one
//! transaction per call. Reads resolve the coordinate to a content hash first and
//! then fetch the payload.
//!
//! ## Errors
//! - Opening a missing file in `ReadOnly` or `ReadWrite` mode fails with
//!   [`ArchiveError::NotFound`] before SQLite is touched.
//! - Mutations on a `ReadOnly` archive fail with [`ArchiveError::ReadOnly`].
//! - Storage errors inside a batch roll the whole batch back and are returned.
//! - Opening a file another handle holds locked, or a file that is not a
//!   database, fails on the first attempt; nothing is retried.
//! - Listing fails with [`ArchiveError::InvalidCoordinate`] if the file holds a
//!   row with a level above 31 or a column/row outside `u32`.
//! - A missing tile, an empty range or an exhausted batch scan are not errors.

use super::{
	ContentStore, CoordinateIndex, Metadata, TileBatches, TileColumn,
	connection::{ConnectionPool, open_pool},
	schema::create_schema,
};
use anyhow::{Result, ensure};
use mbtiles_core::{ArchiveError, ArchiveOptions, Blob, OpenMode, Tile, TileCoord};
use mbtiles_derive::context;
use r2d2_sqlite::rusqlite::Connection;
use std::{
	fmt::{self, Debug},
	fs::remove_file,
	path::{Path, PathBuf},
};

/// An open MBTiles archive.
///
/// The handle owns one SQLite connection for its whole lifetime. [`Archive::close`]
/// consumes it; dropping it without closing releases the file without compacting.
pub struct Archive {
	path: PathBuf,
	mode: OpenMode,
	options: ArchiveOptions,
	pool: ConnectionPool,
	metadata: Metadata,
}

impl Archive {
	/// Opens `path` in `mode` with default [`ArchiveOptions`].
	pub fn open(path: &Path, mode: OpenMode) -> Result<Archive> {
		Archive::open_with(path, mode, ArchiveOptions::default())
	}

	/// Opens `path` with a textual mode: `"r"`, `"w"` or `"r+"`.
	///
	/// An unknown mode fails with [`ArchiveError::InvalidMode`] before the
	/// filesystem is touched.
	pub fn open_str(path: &Path, mode: &str) -> Result<Archive> {
		let mode: OpenMode = mode.parse()?;
		Archive::open(path, mode)
	}

	/// Opens `path` in `mode`.
	///
	/// In `Create` mode an existing file is deleted and the schema is created
	/// from scratch. The other modes require the file to exist.
	#[context("opening MBTiles '{}' in mode '{}'", path.display(), mode)]
	pub fn open_with(path: &Path, mode: OpenMode, options: ArchiveOptions) -> Result<Archive> {
		log::debug!("open {path:?} ({mode})");

		if path.exists() {
			if mode == OpenMode::Create {
				log::trace!("removing existing {path:?}");
				remove_file(path)?;
			}
		} else if mode.requires_existing() {
			return Err(ArchiveError::NotFound(path.to_path_buf()).into());
		}

		let pool = open_pool(path, mode, &options)?;
		let metadata = {
			let conn = pool.get()?;
			if mode == OpenMode::Create {
				create_schema(&conn)?;
			}
			Metadata::load(&conn)?
		};

		Ok(Archive {
			path: path.to_path_buf(),
			mode,
			options,
			pool,
			metadata,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn mode(&self) -> OpenMode {
		self.mode
	}

	fn ensure_writable(&self) -> Result<()> {
		ensure!(self.mode.is_writable(), ArchiveError::ReadOnly(self.path.clone()));
		Ok(())
	}

	/// Whether a tile is mapped at `coord`. Only the coordinate index is consulted.
	#[context("checking tile {coord} in '{}'", self.path.display())]
	pub fn has_tile(&self, coord: &TileCoord) -> Result<bool> {
		let conn = self.pool.get()?;
		CoordinateIndex::new(&conn).contains(coord)
	}

	/// Returns the payload at `coord`, or `None` if nothing is mapped there.
	#[context("reading tile {coord} from '{}'", self.path.display())]
	pub fn read_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		log::trace!("read tile {coord}");

		let conn = self.pool.get()?;
		let Some(hash) = CoordinateIndex::new(&conn).lookup(coord)? else {
			return Ok(None);
		};
		ContentStore::new(&conn).get(&hash)
	}

	/// Writes one tile and commits it.
	///
	/// Each call is its own transaction; use [`Archive::write_tiles`] for bulk writes.
	#[context("writing tile {coord} to '{}'", self.path.display())]
	pub fn write_tile(&mut self, coord: &TileCoord, data: &[u8]) -> Result<()> {
		self.ensure_writable()?;
		log::trace!("write tile {coord} ({} bytes)", data.len());

		let mut conn = self.pool.get()?;
		let transaction = conn.transaction()?;
		insert_tile(&transaction, coord, data)?;
		transaction.commit()?;
		Ok(())
	}

	/// Writes all `tiles` in a single transaction and returns how many were written.
	///
	/// Either every tile becomes visible or, if any insert fails, none does.
	pub fn write_tiles<I>(&mut self, tiles: I) -> Result<usize>
	where
		I: IntoIterator<Item = Tile>,
	{
		self.try_write_tiles(tiles.into_iter().map(Ok))
	}

	/// Like [`Archive::write_tiles`], but the input itself may fail.
	///
	/// An `Err` from the iterator aborts the batch: everything written so far in
	/// this call is rolled back and the error is returned.
	#[context("writing tiles to '{}'", self.path.display())]
	pub fn try_write_tiles<I>(&mut self, tiles: I) -> Result<usize>
	where
		I: IntoIterator<Item = Result<Tile>>,
	{
		self.ensure_writable()?;

		let mut conn = self.pool.get()?;
		let transaction = conn.transaction()?;

		let mut count = 0;
		let outcome = tiles.into_iter().try_for_each(|tile| -> Result<()> {
			let tile = tile?;
			insert_tile(&transaction, &tile.coord, tile.data.as_slice())?;
			count += 1;
			Ok(())
		});

		match outcome {
			Ok(()) => {
				transaction.commit()?;
				log::trace!("committed {count} tiles");
				Ok(count)
			}
			Err(err) => {
				log::warn!("rolling back {count} tiles in {:?}: {err:#}", self.path);
				if let Err(rollback_err) = transaction.rollback() {
					log::error!("rollback failed in {:?}: {rollback_err}", self.path);
				}
				Err(err)
			}
		}
	}

	/// Every coordinate in the archive, in storage order (not sorted).
	///
	/// The whole list is materialised; prefer [`Archive::list_tiles_batched`]
	/// for large archives.
	#[context("listing tiles of '{}'", self.path.display())]
	pub fn list_tiles(&self) -> Result<Vec<TileCoord>> {
		let conn = self.pool.get()?;
		CoordinateIndex::new(&conn).all()
	}

	/// A fresh scan over all coordinates in windows of `batch_size`.
	///
	/// The final window may be shorter. Fails with
	/// [`ArchiveError::InvalidBatchSize`] if `batch_size` is 0.
	pub fn list_tiles_batched(&self, batch_size: usize) -> Result<TileBatches<'_>> {
		ensure!(batch_size > 0, ArchiveError::InvalidBatchSize);
		Ok(TileBatches::new(self, batch_size))
	}

	#[context("listing {limit} tiles at offset {offset} of '{}'", self.path.display())]
	pub(crate) fn list_tiles_page(&self, limit: usize, offset: usize) -> Result<Vec<TileCoord>> {
		let conn = self.pool.get()?;
		CoordinateIndex::new(&conn).page(limit, offset)
	}

	/// Number of mapped coordinates.
	#[context("counting tiles of '{}'", self.path.display())]
	pub fn tile_count(&self) -> Result<u64> {
		let conn = self.pool.get()?;
		CoordinateIndex::new(&conn).count()
	}

	/// Lowest and highest zoom level, or `None` for an empty archive.
	#[context("getting zoom range of '{}'", self.path.display())]
	pub fn zoom_range(&self) -> Result<Option<(u8, u8)>> {
		match self.extremes(TileColumn::Level, None)? {
			Some((min, max)) => Ok(Some((u8::try_from(min)?, u8::try_from(max)?))),
			None => Ok(None),
		}
	}

	/// Lowest and highest row at `level`, or `None` if the level has no tiles.
	#[context("getting row range of level {level} in '{}'", self.path.display())]
	pub fn row_range(&self, level: u8) -> Result<Option<(u32, u32)>> {
		self.range_u32(TileColumn::Row, level)
	}

	/// Lowest and highest column at `level`, or `None` if the level has no tiles.
	#[context("getting column range of level {level} in '{}'", self.path.display())]
	pub fn col_range(&self, level: u8) -> Result<Option<(u32, u32)>> {
		self.range_u32(TileColumn::Column, level)
	}

	fn range_u32(&self, column: TileColumn, level: u8) -> Result<Option<(u32, u32)>> {
		match self.extremes(column, Some(level))? {
			Some((min, max)) => Ok(Some((u32::try_from(min)?, u32::try_from(max)?))),
			None => Ok(None),
		}
	}

	fn extremes(&self, column: TileColumn, level: Option<u8>) -> Result<Option<(i64, i64)>> {
		let conn = self.pool.get()?;
		CoordinateIndex::new(&conn).extremes(column, level)
	}

	/// The metadata mirror. Reading it never touches storage.
	pub fn metadata(&self) -> &Metadata {
		&self.metadata
	}

	/// Inserts or replaces a single metadata entry.
	pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
		self.update_metadata([(key.into(), value.into())])
	}

	/// Inserts or replaces every entry of `entries` in one transaction.
	///
	/// Keys not mentioned keep their values.
	#[context("updating metadata of '{}'", self.path.display())]
	pub fn update_metadata<I, K, V>(&mut self, entries: I) -> Result<()>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.ensure_writable()?;

		let entries: Vec<(String, String)> = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
		log::trace!("update {} metadata entries", entries.len());

		let mut conn = self.pool.get()?;
		self.metadata.upsert(&mut conn, entries)
	}

	/// Finalises the archive.
	///
	/// Writable archives are analysed and vacuumed first unless
	/// `compact_on_close` is disabled; read-only archives close immediately.
	#[context("closing '{}'", self.path.display())]
	pub fn close(self) -> Result<()> {
		log::debug!("close {:?} ({})", self.path, self.mode);

		if self.mode.is_writable() && self.options.compact_on_close {
			let conn = self.pool.get()?;
			conn.execute_batch("ANALYZE; VACUUM;")?;
		}
		Ok(())
	}
}

fn insert_tile(conn: &Connection, coord: &TileCoord, data: &[u8]) -> Result<()> {
	let hash = ContentStore::new(conn).put(data)?;
	CoordinateIndex::new(conn).insert(coord, &hash)
}

impl Debug for Archive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Archive")
			.field("path", &self.path)
			.field("mode", &self.mode)
			.finish()
	}
}
