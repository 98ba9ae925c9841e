//! Content-addressed storage of tile payloads (`images` table).
//!
//! Identical payloads are stored once: the key is the SHA-1 of the bytes, so
//! writing the same bytes again is a no-op no matter how many coordinates
//! reference them.

use anyhow::Result;
use mbtiles_core::{Blob, ContentHash};
use r2d2_sqlite::rusqlite::{Connection, OptionalExtension, params};

/// Hash → bytes view over the `images` table of one connection or transaction.
pub struct ContentStore<'a> {
	conn: &'a Connection,
}

impl<'a> ContentStore<'a> {
	pub fn new(conn: &'a Connection) -> Self {
		ContentStore { conn }
	}

	/// Stores `data` under its content hash and returns the hash.
	///
	/// A record that already exists under the same hash is left untouched.
	pub fn put(&self, data: &[u8]) -> Result<ContentHash> {
		let hash = ContentHash::of(data);
		self
			.conn
			.prepare_cached("INSERT OR IGNORE INTO images (tile_id, tile_data) VALUES (?1, ?2)")?
			.execute(params![hash.to_hex(), data])?;
		Ok(hash)
	}

	pub fn get(&self, hash: &ContentHash) -> Result<Option<Blob>> {
		let data = self
			.conn
			.prepare_cached("SELECT tile_data FROM images WHERE tile_id = ?1")?
			.query_row([hash.to_hex()], |row| row.get::<_, Option<Vec<u8>>>(0))
			.optional()?;
		Ok(data.map(|bytes| Blob::from(bytes.unwrap_or_default())))
	}

	/// Number of distinct payloads.
	pub fn count(&self) -> Result<u64> {
		let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
		Ok(count as u64)
	}
}
