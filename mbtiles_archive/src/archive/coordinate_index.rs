//! The addressable tile grid: `(zoom_level, tile_column, tile_row) → tile_id`.
//!
//! Point lookups (`lookup`, `contains`) and writes go to the `map` table itself.
//! Enumeration and extremes read through the `tiles` view, so only coordinates
//! whose payload is actually present are reported.
//!
//! Enumeration fails with `ArchiveError::InvalidCoordinate` if a stored row has
//! a level above 31 or a column/row outside `u32`.

use anyhow::Result;
use mbtiles_core::{ContentHash, TileCoord};
use r2d2_sqlite::rusqlite::{Connection, OptionalExtension, Params, Statement, params};

/// A coordinate column of the `tiles` view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileColumn {
	Level,
	Column,
	Row,
}

impl TileColumn {
	fn as_sql(self) -> &'static str {
		match self {
			TileColumn::Level => "zoom_level",
			TileColumn::Column => "tile_column",
			TileColumn::Row => "tile_row",
		}
	}
}

/// Coordinate index over one connection or transaction.
pub struct CoordinateIndex<'a> {
	conn: &'a Connection,
}

impl<'a> CoordinateIndex<'a> {
	pub fn new(conn: &'a Connection) -> Self {
		CoordinateIndex { conn }
	}

	/// Maps `coord` to `hash`, replacing any previous mapping.
	pub fn insert(&self, coord: &TileCoord, hash: &ContentHash) -> Result<()> {
		self
			.conn
			.prepare_cached(
				"INSERT OR REPLACE INTO map (zoom_level, tile_column, tile_row, tile_id) VALUES (?1, ?2, ?3, ?4)",
			)?
			.execute(params![coord.level, coord.x, coord.y, hash.to_hex()])?;
		Ok(())
	}

	pub fn lookup(&self, coord: &TileCoord) -> Result<Option<ContentHash>> {
		let tile_id = self
			.conn
			.prepare_cached("SELECT tile_id FROM map WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3")?
			.query_row(params![coord.level, coord.x, coord.y], |row| row.get::<_, String>(0))
			.optional()?;
		match tile_id {
			Some(id) => Ok(Some(id.parse()?)),
			None => Ok(None),
		}
	}

	pub fn contains(&self, coord: &TileCoord) -> Result<bool> {
		let found = self
			.conn
			.prepare_cached("SELECT 1 FROM map WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3 LIMIT 1")?
			.query_row(params![coord.level, coord.x, coord.y], |_| Ok(()))
			.optional()?;
		Ok(found.is_some())
	}

	/// Number of mapped coordinates.
	pub fn count(&self) -> Result<u64> {
		let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM map", [], |row| row.get(0))?;
		Ok(count as u64)
	}

	/// Every coordinate, in storage order.
	pub fn all(&self) -> Result<Vec<TileCoord>> {
		let mut stmt = self
			.conn
			.prepare("SELECT zoom_level, tile_column, tile_row FROM tiles")?;
		collect_coords(&mut stmt, [])
	}

	/// Up to `limit` coordinates starting at `offset`, in storage order.
	pub fn page(&self, limit: usize, offset: usize) -> Result<Vec<TileCoord>> {
		let mut stmt = self
			.conn
			.prepare_cached("SELECT zoom_level, tile_column, tile_row FROM tiles LIMIT ?1 OFFSET ?2")?;
		collect_coords(&mut stmt, params![limit as i64, offset as i64])
	}

	/// Minimum and maximum of `column`, optionally restricted to one zoom level.
	///
	/// Returns `None` if no tile matches.
	pub fn extremes(&self, column: TileColumn, level: Option<u8>) -> Result<Option<(i64, i64)>> {
		let column = column.as_sql();
		let sql_where = if level.is_some() { " WHERE zoom_level = ?1" } else { "" };
		let sql = format!("SELECT MIN({column}), MAX({column}) FROM tiles{sql_where}");

		log::trace!("SQL: {sql}");

		let mut stmt = self.conn.prepare_cached(&sql)?;
		let (min, max): (Option<i64>, Option<i64>) = match level {
			Some(level) => stmt.query_row([level], |row| Ok((row.get(0)?, row.get(1)?)))?,
			None => stmt.query_row([], |row| Ok((row.get(0)?, row.get(1)?)))?,
		};
		Ok(min.zip(max))
	}
}

fn collect_coords(stmt: &mut Statement<'_>, params: impl Params) -> Result<Vec<TileCoord>> {
	let rows = stmt.query_map(params, |row| {
		Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?))
	})?;

	let mut coords = Vec::new();
	for row in rows {
		let (level, x, y) = row?;
		coords.push(TileCoord::from_stored(level, x, y)?);
	}
	Ok(coords)
}
