//! On-disk layout, created only when an archive is opened in `Create` mode.
//!
//! `ReadWrite` and `ReadOnly` handles assume the layout already exists.

use anyhow::Result;
use r2d2_sqlite::rusqlite::Connection;

/// Tables, unique constraints and the `tiles` view of a deduplicated MBTiles file.
const SCHEMA: &str = "
	CREATE TABLE IF NOT EXISTS metadata (name TEXT, value TEXT, UNIQUE (name));
	CREATE TABLE IF NOT EXISTS images (tile_data BLOB, tile_id TEXT, UNIQUE (tile_id));
	CREATE TABLE IF NOT EXISTS map (
		zoom_level INTEGER,
		tile_column INTEGER,
		tile_row INTEGER,
		tile_id TEXT,
		UNIQUE (zoom_level, tile_column, tile_row)
	);
	CREATE VIEW IF NOT EXISTS tiles AS
		SELECT
			map.zoom_level AS zoom_level,
			map.tile_column AS tile_column,
			map.tile_row AS tile_row,
			images.tile_data AS tile_data
		FROM map
		JOIN images ON images.tile_id = map.tile_id;
";

pub(crate) fn create_schema(conn: &Connection) -> Result<()> {
	log::trace!("creating schema");
	conn.execute_batch(SCHEMA)?;
	Ok(())
}
