//! Connection setup: one pooled SQLite connection per archive handle.
//!
//! `locking_mode=EXCLUSIVE` means a second connection to the same file would
//! block on the first, so the pool never holds more than one connection.
//!
//! The connection is opened once before the pool is built. A locked file or a
//! file that is not a database fails right there with SQLite's own error,
//! instead of inside the pool's reconnect loop. `busy_timeout` is 0, so a lock
//! held by another handle is reported immediately.

use anyhow::Result;
use mbtiles_core::{ArchiveOptions, OpenMode};
use r2d2::{ManageConnection, Pool};
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{self, Connection, OpenFlags},
};
use std::{path::Path, time::Duration};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(1);

pub(crate) type ConnectionPool = Pool<SqliteConnectionManager>;

pub(crate) fn open_pool(path: &Path, mode: OpenMode, options: &ArchiveOptions) -> Result<ConnectionPool> {
	let flags = match mode {
		OpenMode::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
		OpenMode::Create => OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
		OpenMode::ReadWrite => OpenFlags::SQLITE_OPEN_READ_WRITE,
	} | OpenFlags::SQLITE_OPEN_NO_MUTEX;

	let options = options.clone();
	let manager = SqliteConnectionManager::file(path)
		.with_flags(flags)
		.with_init(move |conn| apply_pragmas(conn, mode, &options));

	drop(manager.connect()?);

	let pool = Pool::builder()
		.max_size(1)
		.connection_timeout(CONNECTION_TIMEOUT)
		.test_on_check_out(false)
		.build(manager)?;
	Ok(pool)
}

fn apply_pragmas(conn: &mut Connection, mode: OpenMode, options: &ArchiveOptions) -> rusqlite::Result<()> {
	conn.busy_timeout(Duration::ZERO)?;
	if mode.is_writable() {
		if options.synchronous_off {
			conn.pragma_update(None, "synchronous", "OFF")?;
		}
		if options.memory_journal {
			let journal: String = conn.pragma_update_and_check(None, "journal_mode", "MEMORY", |row| row.get(0))?;
			log::trace!("journal_mode = {journal}");
		}
	}
	if options.exclusive_locking {
		let locking: String = conn.pragma_update_and_check(None, "locking_mode", "EXCLUSIVE", |row| row.get(0))?;
		log::trace!("locking_mode = {locking}");
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use std::time::Instant;

	fn pragma(pool: &ConnectionPool, name: &str) -> String {
		let conn = pool.get().unwrap();
		conn
			.query_row(&format!("PRAGMA {name}"), [], |row| row.get::<_, rusqlite::types::Value>(0))
			.map(|value| match value {
				rusqlite::types::Value::Integer(i) => i.to_string(),
				rusqlite::types::Value::Text(s) => s,
				other => format!("{other:?}"),
			})
			.unwrap()
	}

	#[test]
	fn writable_pragmas() -> Result<()> {
		let dir = TempDir::new()?;
		let pool = open_pool(&dir.path().join("a.mbtiles"), OpenMode::Create, &ArchiveOptions::default())?;
		assert_eq!(pool.max_size(), 1);
		assert_eq!(pragma(&pool, "synchronous"), "0");
		assert_eq!(pragma(&pool, "journal_mode"), "memory");
		assert_eq!(pragma(&pool, "locking_mode"), "exclusive");
		Ok(())
	}

	#[test]
	fn pragmas_can_be_disabled() -> Result<()> {
		let dir = TempDir::new()?;
		let options = ArchiveOptions::builder()
			.synchronous_off(false)
			.memory_journal(false)
			.exclusive_locking(false)
			.build();
		let pool = open_pool(&dir.path().join("b.mbtiles"), OpenMode::Create, &options)?;
		assert_eq!(pragma(&pool, "journal_mode"), "delete");
		assert_eq!(pragma(&pool, "locking_mode"), "normal");
		Ok(())
	}

	#[test]
	fn locked_file_fails_at_once() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("d.mbtiles");
		let writer = open_pool(&path, OpenMode::Create, &ArchiveOptions::default())?;
		writer.get()?.execute_batch("CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (1);")?;

		let start = Instant::now();
		let Err(err) = open_pool(&path, OpenMode::ReadWrite, &ArchiveOptions::default()) else {
			panic!("second writer opened a locked file");
		};
		assert!(start.elapsed() < CONNECTION_TIMEOUT, "took {:?}", start.elapsed());
		assert!(format!("{err:#}").contains("locked"), "{err:#}");

		drop(writer);
		open_pool(&path, OpenMode::ReadWrite, &ArchiveOptions::default())?;
		Ok(())
	}

	#[test]
	fn read_only_rejects_writes() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("c.mbtiles");
		{
			let pool = open_pool(&path, OpenMode::Create, &ArchiveOptions::default())?;
			pool.get()?.execute_batch("CREATE TABLE t (v INTEGER)")?;
		}
		let pool = open_pool(&path, OpenMode::ReadOnly, &ArchiveOptions::default())?;
		assert!(pool.get()?.execute("INSERT INTO t (v) VALUES (1)", []).is_err());
		Ok(())
	}
}
