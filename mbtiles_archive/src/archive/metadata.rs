//! Key/value metadata with an in-memory mirror.
//!
//! The mirror is loaded once when the archive opens. Every mutation is written
//! to the `metadata` table first and applied to the mirror only after the
//! transaction committed, so the mirror never holds a value storage does not.
//!
//! Rows whose name or value is `NULL` are left out of the mirror.

use anyhow::Result;
use r2d2_sqlite::rusqlite::{Connection, params};
use std::collections::{BTreeMap, btree_map};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
	entries: BTreeMap<String, String>,
}

impl Metadata {
	pub(crate) fn load(conn: &Connection) -> Result<Metadata> {
		let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
		let rows = stmt.query_map([], |row| {
			Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?))
		})?;

		let mut entries = BTreeMap::new();
		for row in rows {
			match row? {
				(Some(name), Some(value)) => {
					entries.insert(name, value);
				}
				(name, _) => log::debug!("skipping metadata entry {name:?} with a NULL field"),
			}
		}
		log::trace!("loaded {} metadata entries", entries.len());
		Ok(Metadata { entries })
	}

	/// Upserts `entries` in one transaction, then mirrors them.
	pub(crate) fn upsert(&mut self, conn: &mut Connection, entries: Vec<(String, String)>) -> Result<()> {
		let transaction = conn.transaction()?;
		{
			let mut stmt = transaction.prepare_cached("INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)")?;
			for (name, value) in &entries {
				stmt.execute(params![name, value])?;
			}
		}
		transaction.commit()?;

		self.entries.extend(entries);
		Ok(())
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn as_map(&self) -> &BTreeMap<String, String> {
		&self.entries
	}
}

impl<'a> IntoIterator for &'a Metadata {
	type Item = (&'a String, &'a String);
	type IntoIter = btree_map::Iter<'a, String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}
