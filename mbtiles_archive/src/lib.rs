//! MBTiles archives with content-deduplicated tile storage.
//!
//! An [`Archive`] is a single SQLite file holding three stores:
//! - a content store (`images`) mapping the SHA-1 of each distinct payload to its bytes,
//! - a coordinate index (`map`) mapping `(zoom_level, tile_column, tile_row)` to a content hash,
//! - a metadata table of string key/value pairs.
//!
//! A `tiles` view joins `map` to `images`, so the file reads like any other MBTiles file.
//!
//! The [`ops`] module builds set operations (extend, union, difference) purely on
//! the public [`Archive`] API, enumerating tiles in bounded-size batches.
//!
//! # Quick start
//! ```rust,no_run
//! use mbtiles_archive::Archive;
//! use mbtiles_core::{OpenMode, Tile, TileCoord};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let path = Path::new("/tmp/example.mbtiles");
//!
//!     let mut archive = Archive::open(path, OpenMode::Create)?;
//!     archive.update_metadata([("name", "example"), ("format", "png")])?;
//!     archive.write_tiles(vec![Tile::new(0, 0, 0, b"tile bytes")?])?;
//!     archive.close()?;
//!
//!     let archive = Archive::open(path, OpenMode::ReadOnly)?;
//!     assert!(archive.has_tile(&TileCoord::new(0, 0, 0)?)?);
//!     archive.close()
//! }
//! ```
//!
//! # Locking
//! Archives are opened with `locking_mode=EXCLUSIVE` by default. A writable handle
//! owns its file until it is closed: readers and other writers on the same file
//! must wait for it. Several read-only handles on a file nobody writes are fine.
//! The library adds no arbitration of its own.

mod archive;
pub use archive::*;

pub mod ops;
