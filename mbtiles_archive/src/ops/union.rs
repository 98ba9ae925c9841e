use super::{extend_with, same_file};
use anyhow::{Result, ensure};
use mbtiles_core::{ArchiveError, ArchiveOptions};
use mbtiles_derive::context;
use std::{fs, path::Path};

/// Writes the union of `left` and `right` to `output`.
///
/// The larger input file (by bytes; `left` on a tie) is copied to `output` as a
/// whole, then the tiles of the other input that `output` lacks are merged in
/// with [`extend`](super::extend). Where both inputs hold a coordinate, the copied
/// file's tile wins. `output` inherits the copied file's metadata only.
///
/// Returns the number of tiles merged in from the smaller input.
pub fn union(left: &Path, right: &Path, output: &Path, batch_size: usize) -> Result<usize> {
	union_with(left, right, output, &ArchiveOptions::builder().batch_size(batch_size).build())
}

/// [`union`] with explicit archive options; the window size is `options.batch_size`.
#[context("writing union of {:?} and {:?} to {:?}", left, right, output)]
pub fn union_with(left: &Path, right: &Path, output: &Path, options: &ArchiveOptions) -> Result<usize> {
	ensure!(options.batch_size > 0, ArchiveError::InvalidBatchSize);
	ensure!(
		!same_file(left, output) && !same_file(right, output),
		"output must differ from both inputs"
	);

	let left_size = file_size(left)?;
	let right_size = file_size(right)?;
	let (base, other) = if left_size >= right_size {
		(left, right)
	} else {
		(right, left)
	};

	log::debug!("copying tiles from {base:?} to {output:?}");
	fs::copy(base, output)?;

	log::debug!("merging tiles from {other:?} into {output:?}");
	extend_with(other, output, options)
}

fn file_size(path: &Path) -> Result<u64> {
	ensure!(path.exists(), ArchiveError::NotFound(path.to_path_buf()));
	Ok(fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Archive;
	use assert_fs::TempDir;
	use mbtiles_core::{Blob, OpenMode, Tile, TileCoord};
	use std::path::PathBuf;

	fn create(dir: &TempDir, name: &str, tiles: &[(u8, u32, u32, &str)], metadata: &[(&str, &str)]) -> PathBuf {
		let path = dir.path().join(name);
		let mut archive = Archive::open(&path, OpenMode::Create).unwrap();
		archive
			.write_tiles(tiles.iter().map(|&(z, x, y, data)| Tile::new(z, x, y, data).unwrap()))
			.unwrap();
		archive.update_metadata(metadata.iter().copied()).unwrap();
		archive.close().unwrap();
		path
	}

	fn sorted_tiles(archive: &Archive) -> Vec<(u8, u32, u32)> {
		let mut tiles: Vec<_> = archive.list_tiles().unwrap().iter().map(|c| c.as_tuple()).collect();
		tiles.sort_unstable();
		tiles
	}

	#[test]
	fn larger_file_is_copy_base() -> Result<()> {
		let dir = TempDir::new()?;
		let big_tile = "x".repeat(64 * 1024);
		let left = create(&dir, "left.mbtiles", &[(0, 0, 0, "left"), (1, 0, 0, "")], &[("name", "left")]);
		let right = create(
			&dir,
			"right.mbtiles",
			&[(0, 0, 0, "right"), (2, 0, 0, &big_tile)],
			&[("name", "right")],
		);
		let output = dir.path().join("out.mbtiles");

		assert_eq!(union(&left, &right, &output, 1000)?, 1);

		let archive = Archive::open(&output, OpenMode::ReadOnly)?;
		assert_eq!(sorted_tiles(&archive), vec![(0, 0, 0), (1, 0, 0), (2, 0, 0)]);
		assert_eq!(archive.read_tile(&TileCoord::new(0, 0, 0)?)?, Some(Blob::from("right")));
		assert_eq!(archive.metadata().get("name"), Some("right"));
		archive.close()
	}

	#[test]
	fn equal_sizes_prefer_left() -> Result<()> {
		let dir = TempDir::new()?;
		let left = create(&dir, "left.mbtiles", &[(0, 0, 0, "aaa")], &[("name", "left")]);
		let right = create(&dir, "right.mbtiles", &[(0, 0, 0, "bbb")], &[("name", "right")]);
		assert_eq!(fs::metadata(&left)?.len(), fs::metadata(&right)?.len());
		let output = dir.path().join("out.mbtiles");

		assert_eq!(union(&left, &right, &output, 10)?, 0);

		let archive = Archive::open(&output, OpenMode::ReadOnly)?;
		assert_eq!(archive.read_tile(&TileCoord::new(0, 0, 0)?)?, Some(Blob::from("aaa")));
		assert_eq!(archive.metadata().get("name"), Some("left"));
		archive.close()
	}

	#[test]
	fn missing_input() -> Result<()> {
		let dir = TempDir::new()?;
		let left = create(&dir, "left.mbtiles", &[], &[]);
		let output = dir.path().join("out.mbtiles");

		let err = union(&left, &dir.path().join("nope.mbtiles"), &output, 10).unwrap_err();
		assert!(matches!(mbtiles_core::archive_error(&err), Some(ArchiveError::NotFound(_))));
		assert!(!output.exists());
		Ok(())
	}

	#[test]
	fn output_must_not_be_an_input() -> Result<()> {
		let dir = TempDir::new()?;
		let left = create(&dir, "left.mbtiles", &[(0, 0, 0, "a")], &[]);
		let right = create(&dir, "right.mbtiles", &[], &[]);

		assert!(union(&left, &right, &left, 10).is_err());

		let archive = Archive::open(&left, OpenMode::ReadOnly)?;
		assert_eq!(archive.tile_count()?, 1);
		archive.close()
	}
}
