//! Integration tests for `extend`, `union` and `difference`.

use anyhow::Result;
use mbtiles_archive::{Archive, ops};
use mbtiles_core::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

type Fixture = &'static [(u8, u32, u32, &'static str)];

const ZERO_ONE: Fixture = &[(0, 0, 0, ""), (1, 0, 0, "")];
const ZERO_TWO_123: Fixture = &[(0, 0, 0, "123"), (2, 0, 0, "")];
const ZERO_TWO: Fixture = &[(0, 0, 0, ""), (2, 0, 0, "")];

fn create(dir: &TempDir, name: &str, tiles: Fixture) -> Result<PathBuf> {
	let path = dir.path().join(name);
	let mut archive = Archive::open(&path, OpenMode::Create)?;
	archive.write_tiles(
		tiles
			.iter()
			.map(|&(z, x, y, data)| Tile::new(z, x, y, data))
			.collect::<Result<Vec<_>, _>>()?,
	)?;
	archive.set_metadata("name", name)?;
	archive.close()?;
	Ok(path)
}

fn coordinates(path: &PathBuf) -> Result<Vec<(u8, u32, u32)>> {
	let archive = Archive::open(path, OpenMode::ReadOnly)?;
	let mut coords: Vec<_> = archive.list_tiles()?.iter().map(TileCoord::as_tuple).collect();
	archive.close()?;
	coords.sort_unstable();
	Ok(coords)
}

fn read(path: &PathBuf, level: u8, x: u32, y: u32) -> Result<Option<Blob>> {
	let archive = Archive::open(path, OpenMode::ReadOnly)?;
	let blob = archive.read_tile(&TileCoord::new(level, x, y)?)?;
	archive.close()?;
	Ok(blob)
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(1000)]
fn extend_keeps_target_tiles(#[case] batch_size: usize) -> Result<()> {
	let dir = TempDir::new()?;
	let source = create(&dir, "source.mbtiles", ZERO_ONE)?;
	let target = create(&dir, "target.mbtiles", ZERO_TWO_123)?;

	assert_eq!(ops::extend(&source, &target, batch_size)?, 1);

	assert_eq!(coordinates(&target)?, vec![(0, 0, 0), (1, 0, 0), (2, 0, 0)]);
	assert_eq!(read(&target, 0, 0, 0)?, Some(Blob::from("123")));

	let archive = Archive::open(&target, OpenMode::ReadOnly)?;
	assert_eq!(archive.metadata().get("name"), Some("target.mbtiles"));
	archive.close()?;

	// the source is left untouched
	assert_eq!(coordinates(&source)?, vec![(0, 0, 0), (1, 0, 0)]);
	Ok(())
}

#[test]
fn extend_twice_is_idempotent() -> Result<()> {
	let dir = TempDir::new()?;
	let source = create(&dir, "source.mbtiles", ZERO_ONE)?;
	let target = create(&dir, "target.mbtiles", ZERO_TWO_123)?;

	assert_eq!(ops::extend(&source, &target, 10)?, 1);
	assert_eq!(ops::extend(&source, &target, 10)?, 0);
	assert_eq!(coordinates(&target)?.len(), 3);
	Ok(())
}

#[test]
fn union_follows_copy_base() -> Result<()> {
	let dir = TempDir::new()?;
	let left = create(&dir, "left.mbtiles", ZERO_ONE)?;
	let right = create(&dir, "right.mbtiles", ZERO_TWO_123)?;
	let output = dir.path().join("output.mbtiles");

	let left_is_base = fs::metadata(&left)?.len() >= fs::metadata(&right)?.len();

	assert_eq!(ops::union(&left, &right, &output, 1)?, 1);
	assert_eq!(coordinates(&output)?, vec![(0, 0, 0), (1, 0, 0), (2, 0, 0)]);

	let expected = if left_is_base { "" } else { "123" };
	assert_eq!(read(&output, 0, 0, 0)?, Some(Blob::from(expected)));

	let archive = Archive::open(&output, OpenMode::ReadOnly)?;
	let expected_name = if left_is_base { "left.mbtiles" } else { "right.mbtiles" };
	assert_eq!(archive.metadata().get("name"), Some(expected_name));
	archive.close()?;

	// inputs stay as they were
	assert_eq!(coordinates(&left)?, vec![(0, 0, 0), (1, 0, 0)]);
	assert_eq!(coordinates(&right)?, vec![(0, 0, 0), (2, 0, 0)]);
	Ok(())
}

#[rstest]
#[case(1)]
#[case(1000)]
fn difference_over_coordinates(#[case] batch_size: usize) -> Result<()> {
	let dir = TempDir::new()?;
	let left = create(&dir, "left.mbtiles", ZERO_ONE)?;
	let right = create(&dir, "right.mbtiles", ZERO_TWO)?;
	let output = dir.path().join("output.mbtiles");

	assert_eq!(ops::difference(&left, &right, &output, batch_size)?, 1);
	assert_eq!(coordinates(&output)?, vec![(1, 0, 0)]);

	let archive = Archive::open(&output, OpenMode::ReadOnly)?;
	assert_eq!(archive.metadata().get("name"), Some("left.mbtiles"));
	archive.close()
}

#[test]
fn difference_ignores_content() -> Result<()> {
	let dir = TempDir::new()?;
	let left = create(&dir, "left.mbtiles", ZERO_ONE)?;
	let right = create(&dir, "right.mbtiles", ZERO_TWO_123)?;
	let output = dir.path().join("output.mbtiles");

	ops::difference(&left, &right, &output, 10)?;
	assert_eq!(coordinates(&output)?, vec![(1, 0, 0)]);
	Ok(())
}

#[test]
fn zero_batch_size_is_rejected() -> Result<()> {
	let dir = TempDir::new()?;
	let left = create(&dir, "left.mbtiles", ZERO_ONE)?;
	let right = create(&dir, "right.mbtiles", ZERO_TWO)?;
	let output = dir.path().join("output.mbtiles");

	for err in [
		ops::extend(&left, &right, 0).unwrap_err(),
		ops::union(&left, &right, &output, 0).unwrap_err(),
		ops::difference(&left, &right, &output, 0).unwrap_err(),
	] {
		assert_eq!(archive_error(&err), Some(&ArchiveError::InvalidBatchSize));
	}
	assert_eq!(coordinates(&right)?, vec![(0, 0, 0), (2, 0, 0)]);
	Ok(())
}
