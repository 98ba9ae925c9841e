use super::copy_tiles_where;
use crate::Archive;
use anyhow::{Result, ensure};
use mbtiles_core::{ArchiveError, ArchiveOptions, OpenMode};
use mbtiles_derive::context;
use std::path::Path;

/// Adds every tile of `source` whose coordinate `target` lacks.
///
/// Afterwards `target` holds the union of both archives. Tiles already in
/// `target` are neither read nor rewritten, even if `source` has different bytes
/// for them. `target`'s metadata is not touched.
///
/// Returns the number of tiles copied.
pub fn extend(source: &Path, target: &Path, batch_size: usize) -> Result<usize> {
	extend_with(source, target, &ArchiveOptions::builder().batch_size(batch_size).build())
}

/// [`extend`] with explicit archive options; the window size is `options.batch_size`.
#[context("extending {:?} with tiles from {:?}", target, source)]
pub fn extend_with(source: &Path, target: &Path, options: &ArchiveOptions) -> Result<usize> {
	ensure!(options.batch_size > 0, ArchiveError::InvalidBatchSize);
	ensure!(!super::same_file(source, target), "source and target must be different files");

	log::debug!("extend {target:?} with {source:?}");

	let mut target_archive = Archive::open_with(target, OpenMode::ReadWrite, options.clone())?;
	let source_archive = Archive::open_with(source, OpenMode::ReadOnly, options.clone())?;

	let copied = copy_tiles_where(&source_archive, &mut target_archive, options.batch_size, |archive, coord| {
		Ok(!archive.has_tile(coord)?)
	})?;

	log::debug!("copied {copied} tiles from {source:?} to {target:?}");

	source_archive.close()?;
	target_archive.close()?;
	Ok(copied)
}
