use super::{copy_tiles_where, same_file};
use crate::Archive;
use anyhow::{Result, ensure};
use mbtiles_core::{ArchiveError, ArchiveOptions, OpenMode};
use mbtiles_derive::context;
use std::path::Path;

/// Writes the tiles of `left` whose coordinates are absent from `right` to a fresh `output`.
///
/// The comparison is by coordinate only: a tile present in both inputs is
/// excluded even if its bytes differ. `output` receives `left`'s metadata verbatim.
///
/// Returns the number of tiles written.
pub fn difference(left: &Path, right: &Path, output: &Path, batch_size: usize) -> Result<usize> {
	difference_with(left, right, output, &ArchiveOptions::builder().batch_size(batch_size).build())
}

/// [`difference`] with explicit archive options; the window size is `options.batch_size`.
#[context("writing difference of {:?} and {:?} to {:?}", left, right, output)]
pub fn difference_with(left: &Path, right: &Path, output: &Path, options: &ArchiveOptions) -> Result<usize> {
	ensure!(options.batch_size > 0, ArchiveError::InvalidBatchSize);
	ensure!(
		!same_file(left, output) && !same_file(right, output),
		"output must differ from both inputs"
	);

	log::debug!("difference {left:?} - {right:?} -> {output:?}");

	let left_archive = Archive::open_with(left, OpenMode::ReadOnly, options.clone())?;
	let right_archive = Archive::open_with(right, OpenMode::ReadOnly, options.clone())?;
	let mut output_archive = Archive::open_with(output, OpenMode::Create, options.clone())?;

	output_archive.update_metadata(left_archive.metadata())?;

	let written = copy_tiles_where(&left_archive, &mut output_archive, options.batch_size, |_, coord| {
		Ok(!right_archive.has_tile(coord)?)
	})?;

	log::debug!("wrote {written} tiles to {output:?}");

	output_archive.close()?;
	right_archive.close()?;
	left_archive.close()?;
	Ok(written)
}
