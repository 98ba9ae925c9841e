use std::path::PathBuf;
use thiserror::Error;

/// Usage errors raised by archives and set operations.
///
/// They travel inside `anyhow::Error`; callers that need to react to a specific
/// case can recover it with `err.downcast_ref::<ArchiveError>()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArchiveError {
	#[error("mbtiles not found: {}", .0.display())]
	NotFound(PathBuf),

	#[error("invalid mode '{0}': mode must be r, w, or r+")]
	InvalidMode(String),

	#[error("archive {} is opened read-only", .0.display())]
	ReadOnly(PathBuf),

	#[error("batch size must be greater than 0")]
	InvalidBatchSize,

	#[error("invalid content hash '{0}': expected 40 lowercase hex characters")]
	InvalidContentHash(String),

	#[error("level ({0}) must be <= 31")]
	InvalidLevel(u8),

	#[error("stored tile {level}/{x}/{y} is outside the supported range (level <= 31, column and row within u32)")]
	InvalidCoordinate { level: i64, x: i64, y: i64 },
}

/// Returns the [`ArchiveError`] carried by `err`, if any.
pub fn archive_error(err: &anyhow::Error) -> Option<&ArchiveError> {
	err.chain().find_map(|cause| cause.downcast_ref::<ArchiveError>())
}
