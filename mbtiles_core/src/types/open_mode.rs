//! The mode an archive is opened in.
//!
//! The mode is decided once, when the archive is opened, and every operation
//! that behaves differently per mode dispatches on the stored [`OpenMode`].

use crate::ArchiveError;
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpenMode {
	/// `"r"`: the file must exist and is never written.
	ReadOnly,
	/// `"w"`: an existing file is deleted and a fresh schema is created.
	Create,
	/// `"r+"`: the file must exist and already carry the schema.
	ReadWrite,
}

impl OpenMode {
	pub fn is_writable(self) -> bool {
		!matches!(self, OpenMode::ReadOnly)
	}

	pub fn requires_existing(self) -> bool {
		!matches!(self, OpenMode::Create)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			OpenMode::ReadOnly => "r",
			OpenMode::Create => "w",
			OpenMode::ReadWrite => "r+",
		}
	}
}

impl FromStr for OpenMode {
	type Err = ArchiveError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"r" => Ok(OpenMode::ReadOnly),
			"w" => Ok(OpenMode::Create),
			"r+" => Ok(OpenMode::ReadWrite),
			_ => Err(ArchiveError::InvalidMode(s.to_string())),
		}
	}
}

impl fmt::Display for OpenMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
