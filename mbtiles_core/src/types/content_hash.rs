//! Content addresses for tile payloads.
//!
//! Every distinct payload is stored once, keyed by the SHA-1 digest of its bytes
//! rendered as 40 lowercase hex characters. This text form is what lands in the
//! `tile_id` columns of the `images` and `map` tables.

use crate::ArchiveError;
use sha1::{Digest, Sha1};
use std::{fmt, str::FromStr};

/// SHA-1 digest of a tile payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 20]);

impl ContentHash {
	/// Length of the hex representation.
	pub const HEX_LEN: usize = 40;

	/// Hashes `data`.
	#[must_use]
	pub fn of(data: &[u8]) -> ContentHash {
		let mut digest = [0u8; 20];
		digest.copy_from_slice(&Sha1::digest(data));
		ContentHash(digest)
	}

	#[must_use]
	pub fn as_bytes(&self) -> &[u8; 20] {
		&self.0
	}

	/// Lowercase hex form, as stored in the archive.
	#[must_use]
	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}
}

impl FromStr for ContentHash {
	type Err = ArchiveError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || ArchiveError::InvalidContentHash(s.to_string());
		if s.len() != Self::HEX_LEN || s.bytes().any(|b| b.is_ascii_uppercase()) {
			return Err(invalid());
		}
		let mut digest = [0u8; 20];
		hex::decode_to_slice(s, &mut digest).map_err(|_| invalid())?;
		Ok(ContentHash(digest))
	}
}

impl fmt::Display for ContentHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl fmt::Debug for ContentHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ContentHash({})", self.to_hex())
	}
}
