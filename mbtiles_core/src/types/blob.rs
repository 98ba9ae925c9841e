//! Owned tile payload bytes.
//!
//! A [`Blob`] is what an archive stores in its content table. An empty blob is a
//! valid payload in its own right: reading a coordinate that maps to zero bytes
//! returns `Some(Blob::new_empty())`, never `None`.
//!
//! ```rust
//! use mbtiles_core::Blob;
//!
//! let blob = Blob::from("abc");
//! assert_eq!(blob.len(), 3);
//! assert_eq!(blob.as_slice(), b"abc");
//! assert!(Blob::new_empty().is_empty());
//! ```

use std::fmt::{self, Debug};

/// A simple wrapper around [`Vec<u8>`] holding the bytes of one tile.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns a reference to the underlying byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Consumes this [`Blob`] and returns the underlying `Vec<u8>`.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the bytes as text, or `None` if they are not valid UTF-8.
	pub fn as_str(&self) -> Option<&str> {
		std::str::from_utf8(&self.0).ok()
	}

	/// Returns the number of bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl AsRef<[u8]> for Blob {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		const PREVIEW: usize = 16;
		let head = self.0.iter().take(PREVIEW).map(|b| format!("{b:02x}")).collect::<Vec<_>>();
		let ellipsis = if self.0.len() > PREVIEW { " …" } else { "" };
		write!(f, "Blob({} bytes: {}{ellipsis})", self.0.len(), head.join(" "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conversions() {
		let vec = vec![1u8, 2, 3];
		assert_eq!(Blob::from(vec.clone()).into_vec(), vec);
		assert_eq!(Blob::from(vec.as_slice()).as_slice(), &[1, 2, 3]);
		assert_eq!(Blob::from(b"xyz"), Blob::from("xyz"));
		assert_eq!(Blob::from("xyz").as_str(), Some("xyz"));
		assert_eq!(Blob::from(&[0xff, 0xfe]).as_str(), None);
	}

	#[test]
	fn empty_is_valid() {
		let blob = Blob::from(Vec::new());
		assert!(blob.is_empty());
		assert_eq!(blob.len(), 0);
		assert_eq!(blob, Blob::new_empty());
	}

	#[test]
	fn debug() {
		assert_eq!(format!("{:?}", Blob::from("abc")), "Blob(3 bytes: 61 62 63)");
		assert_eq!(
			format!("{:?}", Blob::from(vec![0u8; 20])),
			"Blob(20 bytes: 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 …)"
		);
	}
}
