//! This module provides the [`Blob`] struct, a thin wrapper around [`Vec<u8>`] used for tile
//! payloads, grid payloads and everything else that travels between the archive and the client.
//!
//! # Examples
//!
//! ```rust
//! use tileserver_core::Blob;
//!
//! let blob = Blob::from(vec![0x1f, 0x8b, 0x08]);
//! assert_eq!(blob.len(), 3);
//! assert_eq!(blob.as_slice(), &[0x1f, 0x8b, 0x08]);
//! assert_eq!(blob.as_hex(), "1f 8b 08");
//! ```

use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the bytes as space separated lowercase hex pairs.
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

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

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let preview: Vec<u8> = self.0.iter().take(16).copied().collect();
		let hex = Blob(preview).as_hex();
		if self.0.len() > 16 {
			write!(f, "Blob({}): {hex} …", self.0.len())
		} else {
			write!(f, "Blob({}): {hex}", self.0.len())
		}
	}
}
