//! Catalogue types and the legacy availability-suffix decoder.
//!
//! The library contract's `getAvailableBooks()` view returns titles with an
//! availability sentence appended, e.g. "Dune is available". That wire form
//! conflates display text with data, so it is decoded exactly once here, at
//! the boundary, into a structured record. Nothing past this module ever
//! sees the suffixed form.

use serde::{Deserialize, Serialize};

const AVAILABLE_SUFFIX: &str = " is available";
const NOT_AVAILABLE_SUFFIX: &str = " is not available";

/// A catalogue entry with its availability decoded from the legacy wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
	/// Book title with any availability suffix stripped.
	pub title: String,
	/// Whether at least one copy is available to borrow.
	pub available: bool,
}

impl BookRecord {
	/// Decodes a suffixed title returned by the contract.
	///
	/// Only a trailing suffix is stripped, so titles that merely contain
	/// the sentence elsewhere survive intact. A title with no recognized
	/// suffix is treated as available; the legacy contract only appends
	/// the negative form for exhausted titles.
	pub fn from_legacy_wire(wire: &str) -> Self {
		// Check the longer suffix first; " is available" is a trailing
		// substring of neither, but ordering keeps the intent obvious.
		if let Some(title) = wire.strip_suffix(NOT_AVAILABLE_SUFFIX) {
			return Self {
				title: title.to_string(),
				available: false,
			};
		}
		if let Some(title) = wire.strip_suffix(AVAILABLE_SUFFIX) {
			return Self {
				title: title.to_string(),
				available: true,
			};
		}
		Self {
			title: wire.to_string(),
			available: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decodes_available_suffix() {
		let record = BookRecord::from_legacy_wire("Dune is available");
		assert_eq!(record.title, "Dune");
		assert!(record.available);
	}

	#[test]
	fn test_decodes_not_available_suffix() {
		let record = BookRecord::from_legacy_wire("Dune is not available");
		assert_eq!(record.title, "Dune");
		assert!(!record.available);
	}

	#[test]
	fn test_only_trailing_suffix_is_stripped() {
		let record = BookRecord::from_legacy_wire("Why Dune is available everywhere is available");
		assert_eq!(record.title, "Why Dune is available everywhere");
		assert!(record.available);
	}

	#[test]
	fn test_unsuffixed_title_passes_through() {
		let record = BookRecord::from_legacy_wire("Dune");
		assert_eq!(record.title, "Dune");
		assert!(record.available);
	}
}
