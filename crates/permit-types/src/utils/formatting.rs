//! String formatting utilities.
//!
//! Provides functions for formatting strings for display, including
//! hex string prefix management and truncation for readability.

/// Utility function to truncate a hex string for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

/// Adds "0x" prefix to a hex string if it doesn't already have one.
///
/// This function ensures that a hex string has the standard "0x" prefix,
/// adding it if missing and leaving it unchanged if already present.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_with_0x_prefix() {
		assert_eq!(with_0x_prefix("abcd"), "0xabcd");
		assert_eq!(with_0x_prefix("0xabcd"), "0xabcd");
		assert_eq!(with_0x_prefix("0Xabcd"), "0Xabcd");
	}

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("deadbeef"), "deadbeef");
		assert_eq!(truncate_id("deadbeefcafe"), "deadbeef..");
	}
}
