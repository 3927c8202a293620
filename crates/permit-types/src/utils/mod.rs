//! Utility functions for hashing and string formatting.
//!
//! This module provides helper functions for EIP-712 hashing and the
//! hex string formatting commonly used throughout the client.

pub mod eip712;
pub mod formatting;
pub mod helpers;

pub use eip712::{
	compute_domain_hash, compute_final_digest, Eip712AbiEncoder, DOMAIN_TYPE, DOMAIN_VERSION,
	PERMIT_TYPE,
};
pub use formatting::{truncate_id, with_0x_prefix};
pub use helpers::current_timestamp;
