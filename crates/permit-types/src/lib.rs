//! Common types module for the permit borrow client.
//!
//! This module defines the core data types and structures shared across
//! the client. It provides a centralized location for the permit data
//! model, signature handling, and on-chain call results to ensure
//! consistency across all components.

/// Catalogue types and the legacy availability-suffix decoder.
pub mod books;
/// Transaction submission types for contract calls.
pub mod delivery;
/// Permit data model: domain, message, signature components.
pub mod permit;
/// Utility functions for hashing and formatting.
pub mod utils;

// Re-export all types for convenient access
pub use books::*;
pub use delivery::*;
pub use permit::*;
pub use utils::{current_timestamp, truncate_id, with_0x_prefix, DOMAIN_VERSION};
