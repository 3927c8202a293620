//! Configuration module for the permit borrow client.
//!
//! This module provides structures and utilities for managing client
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required configuration values are
//! properly set before any contract handle is built from them.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the permit borrow client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// HTTP JSON-RPC endpoint of the network node.
	pub rpc_url: String,
	/// Addresses of the external contracts.
	pub contracts: ContractsConfig,
	/// Permit composition parameters.
	#[serde(default)]
	pub permit: PermitConfig,
	/// Transaction submission parameters.
	#[serde(default)]
	pub submission: SubmissionConfig,
}

/// Addresses of the two external contracts the client talks to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractsConfig {
	/// Permit-capable deposit token contract.
	pub token: String,
	/// Book library contract redeeming the permits.
	pub library: String,
}

/// Permit composition parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PermitConfig {
	/// Validity window added to the current time to form each deadline,
	/// in seconds.
	#[serde(default = "default_validity_secs")]
	pub validity_secs: u64,
}

impl Default for PermitConfig {
	fn default() -> Self {
		Self {
			validity_secs: default_validity_secs(),
		}
	}
}

/// Transaction submission parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionConfig {
	/// Confirmation depth required before a submission is reported done.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
}

impl Default for SubmissionConfig {
	fn default() -> Self {
		Self {
			confirmations: default_confirmations(),
		}
	}
}

fn default_validity_secs() -> u64 {
	3600
}

fn default_confirmations() -> u64 {
	1
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let contents = std::fs::read_to_string(path)?;
		Self::from_toml_str(&contents)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(contents)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates all configuration values.
	fn validate(&self) -> Result<(), ConfigError> {
		if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
			return Err(ConfigError::Validation(format!(
				"rpc_url must be an http(s) endpoint, got '{}'",
				self.rpc_url
			)));
		}
		parse_address(&self.contracts.token, "contracts.token")?;
		parse_address(&self.contracts.library, "contracts.library")?;
		if self.permit.validity_secs == 0 {
			return Err(ConfigError::Validation(
				"permit.validity_secs must be greater than zero".to_string(),
			));
		}
		Ok(())
	}

	/// Returns the token contract address.
	pub fn token_address(&self) -> Result<Address, ConfigError> {
		parse_address(&self.contracts.token, "contracts.token")
	}

	/// Returns the library contract address.
	pub fn library_address(&self) -> Result<Address, ConfigError> {
		parse_address(&self.contracts.library, "contracts.library")
	}
}

fn parse_address(value: &str, field: &str) -> Result<Address, ConfigError> {
	value
		.parse()
		.map_err(|_| ConfigError::Validation(format!("{} is not a valid address: '{}'", field, value)))
}
