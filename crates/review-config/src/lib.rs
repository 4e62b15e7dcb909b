//! Configuration module for the order review desk.
//!
//! This module provides structures and utilities for managing workstation
//! configuration. It supports loading configuration from TOML files and
//! provides validation to ensure all required configuration values are
//! properly set.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files for better organization:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use regex::Regex;
use review_types::{ReasonCatalogue, CATALOGUED_CODE_MAX, CATALOGUED_CODE_MIN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
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

/// Main configuration structure for the review desk.
///
/// Contains the workstation identity, the locally owned rejection reason
/// catalogue used for building decision prompts, and the remote authority
/// client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this workstation instance.
	pub workstation: WorkstationConfig,
	/// Catalogued rejection reasons, keyed by code.
	///
	/// Keys stay strings at this layer because TOML table keys are strings;
	/// [`Config::reason_catalogue`] parses and checks them.
	pub catalogue: HashMap<String, String>,
	/// Configuration for the remote authority client.
	pub remote: RemoteConfig,
}

/// Configuration specific to this workstation instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkstationConfig {
	/// Unique identifier for this workstation, used in logs.
	pub id: String,
}

/// Configuration for the remote authority client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
	/// Which implementation to use for submissions.
	pub primary: String,
	/// Map of remote implementation names to their configurations.
	/// Each implementation has its own format stored as raw TOML values.
	pub implementations: HashMap<String, toml::Value>,
}

impl Config {
	/// Loads configuration from a file.
	///
	/// This method supports modular configuration through include directives:
	/// - `include = ["file1.toml", "file2.toml"]` - Include specific files
	///
	/// Each top-level section must be unique across all configuration files.
	/// The loaded configuration is validated before being returned.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Builds the prompt-side reason catalogue from the `[catalogue]` section.
	///
	/// Fails if any key is not a small integer code or the catalogued range
	/// is not fully covered.
	pub fn reason_catalogue(&self) -> Result<ReasonCatalogue, ConfigError> {
		let mut entries = HashMap::new();
		for (key, description) in &self.catalogue {
			let code: u8 = key.parse().map_err(|_| {
				ConfigError::Validation(format!("Catalogue key '{}' is not a valid code", key))
			})?;
			entries.insert(code, description.clone());
		}

		ReasonCatalogue::new(entries).map_err(|e| ConfigError::Validation(e.to_string()))
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// - Ensures the workstation ID is not empty
	/// - Verifies the primary remote implementation is configured
	/// - Checks the catalogue covers the catalogued code range
	fn validate(&self) -> Result<(), ConfigError> {
		if self.workstation.id.is_empty() {
			return Err(ConfigError::Validation(
				"Workstation ID cannot be empty".into(),
			));
		}

		if self.remote.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one remote implementation must be configured".into(),
			));
		}
		if self.remote.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Remote primary implementation cannot be empty".into(),
			));
		}
		if !self
			.remote
			.implementations
			.contains_key(&self.remote.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary remote '{}' not found in implementations",
				self.remote.primary
			)));
		}

		for code in CATALOGUED_CODE_MIN..=CATALOGUED_CODE_MAX {
			if !self.catalogue.contains_key(&code.to_string()) {
				return Err(ConfigError::Validation(format!(
					"Catalogue must define reason code {}",
					code
				)));
			}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is automatically
/// validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => default_value
				.map(str::to_string)
				.ok_or_else(|| {
					ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					))
				})?,
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}

	result.push_str(&input[last_end..]);
	Ok(result)
}
