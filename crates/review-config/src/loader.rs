//! Configuration loader module for handling modular configuration files.
//!
//! This module provides functionality to load configuration from multiple
//! files and validate that top-level sections stay unique across files so
//! a later include can never silently overwrite an earlier one.

use crate::{Config, ConfigError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Configuration loader that handles multi-file configurations with includes.
pub struct ConfigLoader {
	/// Base path for resolving relative includes
	base_path: PathBuf,
	/// Track loaded files to prevent circular includes
	loaded_files: HashSet<PathBuf>,
	/// Track which sections come from which files for error reporting
	section_sources: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	/// Creates a new ConfigLoader with the given base path.
	pub fn new(base_path: impl AsRef<Path>) -> Self {
		Self {
			base_path: base_path.as_ref().to_path_buf(),
			loaded_files: HashSet::new(),
			section_sources: HashMap::new(),
		}
	}

	/// Loads a configuration file and all its includes.
	pub async fn load_config(
		&mut self,
		config_path: impl AsRef<Path>,
	) -> Result<Config, ConfigError> {
		let config_path = self.resolve_path(config_path)?;
		let main_content = self.read_file(&config_path)?;

		let mut combined: toml::Value = toml::from_str(&main_content)?;
		let includes = extract_includes(&combined)?;

		if includes.is_empty() {
			// Single-file configuration; parse (and validate) directly
			return main_content.parse();
		}

		if let Some(table) = combined.as_table_mut() {
			table.remove("include");
		}
		self.record_sections(&combined, &config_path)?;

		for include_path in includes {
			let resolved = self.resolve_path(&include_path)?;
			let content = self.read_file(&resolved)?;
			let fragment: toml::Value = toml::from_str(&content)?;

			self.record_sections(&fragment, &resolved)?;

			if let (Some(target), Some(source)) = (combined.as_table_mut(), fragment.as_table()) {
				for (key, value) in source {
					target.insert(key.clone(), value.clone());
				}
			}
		}

		let config_str = toml::to_string(&combined).map_err(|e| {
			ConfigError::Parse(format!("Failed to serialize combined config: {}", e))
		})?;
		config_str.parse()
	}

	/// Reads a file, resolving environment variables and refusing a file
	/// that was already loaded in this pass.
	fn read_file(&mut self, path: &Path) -> Result<String, ConfigError> {
		let canonical_path = path.canonicalize().map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Cannot resolve path {}: {}", path.display(), e),
			))
		})?;

		if !self.loaded_files.insert(canonical_path.clone()) {
			return Err(ConfigError::Validation(format!(
				"Circular include detected: {} was already loaded",
				canonical_path.display()
			)));
		}

		let content = std::fs::read_to_string(path)?;
		crate::resolve_env_vars(&content)
	}

	/// Notes which file each top-level section came from, refusing
	/// duplicates across files.
	fn record_sections(
		&mut self,
		fragment: &toml::Value,
		source: &Path,
	) -> Result<(), ConfigError> {
		let Some(table) = fragment.as_table() else {
			return Ok(());
		};

		for key in table.keys() {
			if let Some(existing) = self.section_sources.get(key) {
				return Err(ConfigError::Validation(format!(
					"Duplicate section '{}' found in {} and {}; \
					top-level sections must be unique across configuration files",
					key,
					existing.display(),
					source.display()
				)));
			}
			self.section_sources
				.insert(key.clone(), source.to_path_buf());
		}

		Ok(())
	}

	/// Resolves a path relative to the base path, checking it exists.
	fn resolve_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
		let path = path.as_ref();

		let resolved = if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.base_path.join(path)
		};

		if !resolved.exists() {
			return Err(ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Configuration file not found: {}", resolved.display()),
			)));
		}

		Ok(resolved)
	}
}

/// Extracts include directives: a single string or an array of strings.
fn extract_includes(toml: &toml::Value) -> Result<Vec<PathBuf>, ConfigError> {
	let Some(include_value) = toml.get("include") else {
		return Ok(Vec::new());
	};

	if let Some(path) = include_value.as_str() {
		return Ok(vec![PathBuf::from(path)]);
	}

	let paths = include_value
		.as_array()
		.ok_or_else(|| {
			ConfigError::Validation("Include must be a string or array of strings".into())
		})?
		.iter()
		.map(|item| {
			item.as_str().map(PathBuf::from).ok_or_else(|| {
				ConfigError::Validation("Include array must contain only strings".into())
			})
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(paths)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	const WORKSTATION_SECTION: &str = r#"
[workstation]
id = "desk-1"
"#;

	const CATALOGUE_SECTION: &str = r#"
[catalogue]
2 = "Different items"
3 = "Different package contents"
4 = "Listing mismatch"
"#;

	const REMOTE_SECTION: &str = r#"
[remote]
primary = "mock"

[remote.implementations.mock]
owner = "reviewer"
"#;

	#[tokio::test]
	async fn test_single_file_config() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("config.toml");

		let config_content =
			format!("{}{}{}", WORKSTATION_SECTION, CATALOGUE_SECTION, REMOTE_SECTION);
		fs::write(&config_path, config_content).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config(&config_path).await.unwrap();

		assert_eq!(config.workstation.id, "desk-1");
		assert_eq!(config.remote.primary, "mock");
	}

	#[tokio::test]
	async fn test_config_with_includes() {
		let temp_dir = TempDir::new().unwrap();

		let main_config = format!(
			"include = [\"catalogue.toml\", \"remote.toml\"]\n{}",
			WORKSTATION_SECTION
		);

		fs::write(temp_dir.path().join("main.toml"), main_config).unwrap();
		fs::write(temp_dir.path().join("catalogue.toml"), CATALOGUE_SECTION).unwrap();
		fs::write(temp_dir.path().join("remote.toml"), REMOTE_SECTION).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config("main.toml").await.unwrap();

		assert_eq!(config.workstation.id, "desk-1");
		assert_eq!(config.catalogue.len(), 3);
	}

	#[tokio::test]
	async fn test_duplicate_section_error() {
		let temp_dir = TempDir::new().unwrap();

		let main_config = format!("include = [\"duplicate.toml\"]\n{}", WORKSTATION_SECTION);

		// Include with duplicate workstation section (should cause error)
		let duplicate_config = r#"
[workstation]
id = "desk-2"
"#;

		fs::write(temp_dir.path().join("main.toml"), main_config).unwrap();
		fs::write(temp_dir.path().join("duplicate.toml"), duplicate_config).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("main.toml").await;

		assert!(result.is_err());
		let error_msg = result.unwrap_err().to_string();
		assert!(error_msg.contains("Duplicate section 'workstation'"));
	}

	#[tokio::test]
	async fn test_self_include_detection() {
		let temp_dir = TempDir::new().unwrap();

		// Create a config that includes itself
		let config = format!("include = [\"self.toml\"]\n{}", WORKSTATION_SECTION);
		fs::write(temp_dir.path().join("self.toml"), config).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("self.toml").await;

		assert!(result.is_err());
		let error_msg = result.unwrap_err().to_string();
		assert!(error_msg.contains("already loaded"));
	}
}
