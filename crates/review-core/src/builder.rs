//! Builder pattern for constructing review engines.
//!
//! Provides a flexible way to compose a ReviewEngine from remote authority
//! implementations using factory functions, so the service binary can wire
//! up whichever transports it links in.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use review_config::Config;
use review_remote::{RemoteError, RemoteInterface, RemoteService};

use crate::ReviewEngine;

/// Errors that can occur during review engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for constructing a ReviewEngine with pluggable implementations.
pub struct ReviewEngineBuilder {
	config: Config,
}

impl ReviewEngineBuilder {
	/// Creates a new ReviewEngineBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the ReviewEngine using factories for the remote implementations.
	///
	/// Every implementation named in the configuration must have a matching
	/// factory; each factory validates its own configuration fragment.
	pub fn build<RF>(self, remote_factories: HashMap<String, RF>) -> Result<ReviewEngine, BuilderError>
	where
		RF: Fn(&toml::Value) -> Result<Box<dyn RemoteInterface>, RemoteError>,
	{
		let mut remote_impls: HashMap<String, Arc<dyn RemoteInterface>> = HashMap::new();
		for (name, impl_config) in &self.config.remote.implementations {
			let factory = remote_factories.get(name).ok_or_else(|| {
				BuilderError::MissingComponent(format!("remote implementation '{}'", name))
			})?;

			let implementation = factory(impl_config)
				.map_err(|e| BuilderError::Config(format!("remote '{}': {}", name, e)))?;
			remote_impls.insert(name.clone(), Arc::from(implementation));
		}

		let remote = RemoteService::new(remote_impls, self.config.remote.primary.clone())
			.map_err(|e| BuilderError::Config(e.to_string()))?;

		let catalogue = self
			.config
			.reason_catalogue()
			.map_err(|e| BuilderError::Config(e.to_string()))?;

		Ok(ReviewEngine::new(remote, catalogue))
	}
}
