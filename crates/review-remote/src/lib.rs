//! Remote authority client for the order review desk.
//!
//! This module handles submission of operator decisions and validated prices
//! to the remote authority, which remains the single source of truth for
//! order state. It provides abstractions for different submission transports
//! following the same trait-based pattern as the other workflow components.
//!
//! Each submission is a single fire: the client issues exactly one request
//! per call and never retries, pipelines, or cancels on its own.

use async_trait::async_trait;
use review_types::{ConfigSchema, DispositionResponse, ImplementationRegistry, PriceResponse};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
	pub mod mock;
}

/// Errors that can occur during remote submission operations.
#[derive(Debug, Error)]
pub enum RemoteError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a response payload cannot be decoded.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	/// Error that occurs when configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for remote authority implementations.
///
/// This trait must be implemented by any transport that wants to carry
/// submissions for the review workflow. Both calls are read-as-idempotent
/// side-effecting requests keyed by order identifier.
#[async_trait]
pub trait RemoteInterface: Send + Sync {
	/// Returns the configuration schema for this remote implementation.
	///
	/// This allows each implementation to define its own configuration
	/// requirements with specific validation rules. The schema is used to
	/// validate TOML configuration before initializing the client.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Submits an operator decision for one order.
	///
	/// Sends the order identifier, the decision code, and the reason text
	/// (or the sentinel when no free text applies). Returns the authority's
	/// structured response; interpreting the status flag is the caller's
	/// concern.
	async fn submit_disposition(
		&self,
		order_id: &str,
		code: u8,
		reason: &str,
	) -> Result<DispositionResponse, RemoteError>;

	/// Submits a validated resale price for one order.
	async fn submit_price(
		&self,
		order_id: &str,
		price: Decimal,
	) -> Result<PriceResponse, RemoteError>;
}

/// Type alias for remote factory functions.
///
/// This is the function signature that all remote implementations must
/// provide to create instances of their remote interface.
pub type RemoteFactory = fn(&toml::Value) -> Result<Box<dyn RemoteInterface>, RemoteError>;

/// Registry trait for remote implementations.
///
/// This trait extends the base ImplementationRegistry to specify that
/// remote implementations must provide a RemoteFactory.
pub trait RemoteRegistry: ImplementationRegistry<Factory = RemoteFactory> {}

/// Get all registered remote implementations.
///
/// Returns a vector of (name, factory) tuples for all available remote
/// implementations. This is used by the engine builder to automatically
/// register all implementations.
pub fn get_all_implementations() -> Vec<(&'static str, RemoteFactory)> {
	use implementations::{http, mock};

	vec![
		(http::Registry::NAME, http::Registry::factory()),
		(mock::Registry::NAME, mock::Registry::factory()),
	]
}

/// Service that manages remote submissions with multiple implementations.
///
/// The RemoteService routes every submission to the configured primary
/// implementation and provides a unified interface to the workflow core.
pub struct RemoteService {
	/// Map of implementation names to their interfaces.
	implementations: HashMap<String, Arc<dyn RemoteInterface>>,
	/// The primary implementation to use for submissions.
	primary_implementation: String,
}

impl RemoteService {
	/// Creates a new RemoteService with the given implementations.
	///
	/// # Arguments
	///
	/// * `implementations` - Map of implementation names to their interfaces
	/// * `primary_implementation` - The name of the primary implementation to use
	pub fn new(
		implementations: HashMap<String, Arc<dyn RemoteInterface>>,
		primary_implementation: String,
	) -> Result<Self, RemoteError> {
		if !implementations.contains_key(&primary_implementation) {
			return Err(RemoteError::Configuration(format!(
				"Primary implementation '{}' not found in available implementations",
				primary_implementation
			)));
		}

		Ok(Self {
			implementations,
			primary_implementation,
		})
	}

	/// Convenience constructor for a service with a single implementation.
	pub fn with_implementation(
		name: impl Into<String>,
		implementation: Arc<dyn RemoteInterface>,
	) -> Self {
		let name = name.into();
		Self {
			implementations: HashMap::from([(name.clone(), implementation)]),
			primary_implementation: name,
		}
	}

	fn primary(&self) -> Result<&Arc<dyn RemoteInterface>, RemoteError> {
		self.implementations
			.get(&self.primary_implementation)
			.ok_or_else(|| {
				RemoteError::Configuration(format!(
					"Primary implementation '{}' not available",
					self.primary_implementation
				))
			})
	}

	/// Submits an operator decision using the primary implementation.
	pub async fn submit_disposition(
		&self,
		order_id: &str,
		code: u8,
		reason: &str,
	) -> Result<DispositionResponse, RemoteError> {
		tracing::debug!(order_id, code, "Submitting disposition");
		self.primary()?
			.submit_disposition(order_id, code, reason)
			.await
	}

	/// Submits a validated price using the primary implementation.
	pub async fn submit_price(
		&self,
		order_id: &str,
		price: Decimal,
	) -> Result<PriceResponse, RemoteError> {
		tracing::debug!(order_id, %price, "Submitting price");
		self.primary()?.submit_price(order_id, price).await
	}
}
