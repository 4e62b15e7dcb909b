//! HTTP remote authority implementation.
//!
//! This module provides the production implementation of the RemoteInterface
//! trait. Submissions travel as simple textual request paths appended to the
//! configured base URL; the authority answers with a small JSON payload.

use crate::{RemoteError, RemoteFactory, RemoteInterface, RemoteRegistry};
use async_trait::async_trait;
use review_types::{
	ConfigSchema, DispositionResponse, Field, FieldType, ImplementationRegistry, PriceResponse,
	Schema, ValidationError,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the HTTP remote client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRemoteConfig {
	/// Base URL the request paths are appended to.
	pub base_url: String,
}

/// HTTP-based remote authority client.
///
/// Issues one GET per submission and decodes the JSON response. No retry,
/// no client-imposed timeout: an unanswered request simply stays in flight.
#[derive(Debug)]
pub struct HttpRemote {
	client: reqwest::Client,
	base_url: Url,
}

impl HttpRemote {
	/// Creates a new HttpRemote from its configuration.
	pub fn new(config: HttpRemoteConfig) -> Result<Self, RemoteError> {
		let base_url = Url::parse(&config.base_url)
			.map_err(|e| RemoteError::Configuration(format!("Invalid base_url: {}", e)))?;

		if base_url.cannot_be_a_base() {
			return Err(RemoteError::Configuration(format!(
				"base_url '{}' cannot carry request paths",
				config.base_url
			)));
		}

		Ok(Self {
			client: reqwest::Client::new(),
			base_url,
		})
	}

	/// Builds `{base}/checked/{order_id}/{code}/{reason}/`.
	///
	/// Path segments are percent-encoded by the URL builder, so free-text
	/// reasons survive the textual request path.
	fn disposition_url(&self, order_id: &str, code: u8, reason: &str) -> Result<Url, RemoteError> {
		self.request_url(&["checked", order_id, &code.to_string(), reason])
	}

	/// Builds `{base}/price/{order_id}/{price}/`.
	fn price_url(&self, order_id: &str, price: Decimal) -> Result<Url, RemoteError> {
		self.request_url(&["price", order_id, &price.to_string()])
	}

	fn request_url(&self, segments: &[&str]) -> Result<Url, RemoteError> {
		let mut url = self.base_url.clone();
		{
			let mut path = url
				.path_segments_mut()
				.map_err(|_| RemoteError::Configuration("base_url has no path".to_string()))?;
			path.pop_if_empty();
			path.extend(segments);
			// Trailing slash, matching the authority's route shape
			path.push("");
		}
		Ok(url)
	}

	async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, RemoteError> {
		let response = self
			.client
			.get(url)
			.send()
			.await
			.map_err(|e| RemoteError::Network(e.to_string()))?;

		let response = response
			.error_for_status()
			.map_err(|e| RemoteError::Network(e.to_string()))?;

		response
			.json::<T>()
			.await
			.map_err(|e| RemoteError::InvalidResponse(e.to_string()))
	}
}

#[async_trait]
impl RemoteInterface for HttpRemote {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpRemoteSchema)
	}

	async fn submit_disposition(
		&self,
		order_id: &str,
		code: u8,
		reason: &str,
	) -> Result<DispositionResponse, RemoteError> {
		let url = self.disposition_url(order_id, code, reason)?;
		self.get_json(url).await
	}

	async fn submit_price(
		&self,
		order_id: &str,
		price: Decimal,
	) -> Result<PriceResponse, RemoteError> {
		let url = self.price_url(order_id, price)?;
		self.get_json(url).await
	}
}

/// Configuration schema for the HTTP remote client.
pub struct HttpRemoteSchema;

impl ConfigSchema for HttpRemoteSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("base_url", FieldType::String).with_validator(|value| {
					let raw = value.as_str().unwrap_or_default();
					Url::parse(raw)
						.map(|_| ())
						.map_err(|e| format!("not a valid URL: {}", e))
				}),
			],
			vec![],
		);
		schema.validate(config)
	}
}

/// Factory function to create an HTTP remote from configuration.
pub fn create_http_remote(config: &toml::Value) -> Result<Box<dyn RemoteInterface>, RemoteError> {
	HttpRemoteSchema
		.validate(config)
		.map_err(|e| RemoteError::Configuration(e.to_string()))?;

	let http_config: HttpRemoteConfig = config
		.clone()
		.try_into()
		.map_err(|e| RemoteError::Configuration(format!("Invalid http config: {}", e)))?;

	Ok(Box::new(HttpRemote::new(http_config)?))
}

/// Registry for the HTTP remote implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "http";
	type Factory = RemoteFactory;

	fn factory() -> Self::Factory {
		create_http_remote
	}
}

impl RemoteRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	fn remote(base: &str) -> HttpRemote {
		HttpRemote::new(HttpRemoteConfig {
			base_url: base.to_string(),
		})
		.unwrap()
	}

	#[test]
	fn builds_disposition_path_with_trailing_slash() {
		let remote = remote("https://authority.example/api");
		let url = remote.disposition_url("42", 1, "none").unwrap();
		assert_eq!(url.as_str(), "https://authority.example/api/checked/42/1/none/");
	}

	#[test]
	fn encodes_free_text_reason_segment() {
		let remote = remote("https://authority.example");
		let url = remote
			.disposition_url("42", 5, "damaged outer box")
			.unwrap();
		assert_eq!(
			url.as_str(),
			"https://authority.example/checked/42/5/damaged%20outer%20box/"
		);
	}

	#[test]
	fn builds_price_path_from_decimal() {
		let remote = remote("https://authority.example/api/");
		let url = remote.price_url("42", Decimal::new(845, 1)).unwrap();
		assert_eq!(url.as_str(), "https://authority.example/api/price/42/84.5/");
	}

	#[test]
	fn rejects_invalid_base_url() {
		let err = HttpRemote::new(HttpRemoteConfig {
			base_url: "not a url".to_string(),
		})
		.unwrap_err();
		assert!(matches!(err, RemoteError::Configuration(_)));
	}

	#[test]
	fn schema_requires_base_url() {
		let config: toml::Value = toml::from_str("").unwrap();
		assert!(HttpRemoteSchema.validate(&config).is_err());

		let config: toml::Value =
			toml::from_str("base_url = \"https://authority.example\"").unwrap();
		HttpRemoteSchema.validate(&config).unwrap();
	}
}
