//! Mock remote authority implementation for testing and development.
//!
//! This implementation answers submissions from in-memory state, mirroring
//! the real authority's observable behavior: repeated submissions for the
//! same order are refused with a bare status, custom reasons are stored
//! (truncated at the storage bound), and price confirmations carry the
//! authority-computed income and profit figures.

use crate::{RemoteError, RemoteFactory, RemoteInterface, RemoteRegistry};
use async_trait::async_trait;
use review_types::{
	margin_cap, ConfigSchema, DispositionResponse, ImplementationRegistry, PriceResponse, Schema,
	ValidationError, CUSTOM_REASON_CODE, DISPOSITION_CONFIRMED_STATUS, MAX_CUSTOM_REASON_LEN,
	PRICE_CONFIRMED_STATUS,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Configuration for the mock remote authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockRemoteConfig {
	/// Owner name echoed in price confirmations.
	#[serde(default = "default_owner")]
	pub owner: String,
	/// Share of the income figure attributed to the owner.
	#[serde(default = "default_profit_share")]
	pub profit_share: Decimal,
	/// Known source costs keyed by order id, used for income computation.
	#[serde(default)]
	pub reference_costs: HashMap<String, Decimal>,
	/// Catalogue override; defaults to the built-in reasons.
	#[serde(default)]
	pub catalogue: Option<HashMap<String, String>>,
	/// When set, every submission resolves to a non-success status.
	#[serde(default)]
	pub fail_submissions: bool,
}

fn default_owner() -> String {
	"reviewer".to_string()
}

fn default_profit_share() -> Decimal {
	Decimal::new(4, 1)
}

impl Default for MockRemoteConfig {
	fn default() -> Self {
		Self {
			owner: default_owner(),
			profit_share: default_profit_share(),
			reference_costs: HashMap::new(),
			catalogue: None,
			fail_submissions: false,
		}
	}
}

/// Recorded authority-side state for one order.
#[derive(Debug, Clone, Default)]
struct MockOrderRecord {
	checked: Option<u8>,
	reason: String,
	price: Option<Decimal>,
}

/// Mock remote authority backed by an in-memory map.
pub struct MockRemote {
	config: MockRemoteConfig,
	catalogue: HashMap<u8, String>,
	records: RwLock<HashMap<String, MockOrderRecord>>,
}

impl MockRemote {
	/// Creates a new MockRemote from its configuration.
	pub fn new(config: MockRemoteConfig) -> Result<Self, RemoteError> {
		let catalogue = match &config.catalogue {
			Some(entries) => {
				let mut parsed = HashMap::new();
				for (key, description) in entries {
					let code: u8 = key.parse().map_err(|_| {
						RemoteError::Configuration(format!(
							"Catalogue key '{}' is not a valid code",
							key
						))
					})?;
					parsed.insert(code, description.clone());
				}
				parsed
			},
			None => HashMap::from([
				(2, "Different items".to_string()),
				(3, "Different package contents".to_string()),
				(4, "Listing mismatch".to_string()),
			]),
		};

		Ok(Self {
			config,
			catalogue,
			records: RwLock::new(HashMap::new()),
		})
	}
}

#[async_trait]
impl RemoteInterface for MockRemote {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MockRemoteSchema)
	}

	async fn submit_disposition(
		&self,
		order_id: &str,
		code: u8,
		reason: &str,
	) -> Result<DispositionResponse, RemoteError> {
		if self.config.fail_submissions {
			return Ok(DispositionResponse {
				status: "Unavailable".to_string(),
				code: None,
				reason: None,
				reasons: HashMap::new(),
			});
		}

		let mut records = self.records.write().await;
		let record = records.entry(order_id.to_string()).or_default();

		if record.checked.is_some() {
			return Ok(DispositionResponse {
				status: "Already checked".to_string(),
				code: None,
				reason: None,
				reasons: HashMap::new(),
			});
		}

		record.checked = Some(code);
		if code == CUSTOM_REASON_CODE {
			record.reason = reason.chars().take(MAX_CUSTOM_REASON_LEN).collect();
		}

		Ok(DispositionResponse {
			status: DISPOSITION_CONFIRMED_STATUS.to_string(),
			code: Some(code),
			reason: Some(record.reason.clone()),
			reasons: self.catalogue.clone(),
		})
	}

	async fn submit_price(
		&self,
		order_id: &str,
		price: Decimal,
	) -> Result<PriceResponse, RemoteError> {
		if self.config.fail_submissions {
			return Ok(PriceResponse {
				status: "Unavailable".to_string(),
				price: None,
				income: None,
				owner: None,
				profit: None,
			});
		}

		let Some(reference_cost) = self.config.reference_costs.get(order_id).copied() else {
			return Ok(PriceResponse {
				status: "Unknown order".to_string(),
				price: None,
				income: None,
				owner: None,
				profit: None,
			});
		};

		let mut records = self.records.write().await;
		let record = records.entry(order_id.to_string()).or_default();

		if record.price.is_some() {
			return Ok(PriceResponse {
				status: "Already updated".to_string(),
				price: None,
				income: None,
				owner: None,
				profit: None,
			});
		}

		let price = price.round_dp(2);
		let income = (reference_cost * margin_cap() - price).round_dp(2);
		let profit = (income * self.config.profit_share).round_dp(2);
		record.price = Some(price);

		Ok(PriceResponse {
			status: PRICE_CONFIRMED_STATUS.to_string(),
			price: Some(price),
			income: Some(income),
			owner: Some(self.config.owner.clone()),
			profit: Some(profit),
		})
	}
}

/// Configuration schema for the mock remote authority.
pub struct MockRemoteSchema;

impl ConfigSchema for MockRemoteSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Every field has a default; only shape is checked
		let schema = Schema::new(vec![], vec![]);
		schema.validate(config)
	}
}

/// Factory function to create a mock remote from configuration.
pub fn create_mock_remote(config: &toml::Value) -> Result<Box<dyn RemoteInterface>, RemoteError> {
	let mock_config: MockRemoteConfig = config
		.clone()
		.try_into()
		.map_err(|e| RemoteError::Configuration(format!("Invalid mock config: {}", e)))?;

	Ok(Box::new(MockRemote::new(mock_config)?))
}

/// Registry for the mock remote implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "mock";
	type Factory = RemoteFactory;

	fn factory() -> Self::Factory {
		create_mock_remote
	}
}

impl RemoteRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use review_types::{ACCEPTED_CODE, NO_REASON_SENTINEL};

	fn mock_with_cost(order_id: &str, cost: Decimal) -> MockRemote {
		MockRemote::new(MockRemoteConfig {
			reference_costs: HashMap::from([(order_id.to_string(), cost)]),
			..MockRemoteConfig::default()
		})
		.unwrap()
	}

	#[tokio::test]
	async fn confirms_first_disposition_then_refuses_repeat() {
		let mock = MockRemote::new(MockRemoteConfig::default()).unwrap();

		let first = mock
			.submit_disposition("42", ACCEPTED_CODE, NO_REASON_SENTINEL)
			.await
			.unwrap();
		assert!(first.is_confirmed());
		assert_eq!(first.code, Some(ACCEPTED_CODE));
		assert_eq!(
			first.reasons.get(&2).map(String::as_str),
			Some("Different items")
		);

		let second = mock
			.submit_disposition("42", ACCEPTED_CODE, NO_REASON_SENTINEL)
			.await
			.unwrap();
		assert_eq!(second.status, "Already checked");
		assert_eq!(second.code, None);
	}

	#[tokio::test]
	async fn stores_custom_reason_truncated_at_bound() {
		let mock = MockRemote::new(MockRemoteConfig::default()).unwrap();
		let long_reason = "x".repeat(MAX_CUSTOM_REASON_LEN + 25);

		let response = mock
			.submit_disposition("7", CUSTOM_REASON_CODE, &long_reason)
			.await
			.unwrap();

		assert!(response.is_confirmed());
		assert_eq!(response.code, Some(CUSTOM_REASON_CODE));
		assert_eq!(
			response.reason.as_deref().map(str::len),
			Some(MAX_CUSTOM_REASON_LEN)
		);
	}

	#[tokio::test]
	async fn computes_income_and_profit_from_reference_cost() {
		let mock = mock_with_cost("42", Decimal::new(10000, 2)); // 100.00

		let response = mock
			.submit_price("42", Decimal::new(845, 1)) // 84.5
			.await
			.unwrap();

		assert!(response.is_confirmed());
		assert_eq!(response.price, Some(Decimal::new(845, 1)));
		// income = 100.00 * 0.85 - 84.5 = 0.50
		assert_eq!(response.income, Some(Decimal::new(50, 2)));
		// profit = 0.50 * 0.4 = 0.20
		assert_eq!(response.profit, Some(Decimal::new(20, 2)));
		assert_eq!(response.owner.as_deref(), Some("reviewer"));

		let repeat = mock.submit_price("42", Decimal::new(845, 1)).await.unwrap();
		assert_eq!(repeat.status, "Already updated");
	}

	#[tokio::test]
	async fn unknown_order_price_is_refused() {
		let mock = MockRemote::new(MockRemoteConfig::default()).unwrap();

		let response = mock.submit_price("missing", Decimal::ONE).await.unwrap();
		assert_eq!(response.status, "Unknown order");
		assert_eq!(response.price, None);
	}

	#[tokio::test]
	async fn forced_failure_never_confirms() {
		let mock = MockRemote::new(MockRemoteConfig {
			fail_submissions: true,
			..MockRemoteConfig::default()
		})
		.unwrap();

		let disposition = mock
			.submit_disposition("42", ACCEPTED_CODE, NO_REASON_SENTINEL)
			.await
			.unwrap();
		assert!(!disposition.is_confirmed());

		let price = mock.submit_price("42", Decimal::ONE).await.unwrap();
		assert!(!price.is_confirmed());
	}
}
