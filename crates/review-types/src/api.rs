//! Wire payloads exchanged with the remote authority.
//!
//! Both submissions travel as simple textual request paths; the authority
//! answers with a small JSON payload carrying a status flag plus the data
//! the client reflects verbatim. Non-success responses may carry nothing
//! but the status flag, so every other field defaults when absent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{DISPOSITION_CONFIRMED_STATUS, PRICE_CONFIRMED_STATUS};

/// Response to a disposition submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispositionResponse {
	/// Status flag; only `"Checked"` signals a confirmed transition.
	pub status: String,
	/// The resolved outcome code the authority recorded.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<u8>,
	/// The stored custom-reason string, verbatim.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
	/// The authority's reason catalogue for catalogued codes.
	#[serde(default)]
	pub reasons: HashMap<u8, String>,
}

impl DispositionResponse {
	/// Whether the authority confirmed the transition.
	pub fn is_confirmed(&self) -> bool {
		self.status == DISPOSITION_CONFIRMED_STATUS
	}
}

/// Response to a price submission.
///
/// The income and profit figures are computed by the authority; the client
/// reflects them verbatim and never recomputes derived financials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceResponse {
	/// Status flag; only `"Updated"` signals an accepted price.
	pub status: String,
	/// The accepted price as stored by the authority.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<Decimal>,
	/// Computed income figure.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub income: Option<Decimal>,
	/// Owner the profit annotation is attributed to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner: Option<String>,
	/// Owner's computed profit share.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profit: Option<Decimal>,
}

impl PriceResponse {
	/// Whether the authority accepted the price update.
	pub fn is_confirmed(&self) -> bool {
		self.status == PRICE_CONFIRMED_STATUS
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_confirmed_disposition_payload() {
		let payload = r#"{
			"status": "Checked",
			"code": 3,
			"reason": "",
			"reasons": {"2": "Different items", "3": "Different package contents", "4": "Listing mismatch"}
		}"#;

		let response: DispositionResponse = serde_json::from_str(payload).unwrap();
		assert!(response.is_confirmed());
		assert_eq!(response.code, Some(3));
		assert_eq!(
			response.reasons.get(&3).map(String::as_str),
			Some("Different package contents")
		);
	}

	#[test]
	fn decodes_bare_nonsuccess_status() {
		// A refused submission carries only the status flag.
		let response: DispositionResponse =
			serde_json::from_str(r#"{"status": "Already checked"}"#).unwrap();

		assert!(!response.is_confirmed());
		assert_eq!(response.code, None);
		assert!(response.reasons.is_empty());

		let response: PriceResponse =
			serde_json::from_str(r#"{"status": "Already updated"}"#).unwrap();
		assert!(!response.is_confirmed());
		assert_eq!(response.price, None);
	}

	#[test]
	fn decodes_confirmed_price_payload() {
		let payload = r#"{
			"status": "Updated",
			"price": 84.5,
			"income": 0.5,
			"owner": "reviewer",
			"profit": 0.2
		}"#;

		let response: PriceResponse = serde_json::from_str(payload).unwrap();
		assert!(response.is_confirmed());
		assert_eq!(response.price, Some(Decimal::new(845, 1)));
		assert_eq!(response.owner.as_deref(), Some("reviewer"));
	}
}
