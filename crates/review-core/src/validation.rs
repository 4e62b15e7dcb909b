//! Pure validators for operator input.
//!
//! Every rule here runs synchronously before any request is sent: a failed
//! validation surfaces immediately, aborts the flow, and leaves no state
//! change behind. The functions take their reference context as arguments
//! so they stay unit-testable without network mocking.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use review_types::{
	max_resale_price, Decision, ReasonCatalogue, MAX_CUSTOM_REASON_LEN, MIN_CUSTOM_REASON_LEN,
};

/// Matches plain integer input.
static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Matches decimal input with exactly one fractional separator.
static DECIMAL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+$").unwrap());

/// Errors rejecting a candidate price before submission.
#[derive(Debug, Error, PartialEq)]
pub enum PriceValidationError {
	/// Input is not an integer or a decimal number with a '.' delimiter.
	#[error("Enter an integer or decimal number with '.' delimiter")]
	InvalidFormat,
	/// Format-valid input that still failed numeric conversion.
	#[error("Price is not a valid number")]
	NotANumber,
	/// The order carries no usable reference cost; this is a distinct
	/// error class, not a price-format problem.
	#[error("Reference cost is missing or invalid")]
	ReferenceCostMissing,
	/// Candidate price is not strictly positive.
	#[error("Price must be greater than 0")]
	NotPositive,
	/// Candidate price does not stay below 85% of the reference cost.
	#[error("Price must be lower than 85% of the reference cost")]
	OverMarginCap,
}

/// Errors rejecting an operator decision before submission.
#[derive(Debug, Error, PartialEq)]
pub enum DecisionValidationError {
	/// Custom reason text is under the length floor.
	#[error("Custom reason must be at least {MIN_CUSTOM_REASON_LEN} characters, got {length}")]
	ReasonTooShort { length: usize },
	/// Custom reason text exceeds what the authority stores.
	#[error("Custom reason must be at most {MAX_CUSTOM_REASON_LEN} characters, got {length}")]
	ReasonTooLong { length: usize },
	/// Rejection code has no entry in the catalogue.
	#[error("Unknown rejection reason code: {0}")]
	UnknownReasonCode(u8),
}

/// Validates a candidate price string against the order's reference cost.
///
/// Checks run in order, short-circuiting on the first failure: format,
/// numeric conversion, reference-cost presence, positivity, margin cap.
/// Returns the parsed price on success.
pub fn validate_price_input(
	input: &str,
	reference_cost: Option<Decimal>,
) -> Result<Decimal, PriceValidationError> {
	if !INTEGER_PATTERN.is_match(input) && !DECIMAL_PATTERN.is_match(input) {
		return Err(PriceValidationError::InvalidFormat);
	}

	let price = Decimal::from_str(input).map_err(|_| PriceValidationError::NotANumber)?;

	let reference_cost = reference_cost.ok_or(PriceValidationError::ReferenceCostMissing)?;

	if price <= Decimal::ZERO {
		return Err(PriceValidationError::NotPositive);
	}

	if price >= max_resale_price(reference_cost) {
		return Err(PriceValidationError::OverMarginCap);
	}

	Ok(price)
}

/// Validates custom rejection reason text against the length bounds.
pub fn validate_custom_reason(text: &str) -> Result<(), DecisionValidationError> {
	let length = text.chars().count();

	if length < MIN_CUSTOM_REASON_LEN {
		return Err(DecisionValidationError::ReasonTooShort { length });
	}
	if length > MAX_CUSTOM_REASON_LEN {
		return Err(DecisionValidationError::ReasonTooLong { length });
	}

	Ok(())
}

/// Validates an operator decision against the prompt-side catalogue.
pub fn validate_decision(
	decision: &Decision,
	catalogue: &ReasonCatalogue,
) -> Result<(), DecisionValidationError> {
	match decision {
		Decision::Accept => Ok(()),
		Decision::Reject(code) => {
			if code.is_catalogued() && catalogue.contains(*code) {
				Ok(())
			} else {
				Err(DecisionValidationError::UnknownReasonCode(code.0))
			}
		},
		Decision::RejectCustom(text) => validate_custom_reason(text),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use review_types::ReasonCode;
	use std::collections::HashMap;

	fn cost(value: &str) -> Option<Decimal> {
		Some(Decimal::from_str(value).unwrap())
	}

	fn catalogue() -> ReasonCatalogue {
		ReasonCatalogue::new(HashMap::from([
			(2, "Different items".to_string()),
			(3, "Different package contents".to_string()),
			(4, "Listing mismatch".to_string()),
		]))
		.unwrap()
	}

	#[test]
	fn accepts_integer_and_decimal_formats() {
		assert_eq!(
			validate_price_input("84", cost("100.00")),
			Ok(Decimal::from_str("84").unwrap())
		);
		assert_eq!(
			validate_price_input("84.5", cost("100.00")),
			Ok(Decimal::from_str("84.5").unwrap())
		);
	}

	#[test]
	fn rejects_malformed_input_before_numeric_checks() {
		for input in ["", "abc", "1.2.3", "+1", "-5", "1e3", "12.", ".5", " 84"] {
			assert_eq!(
				validate_price_input(input, cost("100.00")),
				Err(PriceValidationError::InvalidFormat),
				"input {:?} should fail the format stage",
				input
			);
		}
	}

	#[test]
	fn missing_reference_cost_is_its_own_error_class() {
		assert_eq!(
			validate_price_input("84.5", None),
			Err(PriceValidationError::ReferenceCostMissing)
		);
	}

	#[test]
	fn zero_price_is_rejected() {
		assert_eq!(
			validate_price_input("0", cost("100.00")),
			Err(PriceValidationError::NotPositive)
		);
		assert_eq!(
			validate_price_input("0.00", cost("100.00")),
			Err(PriceValidationError::NotPositive)
		);
	}

	#[test]
	fn margin_cap_boundary_is_exclusive() {
		// cap for 100.00 is 85.00: at the cap fails, below passes
		assert_eq!(
			validate_price_input("85.00", cost("100.00")),
			Err(PriceValidationError::OverMarginCap)
		);
		assert_eq!(
			validate_price_input("86", cost("100.00")),
			Err(PriceValidationError::OverMarginCap)
		);
		assert!(validate_price_input("84.99", cost("100.00")).is_ok());
	}

	#[test]
	fn custom_reason_floor_sits_at_ten_characters() {
		let nine = "a".repeat(9);
		let ten = "a".repeat(10);

		assert_eq!(
			validate_custom_reason(&nine),
			Err(DecisionValidationError::ReasonTooShort { length: 9 })
		);
		assert_eq!(validate_custom_reason(&ten), Ok(()));
	}

	#[test]
	fn custom_reason_over_storage_bound_is_rejected() {
		let oversized = "a".repeat(MAX_CUSTOM_REASON_LEN + 1);
		assert_eq!(
			validate_custom_reason(&oversized),
			Err(DecisionValidationError::ReasonTooLong {
				length: MAX_CUSTOM_REASON_LEN + 1
			})
		);
	}

	#[test]
	fn decisions_validate_against_the_catalogue() {
		let catalogue = catalogue();

		validate_decision(&Decision::Accept, &catalogue).unwrap();
		validate_decision(&Decision::Reject(ReasonCode(3)), &catalogue).unwrap();

		assert_eq!(
			validate_decision(&Decision::Reject(ReasonCode(7)), &catalogue),
			Err(DecisionValidationError::UnknownReasonCode(7))
		);
		assert_eq!(
			validate_decision(&Decision::RejectCustom("too short".into()), &catalogue),
			Err(DecisionValidationError::ReasonTooShort { length: 9 })
		);
	}
}
