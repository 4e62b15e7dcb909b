//! Common constants used across the review workflow.
//!
//! This module contains the decision codes, status strings, and business
//! limits shared between the workflow core, the remote client, and tests.

use rust_decimal::Decimal;

/// Decision code signalling an accepted order.
pub const ACCEPTED_CODE: u8 = 1;

/// First catalogued rejection reason code.
pub const CATALOGUED_CODE_MIN: u8 = 2;

/// Last catalogued rejection reason code.
pub const CATALOGUED_CODE_MAX: u8 = 4;

/// Decision code signalling a custom, free-text rejection reason.
pub const CUSTOM_REASON_CODE: u8 = 5;

/// Literal sent in the reason path segment when no free text applies.
pub const NO_REASON_SENTINEL: &str = "none";

/// Minimum length for a custom rejection reason.
pub const MIN_CUSTOM_REASON_LEN: usize = 10;

/// Maximum length for a custom rejection reason.
///
/// The remote authority truncates longer messages at this bound; the client
/// rejects them up front instead of submitting text that would be cut.
pub const MAX_CUSTOM_REASON_LEN: usize = 100;

/// Status flag confirming a disposition transition.
pub const DISPOSITION_CONFIRMED_STATUS: &str = "Checked";

/// Status flag confirming a price update.
pub const PRICE_CONFIRMED_STATUS: &str = "Updated";

/// The resale price must stay strictly below this fraction of the
/// reference cost, guaranteeing a 15% margin floor at the point of entry.
pub fn margin_cap() -> Decimal {
	Decimal::new(85, 2)
}

/// Maximum allowed resale price for the given reference cost (exclusive).
pub fn max_resale_price(reference_cost: Decimal) -> Decimal {
	reference_cost * margin_cap()
}
