//! Submission outcomes reported back to the caller.
//!
//! A submission either resolves to a confirmed result reflected into local
//! state, or to an unconfirmed status that mutates nothing. Unconfirmed
//! outcomes are surfaced explicitly rather than swallowed, but carry no
//! retry semantics: repeating the identical submission later is always
//! safe because no partial state was written.

use rust_decimal::Decimal;

use crate::order::ReasonCode;

/// Result of a disposition submission.
#[derive(Debug, Clone, PartialEq)]
pub enum DispositionOutcome {
	/// The authority confirmed the order as accepted.
	Accepted,
	/// The authority confirmed the order as unsuitable.
	Unsuitable {
		code: ReasonCode,
		/// Human-readable reason, resolved from the response's own
		/// catalogue for catalogued codes or taken verbatim for custom.
		reason: String,
	},
	/// The authority answered but did not confirm; nothing was changed.
	Unconfirmed { status: String },
}

/// Result of a price submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceOutcome {
	/// The authority accepted the price and returned derived financials.
	Updated {
		price: Decimal,
		income: Decimal,
		owner: String,
		profit: Decimal,
	},
	/// The authority answered but did not confirm; nothing was changed.
	Unconfirmed { status: String },
}
