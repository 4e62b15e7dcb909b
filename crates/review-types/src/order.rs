//! Order and decision types for the review workflow.
//!
//! This module defines the order under review, its disposition lifecycle,
//! and the transient operator decision that flows into a submission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
	ACCEPTED_CODE, CATALOGUED_CODE_MAX, CATALOGUED_CODE_MIN, CUSTOM_REASON_CODE,
	NO_REASON_SENTINEL,
};
use crate::catalogue::ReasonCatalogue;

/// An externally-sourced purchase order under operator review.
///
/// The order identifier is assigned by the sourcing system and never changes
/// for the lifetime of the review. The remote authority remains the single
/// source of truth for state; this record tracks the locally confirmed view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Opaque identifier, unique, assigned externally.
	pub id: String,
	/// Current disposition of the order.
	pub disposition: DispositionState,
	/// The order's known source cost, used only as price-validation input.
	/// Missing or unparseable costs map to a distinct validation error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reference_cost: Option<Decimal>,
	/// Resale price, set only after a confirmed price submission.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub resale_price: Option<Decimal>,
	/// Timestamp when this order entered review.
	pub created_at: u64,
	/// Timestamp when this order was last updated.
	pub updated_at: u64,
}

/// Disposition lifecycle of an order.
///
/// An order starts `Pending` and transitions exactly once to `Checked`;
/// no path returns it to `Pending`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum DispositionState {
	/// Awaiting an operator decision.
	Pending,
	/// Reviewed; terminal for this workflow.
	Checked(CheckedOutcome),
}

/// Sub-classification carried by a checked order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum CheckedOutcome {
	/// The order passed review.
	Accepted,
	/// The order was rejected with a reason.
	Unsuitable {
		code: ReasonCode,
		reason: String,
	},
}

impl fmt::Display for DispositionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DispositionState::Pending => write!(f, "Pending"),
			DispositionState::Checked(CheckedOutcome::Accepted) => write!(f, "Checked/Accepted"),
			DispositionState::Checked(CheckedOutcome::Unsuitable { .. }) => {
				write!(f, "Checked/Unsuitable")
			},
		}
	}
}

/// A rejection reason code on the wire.
///
/// Codes 2..=4 select catalogued reasons; code 5 signals a custom one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ReasonCode(pub u8);

impl ReasonCode {
	/// Whether this code selects a catalogued reason.
	pub fn is_catalogued(&self) -> bool {
		(CATALOGUED_CODE_MIN..=CATALOGUED_CODE_MAX).contains(&self.0)
	}

	/// Whether this code signals a custom free-text reason.
	pub fn is_custom(&self) -> bool {
		self.0 == CUSTOM_REASON_CODE
	}
}

impl fmt::Display for ReasonCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// An operator-entered candidate outcome for one order.
///
/// Never persisted client-side beyond the single submission call; its only
/// destination is the remote authority.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
	/// Accept the order.
	Accept,
	/// Reject with a catalogued reason.
	Reject(ReasonCode),
	/// Reject with a custom free-text reason.
	RejectCustom(String),
}

impl Decision {
	/// The decision code encoded on the wire.
	pub fn code(&self) -> u8 {
		match self {
			Decision::Accept => ACCEPTED_CODE,
			Decision::Reject(code) => code.0,
			Decision::RejectCustom(_) => CUSTOM_REASON_CODE,
		}
	}

	/// The reason text sent on the wire, or the sentinel when none applies.
	pub fn reason_text(&self) -> &str {
		match self {
			Decision::RejectCustom(text) => text,
			_ => NO_REASON_SENTINEL,
		}
	}
}

/// One selectable option in a decision prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOption {
	/// Decision code encoded when this option is chosen.
	pub code: u8,
	/// Descriptive text the presentation layer renders.
	pub label: String,
}

/// The choice set offered to the operator for one order.
///
/// The presentation layer renders the options and hands the chosen decision
/// back as an explicit continuation; cancelling simply means no decision is
/// ever handed back, leaving the order pending with no request sent.
#[derive(Debug, Clone)]
pub struct DecisionPrompt {
	/// The order this prompt is scoped to.
	pub order_id: String,
	/// Options in presentation order: accept, catalogued rejections, custom.
	pub options: Vec<DecisionOption>,
}

impl DecisionPrompt {
	/// Builds the prompt for an order from the catalogue-owning collaborator.
	pub fn new(order_id: impl Into<String>, catalogue: &ReasonCatalogue) -> Self {
		let mut options = vec![DecisionOption {
			code: ACCEPTED_CODE,
			label: "Mark as checked.".to_string(),
		}];

		for code in CATALOGUED_CODE_MIN..=CATALOGUED_CODE_MAX {
			if let Some(description) = catalogue.description(ReasonCode(code)) {
				options.push(DecisionOption {
					code,
					label: format!("Mark as unsuitable. {}", description),
				});
			}
		}

		options.push(DecisionOption {
			code: CUSTOM_REASON_CODE,
			label: "Mark as unsuitable. Custom reason.".to_string(),
		});

		Self {
			order_id: order_id.into(),
			options,
		}
	}
}
