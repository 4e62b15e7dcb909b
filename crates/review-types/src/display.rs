//! Per-order display state.
//!
//! The presentation collaborator owns one of these records per order id and
//! updates it only from confirmed-outcome callbacks out of the workflow
//! core. The record replaces per-element page state keyed by order id.

use serde::{Deserialize, Serialize};

/// Visual disposition marker for an order row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DispositionBadge {
	/// No confirmed disposition yet.
	#[default]
	Unreviewed,
	/// Confirmed accepted.
	Accepted,
	/// Confirmed unsuitable, with the human-readable reason to show.
	Unsuitable { reason: String },
}

/// Display state for one order, keyed by order id in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DisplayState {
	/// Disposition marker.
	pub badge: DispositionBadge,
	/// Displayed resale price, taken verbatim from a confirmed response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub price_text: Option<String>,
	/// Displayed income figure, taken verbatim from a confirmed response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub income_text: Option<String>,
	/// Owner/profit annotation, assembled from a confirmed response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owner_profit: Option<String>,
	/// Set while a submission for this order is in flight; an unanswered
	/// request leaves it visible.
	pub pending_submission: bool,
}
