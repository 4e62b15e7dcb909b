//! Display-state registry.
//!
//! Explicit mapping from order identifier to the small display record the
//! presentation collaborator renders. The registry is mutated only via
//! confirmed-outcome paths in the handlers, plus the pending-submission
//! indicator that brackets each in-flight request. It also carries the
//! one-outstanding-submission-per-order guard: the modal prompt of the
//! original interface becomes an explicit refusal here.

use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use review_types::{DispositionBadge, DisplayState};

/// Errors raised by the display registry.
#[derive(Debug, Error)]
pub enum DisplayError {
	/// A submission for this order is already in flight.
	#[error("A submission for order {0} is already in flight")]
	SubmissionInFlight(String),
}

/// Registry of per-order display state, keyed by order id.
pub struct DisplayRegistry {
	states: RwLock<HashMap<String, DisplayState>>,
}

impl DisplayRegistry {
	pub fn new() -> Self {
		Self {
			states: RwLock::new(HashMap::new()),
		}
	}

	/// Ensures a default record exists for the order.
	pub async fn ensure(&self, order_id: &str) {
		let mut states = self.states.write().await;
		states.entry(order_id.to_string()).or_default();
	}

	/// Returns a snapshot of the order's display state.
	pub async fn get(&self, order_id: &str) -> Option<DisplayState> {
		let states = self.states.read().await;
		states.get(order_id).cloned()
	}

	/// Marks a submission as in flight, refusing a second one for the
	/// same order while the first is unresolved.
	pub async fn begin_submission(&self, order_id: &str) -> Result<(), DisplayError> {
		let mut states = self.states.write().await;
		let state = states.entry(order_id.to_string()).or_default();

		if state.pending_submission {
			return Err(DisplayError::SubmissionInFlight(order_id.to_string()));
		}

		state.pending_submission = true;
		Ok(())
	}

	/// Clears the pending indicator without touching anything else.
	///
	/// Used when a submission resolves without a confirmed outcome.
	pub async fn end_submission(&self, order_id: &str) {
		let mut states = self.states.write().await;
		if let Some(state) = states.get_mut(order_id) {
			state.pending_submission = false;
		}
	}

	/// Applies a confirmed disposition: badge set, pending cleared.
	pub async fn apply_disposition(&self, order_id: &str, badge: DispositionBadge) {
		let mut states = self.states.write().await;
		let state = states.entry(order_id.to_string()).or_default();
		state.badge = badge;
		state.pending_submission = false;
	}

	/// Applies a confirmed price update, reflecting the response values
	/// verbatim: price and income texts plus the owner/profit annotation.
	pub async fn apply_price(
		&self,
		order_id: &str,
		price: Decimal,
		income: Decimal,
		owner: &str,
		profit: Decimal,
	) {
		let mut states = self.states.write().await;
		let state = states.entry(order_id.to_string()).or_default();
		state.price_text = Some(format!("{}$", price));
		state.income_text = Some(format!("{}$", income));
		state.owner_profit = Some(format!("{}: {}$", owner, profit));
		state.pending_submission = false;
	}
}

impl Default for DisplayRegistry {
	fn default() -> Self {
		Self::new()
	}
}
