//! Order book and disposition state machine.
//!
//! Tracks the locally confirmed view of orders under review and enforces
//! the single legal disposition transition: `Pending -> Checked`. `Checked`
//! is terminal; no operation returns an order to `Pending`. The book is
//! process-local working state; the remote authority stays the single
//! source of truth.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::RwLock;

use review_types::{CheckedOutcome, DispositionState, Order};

/// Errors that can occur during order state management.
#[derive(Debug, Error)]
pub enum OrderStateError {
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Invalid disposition transition from {from} to {to}")]
	InvalidTransition {
		from: DispositionState,
		to: DispositionState,
	},
	#[error("Order {0} is already checked")]
	AlreadyChecked(String),
	#[error("Time error: {0}")]
	TimeError(String),
}

/// In-memory book of orders under review, keyed by order id.
pub struct OrderBook {
	orders: RwLock<HashMap<String, Order>>,
}

impl OrderBook {
	pub fn new() -> Self {
		Self {
			orders: RwLock::new(HashMap::new()),
		}
	}

	/// Registers an order as pending review.
	///
	/// Re-registering a pending order is idempotent and refreshes the
	/// reference cost when one is supplied; re-registering a checked order
	/// is refused, since its review is over.
	pub async fn register(
		&self,
		order_id: &str,
		reference_cost: Option<Decimal>,
	) -> Result<Order, OrderStateError> {
		let now = now_secs()?;
		let mut orders = self.orders.write().await;

		if let Some(existing) = orders.get_mut(order_id) {
			if matches!(existing.disposition, DispositionState::Checked(_)) {
				return Err(OrderStateError::AlreadyChecked(order_id.to_string()));
			}
			if let Some(cost) = reference_cost {
				existing.reference_cost = Some(cost);
				existing.updated_at = now;
			}
			return Ok(existing.clone());
		}

		let order = Order {
			id: order_id.to_string(),
			disposition: DispositionState::Pending,
			reference_cost,
			resale_price: None,
			created_at: now,
			updated_at: now,
		};
		orders.insert(order_id.to_string(), order.clone());

		Ok(order)
	}

	/// Gets an order by id.
	pub async fn get(&self, order_id: &str) -> Result<Order, OrderStateError> {
		let orders = self.orders.read().await;
		orders
			.get(order_id)
			.cloned()
			.ok_or_else(|| OrderStateError::OrderNotFound(order_id.to_string()))
	}

	/// Updates an order with a closure, stamping `updated_at`.
	pub async fn update_with<F>(&self, order_id: &str, updater: F) -> Result<Order, OrderStateError>
	where
		F: FnOnce(&mut Order),
	{
		let now = now_secs()?;
		let mut orders = self.orders.write().await;
		let order = orders
			.get_mut(order_id)
			.ok_or_else(|| OrderStateError::OrderNotFound(order_id.to_string()))?;

		updater(order);
		order.updated_at = now;

		Ok(order.clone())
	}

	/// Transitions an order to `Checked` with the confirmed outcome.
	pub async fn transition(
		&self,
		order_id: &str,
		outcome: CheckedOutcome,
	) -> Result<Order, OrderStateError> {
		let now = now_secs()?;
		let mut orders = self.orders.write().await;
		let order = orders
			.get_mut(order_id)
			.ok_or_else(|| OrderStateError::OrderNotFound(order_id.to_string()))?;

		let to = DispositionState::Checked(outcome);
		if !is_valid_transition(&order.disposition, &to) {
			return Err(OrderStateError::InvalidTransition {
				from: order.disposition.clone(),
				to,
			});
		}

		order.disposition = to;
		order.updated_at = now;

		Ok(order.clone())
	}
}

impl Default for OrderBook {
	fn default() -> Self {
		Self::new()
	}
}

/// Checks if a disposition transition is valid.
///
/// `Pending -> Checked` is the only legal move; `Checked` is terminal.
fn is_valid_transition(from: &DispositionState, to: &DispositionState) -> bool {
	matches!(
		(from, to),
		(DispositionState::Pending, DispositionState::Checked(_))
	)
}

fn now_secs() -> Result<u64, OrderStateError> {
	Ok(SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_err(|e| OrderStateError::TimeError(e.to_string()))?
		.as_secs())
}
