//! Disposition handler for processing operator decisions.
//!
//! Validates the decision, issues the single submission to the remote
//! authority, and applies the confirmed result to the order book and the
//! display registry. Unconfirmed responses change nothing and are surfaced
//! explicitly; repeating the identical submission later stays safe.

use std::sync::Arc;
use tracing::instrument;

use review_remote::RemoteService;
use review_types::{
	CheckedOutcome, Decision, DispositionBadge, DispositionOutcome, DispositionState,
	ReasonCatalogue, ReasonCode, ACCEPTED_CODE, CUSTOM_REASON_CODE,
};

use crate::display::DisplayRegistry;
use crate::state::{OrderBook, OrderStateError};
use crate::validation::validate_decision;
use crate::EngineError;

/// Handler for the disposition workflow of one operator decision.
pub struct DispositionHandler {
	remote: Arc<RemoteService>,
	book: Arc<OrderBook>,
	display: Arc<DisplayRegistry>,
}

impl DispositionHandler {
	pub fn new(
		remote: Arc<RemoteService>,
		book: Arc<OrderBook>,
		display: Arc<DisplayRegistry>,
	) -> Self {
		Self {
			remote,
			book,
			display,
		}
	}

	/// Runs the disposition flow for one order.
	///
	/// The decision arrives as an explicit continuation from the
	/// presentation layer; a cancelled prompt simply never reaches here.
	#[instrument(skip_all, fields(order_id = %order_id, code = decision.code()))]
	pub async fn handle(
		&self,
		order_id: &str,
		decision: Decision,
		catalogue: &ReasonCatalogue,
	) -> Result<DispositionOutcome, EngineError> {
		validate_decision(&decision, catalogue)?;

		// Refuse locally before spending a request on a finished review
		let order = self.book.get(order_id).await?;
		if matches!(order.disposition, DispositionState::Checked(_)) {
			return Err(OrderStateError::AlreadyChecked(order_id.to_string()).into());
		}

		self.display.begin_submission(order_id).await?;

		let response = match self
			.remote
			.submit_disposition(order_id, decision.code(), decision.reason_text())
			.await
		{
			Ok(response) => response,
			Err(e) => {
				self.display.end_submission(order_id).await;
				return Err(e.into());
			},
		};

		if !response.is_confirmed() {
			self.display.end_submission(order_id).await;
			tracing::warn!(status = %response.status, "Disposition not confirmed");
			return Ok(DispositionOutcome::Unconfirmed {
				status: response.status,
			});
		}

		let code = response.code.unwrap_or_else(|| decision.code());
		let result = if code == ACCEPTED_CODE {
			self.apply_accepted(order_id).await
		} else {
			// Display text comes from the response: its own catalogue for
			// catalogued codes, the stored string verbatim for custom.
			let reason = if code == CUSTOM_REASON_CODE {
				response.reason.clone().unwrap_or_default()
			} else {
				response.reasons.get(&code).cloned().unwrap_or_default()
			};
			self.apply_unsuitable(order_id, ReasonCode(code), reason).await
		};

		match result {
			Ok(outcome) => Ok(outcome),
			Err(e) => {
				self.display.end_submission(order_id).await;
				Err(e)
			},
		}
	}

	async fn apply_accepted(&self, order_id: &str) -> Result<DispositionOutcome, EngineError> {
		self.book
			.transition(order_id, CheckedOutcome::Accepted)
			.await?;
		self.display
			.apply_disposition(order_id, DispositionBadge::Accepted)
			.await;
		tracing::info!("Order accepted");

		Ok(DispositionOutcome::Accepted)
	}

	async fn apply_unsuitable(
		&self,
		order_id: &str,
		code: ReasonCode,
		reason: String,
	) -> Result<DispositionOutcome, EngineError> {
		self.book
			.transition(
				order_id,
				CheckedOutcome::Unsuitable {
					code,
					reason: reason.clone(),
				},
			)
			.await?;
		self.display
			.apply_disposition(
				order_id,
				DispositionBadge::Unsuitable {
					reason: reason.clone(),
				},
			)
			.await;
		tracing::info!(code = code.0, "Order marked unsuitable");

		Ok(DispositionOutcome::Unsuitable { code, reason })
	}
}
