//! Price handler for validating and submitting resale prices.
//!
//! Runs the full validation ladder before any request is sent, issues the
//! single submission, and reflects a confirmed update into the order book
//! and display registry. Derived financials always come verbatim from the
//! response; the core never recomputes them.

use std::sync::Arc;
use tracing::instrument;

use review_remote::RemoteService;
use review_types::PriceOutcome;

use crate::display::DisplayRegistry;
use crate::state::OrderBook;
use crate::validation::validate_price_input;
use crate::EngineError;

/// Handler for the price workflow of one order.
pub struct PriceHandler {
	remote: Arc<RemoteService>,
	book: Arc<OrderBook>,
	display: Arc<DisplayRegistry>,
}

impl PriceHandler {
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

	/// Runs the price flow for one order with the operator's raw input.
	///
	/// Cancellation is the caller never invoking this; once invoked, a
	/// validation failure aborts with no side effects and no request.
	#[instrument(skip_all, fields(order_id = %order_id))]
	pub async fn handle(&self, order_id: &str, input: &str) -> Result<PriceOutcome, EngineError> {
		let order = self.book.get(order_id).await?;
		let price = validate_price_input(input, order.reference_cost)?;

		// Two decimal places on the wire, matching the authority's storage
		let price = price.round_dp(2);

		self.display.begin_submission(order_id).await?;

		let response = match self.remote.submit_price(order_id, price).await {
			Ok(response) => response,
			Err(e) => {
				self.display.end_submission(order_id).await;
				return Err(e.into());
			},
		};

		if !response.is_confirmed() {
			self.display.end_submission(order_id).await;
			tracing::warn!(status = %response.status, "Price update not confirmed");
			return Ok(PriceOutcome::Unconfirmed {
				status: response.status,
			});
		}

		let confirmed_price = response.price.unwrap_or(price);
		let income = response.income.unwrap_or_default();
		let owner = response.owner.clone().unwrap_or_default();
		let profit = response.profit.unwrap_or_default();

		let updated = self
			.book
			.update_with(order_id, |order| {
				order.resale_price = Some(confirmed_price);
			})
			.await;
		if let Err(e) = updated {
			self.display.end_submission(order_id).await;
			return Err(e.into());
		}

		self.display
			.apply_price(order_id, confirmed_price, income, &owner, profit)
			.await;
		tracing::info!(%confirmed_price, %income, "Price updated");

		Ok(PriceOutcome::Updated {
			price: confirmed_price,
			income,
			owner,
			profit,
		})
	}
}
