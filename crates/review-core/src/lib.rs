//! Core workflow engine for the order review desk.
//!
//! This module provides the orchestration logic for the review workflow,
//! coordinating the pure validators, the order book, the display registry,
//! and the remote authority client. Control flow is strictly
//! operator-driven: the presentation layer hands a typed decision or a raw
//! price string to the engine, the engine validates and submits, and only a
//! confirmed response mutates local state.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use review_remote::{RemoteError, RemoteService};
use review_types::{
	Decision, DecisionPrompt, DispositionOutcome, DisplayState, Order, PriceOutcome,
	ReasonCatalogue,
};

pub mod builder;
pub mod display;
pub mod handlers;
pub mod state;
pub mod validation;

use display::{DisplayError, DisplayRegistry};
use handlers::{DispositionHandler, PriceHandler};
use state::{OrderBook, OrderStateError};
use validation::{DecisionValidationError, PriceValidationError};

pub use builder::{BuilderError, ReviewEngineBuilder};

/// Errors that can occur during review workflow operations.
#[derive(Debug, Error)]
pub enum EngineError {
	/// A candidate price failed validation; nothing was sent.
	#[error(transparent)]
	Price(#[from] PriceValidationError),
	/// An operator decision failed validation; nothing was sent.
	#[error(transparent)]
	Decision(#[from] DecisionValidationError),
	/// Order book refused the operation.
	#[error(transparent)]
	State(#[from] OrderStateError),
	/// Display registry refused the operation.
	#[error(transparent)]
	Display(#[from] DisplayError),
	/// The submission could not be carried to the authority.
	#[error("Remote error: {0}")]
	Remote(#[from] RemoteError),
	/// Error related to configuration issues.
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Main engine driving the order review workflow.
///
/// The engine owns the locally tracked order book and display registry and
/// routes every submission through the remote authority client. Orders are
/// independent of one another; concurrent operations on different orders do
/// not interfere, and a second submission for the same order is refused
/// while one is in flight.
pub struct ReviewEngine {
	/// Prompt-side rejection reason catalogue.
	catalogue: ReasonCatalogue,
	/// Locally tracked orders under review.
	book: Arc<OrderBook>,
	/// Per-order display state owned by the presentation collaborator.
	display: Arc<DisplayRegistry>,
	/// Handler for operator decisions.
	disposition: DispositionHandler,
	/// Handler for price updates.
	price: PriceHandler,
}

impl std::fmt::Debug for ReviewEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReviewEngine").finish_non_exhaustive()
	}
}

impl ReviewEngine {
	/// Creates an engine from a remote service and a reason catalogue.
	pub fn new(remote: RemoteService, catalogue: ReasonCatalogue) -> Self {
		let remote = Arc::new(remote);
		let book = Arc::new(OrderBook::new());
		let display = Arc::new(DisplayRegistry::new());

		Self {
			disposition: DispositionHandler::new(
				Arc::clone(&remote),
				Arc::clone(&book),
				Arc::clone(&display),
			),
			price: PriceHandler::new(Arc::clone(&remote), Arc::clone(&book), Arc::clone(&display)),
			catalogue,
			book,
			display,
		}
	}

	/// Registers an externally-sourced order as pending review.
	///
	/// The reference cost is supplied by the caller; it is only ever used
	/// as price-validation input.
	pub async fn register_order(
		&self,
		order_id: &str,
		reference_cost: Option<Decimal>,
	) -> Result<Order, EngineError> {
		let order = self.book.register(order_id, reference_cost).await?;
		self.display.ensure(order_id).await;
		Ok(order)
	}

	/// Builds the decision prompt the presentation layer renders.
	///
	/// The outcome flows back through [`ReviewEngine::decide`]; a cancelled
	/// prompt means `decide` is never called and the order stays pending.
	pub fn decision_prompt(&self, order_id: &str) -> DecisionPrompt {
		DecisionPrompt::new(order_id, &self.catalogue)
	}

	/// Runs the disposition flow for one order with the operator's decision.
	pub async fn decide(
		&self,
		order_id: &str,
		decision: Decision,
	) -> Result<DispositionOutcome, EngineError> {
		self.disposition
			.handle(order_id, decision, &self.catalogue)
			.await
	}

	/// Runs the price flow for one order with the operator's raw input.
	pub async fn set_price(
		&self,
		order_id: &str,
		input: &str,
	) -> Result<PriceOutcome, EngineError> {
		self.price.handle(order_id, input).await
	}

	/// Returns the locally tracked view of an order.
	pub async fn order(&self, order_id: &str) -> Result<Order, EngineError> {
		Ok(self.book.get(order_id).await?)
	}

	/// Returns a snapshot of an order's display state.
	pub async fn display_state(&self, order_id: &str) -> Option<DisplayState> {
		self.display.get(order_id).await
	}

	/// The prompt-side reason catalogue.
	pub fn catalogue(&self) -> &ReasonCatalogue {
		&self.catalogue
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use review_remote::implementations::mock::{MockRemote, MockRemoteConfig};
	use review_types::{
		CheckedOutcome, DispositionBadge, DispositionState, ReasonCode, ACCEPTED_CODE,
	};
	use std::collections::HashMap;

	fn catalogue() -> ReasonCatalogue {
		ReasonCatalogue::new(HashMap::from([
			(2, "Different items".to_string()),
			(3, "Different package contents".to_string()),
			(4, "Listing mismatch".to_string()),
		]))
		.unwrap()
	}

	fn engine_with_mock(config: MockRemoteConfig) -> ReviewEngine {
		let mock = MockRemote::new(config).unwrap();
		let remote = RemoteService::with_implementation("mock", Arc::new(mock));
		ReviewEngine::new(remote, catalogue())
	}

	fn engine_with_cost(order_id: &str, cost: &str) -> ReviewEngine {
		engine_with_mock(MockRemoteConfig {
			reference_costs: HashMap::from([(order_id.to_string(), cost.parse().unwrap())]),
			..MockRemoteConfig::default()
		})
	}

	#[tokio::test]
	async fn price_flow_end_to_end() {
		let engine = engine_with_cost("42", "100.00");
		engine
			.register_order("42", Some("100.00".parse().unwrap()))
			.await
			.unwrap();

		// 86 >= 85.00 cap
		let err = engine.set_price("42", "86").await.unwrap_err();
		assert!(matches!(
			err,
			EngineError::Price(validation::PriceValidationError::OverMarginCap)
		));

		// 0 is not strictly positive
		let err = engine.set_price("42", "0").await.unwrap_err();
		assert!(matches!(
			err,
			EngineError::Price(validation::PriceValidationError::NotPositive)
		));

		// fails the format stage before any numeric work
		let err = engine.set_price("42", "abc").await.unwrap_err();
		assert!(matches!(
			err,
			EngineError::Price(validation::PriceValidationError::InvalidFormat)
		));

		// 84.5 passes every check and is confirmed
		let outcome = engine.set_price("42", "84.5").await.unwrap();
		match outcome {
			PriceOutcome::Updated {
				price,
				income,
				owner,
				profit,
			} => {
				assert_eq!(price, "84.5".parse().unwrap());
				assert_eq!(income, "0.50".parse().unwrap());
				assert_eq!(owner, "reviewer");
				assert_eq!(profit, "0.20".parse().unwrap());
			},
			other => panic!("expected confirmed update, got {:?}", other),
		}

		let order = engine.order("42").await.unwrap();
		assert_eq!(order.resale_price, Some("84.5".parse().unwrap()));

		let display = engine.display_state("42").await.unwrap();
		assert_eq!(display.price_text.as_deref(), Some("84.5$"));
		assert_eq!(display.owner_profit.as_deref(), Some("reviewer: 0.20$"));
		assert!(!display.pending_submission);
	}

	#[tokio::test]
	async fn repeated_price_update_is_a_soft_failure() {
		let engine = engine_with_cost("42", "100.00");
		engine
			.register_order("42", Some("100.00".parse().unwrap()))
			.await
			.unwrap();

		engine.set_price("42", "84.5").await.unwrap();

		let outcome = engine.set_price("42", "80").await.unwrap();
		assert_eq!(
			outcome,
			PriceOutcome::Unconfirmed {
				status: "Already updated".to_string()
			}
		);

		// Prior display values are untouched by the refused attempt
		let display = engine.display_state("42").await.unwrap();
		assert_eq!(display.price_text.as_deref(), Some("84.5$"));
	}

	#[tokio::test]
	async fn accept_decision_transitions_to_checked() {
		let engine = engine_with_mock(MockRemoteConfig::default());
		engine.register_order("42", None).await.unwrap();

		let outcome = engine.decide("42", Decision::Accept).await.unwrap();
		assert_eq!(outcome, DispositionOutcome::Accepted);

		let order = engine.order("42").await.unwrap();
		assert_eq!(
			order.disposition,
			DispositionState::Checked(CheckedOutcome::Accepted)
		);

		let display = engine.display_state("42").await.unwrap();
		assert_eq!(display.badge, DispositionBadge::Accepted);
		assert!(!display.pending_submission);

		// Checked is terminal: the core refuses a second decision locally
		let err = engine.decide("42", Decision::Accept).await.unwrap_err();
		assert!(matches!(
			err,
			EngineError::State(state::OrderStateError::AlreadyChecked(_))
		));
	}

	#[tokio::test]
	async fn catalogued_rejection_shows_the_response_reason() {
		let engine = engine_with_mock(MockRemoteConfig::default());
		engine.register_order("7", None).await.unwrap();

		let outcome = engine
			.decide("7", Decision::Reject(ReasonCode(3)))
			.await
			.unwrap();
		assert_eq!(
			outcome,
			DispositionOutcome::Unsuitable {
				code: ReasonCode(3),
				reason: "Different package contents".to_string()
			}
		);

		let display = engine.display_state("7").await.unwrap();
		assert_eq!(
			display.badge,
			DispositionBadge::Unsuitable {
				reason: "Different package contents".to_string()
			}
		);
	}

	#[tokio::test]
	async fn custom_rejection_carries_the_text_verbatim() {
		let engine = engine_with_mock(MockRemoteConfig::default());
		engine.register_order("7", None).await.unwrap();

		// Nine characters fails the floor before any request
		let err = engine
			.decide("7", Decision::RejectCustom("too short".to_string()))
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			EngineError::Decision(validation::DecisionValidationError::ReasonTooShort { length: 9 })
		));

		let outcome = engine
			.decide("7", Decision::RejectCustom("damaged outer box".to_string()))
			.await
			.unwrap();
		assert_eq!(
			outcome,
			DispositionOutcome::Unsuitable {
				code: ReasonCode(5),
				reason: "damaged outer box".to_string()
			}
		);
	}

	#[tokio::test]
	async fn unknown_reason_code_is_rejected_before_submission() {
		let engine = engine_with_mock(MockRemoteConfig::default());
		engine.register_order("7", None).await.unwrap();

		let err = engine
			.decide("7", Decision::Reject(ReasonCode(9)))
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			EngineError::Decision(validation::DecisionValidationError::UnknownReasonCode(9))
		));
	}

	#[tokio::test]
	async fn unconfirmed_submission_mutates_nothing_and_can_be_repeated() {
		let engine = engine_with_mock(MockRemoteConfig {
			fail_submissions: true,
			..MockRemoteConfig::default()
		});
		engine.register_order("42", None).await.unwrap();

		let outcome = engine.decide("42", Decision::Accept).await.unwrap();
		assert_eq!(
			outcome,
			DispositionOutcome::Unconfirmed {
				status: "Unavailable".to_string()
			}
		);

		let order = engine.order("42").await.unwrap();
		assert_eq!(order.disposition, DispositionState::Pending);

		let display = engine.display_state("42").await.unwrap();
		assert_eq!(display.badge, DispositionBadge::Unreviewed);
		assert!(!display.pending_submission);

		// No partial state was written, so the identical submission repeats
		let outcome = engine.decide("42", Decision::Accept).await.unwrap();
		assert!(matches!(outcome, DispositionOutcome::Unconfirmed { .. }));
	}

	#[tokio::test]
	async fn decision_prompt_lists_all_options_in_order() {
		let engine = engine_with_mock(MockRemoteConfig::default());
		let prompt = engine.decision_prompt("42");

		let codes: Vec<u8> = prompt.options.iter().map(|o| o.code).collect();
		assert_eq!(codes, vec![ACCEPTED_CODE, 2, 3, 4, 5]);
		assert_eq!(prompt.options[0].label, "Mark as checked.");
		assert_eq!(prompt.options[1].label, "Mark as unsuitable. Different items");
	}
}
