//! Main entry point for the review desk service.
//!
//! This binary drives the order review workflow from the command line: it
//! loads configuration, wires up the remote authority client through the
//! engine builder, and runs one operator action per invocation. The CLI is
//! the presentation collaborator here: it renders the decision prompt and
//! hands the chosen decision back to the engine as an explicit value.

use clap::{Parser, Subcommand};
use review_config::Config;
use review_core::{ReviewEngine, ReviewEngineBuilder};
use review_remote::RemoteFactory;
use review_types::{Decision, DispositionOutcome, PriceOutcome, ReasonCode};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Command-line arguments for the review desk service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

/// Operator actions exposed by the review desk.
#[derive(Subcommand, Debug)]
enum Command {
	/// Print the decision prompt options for an order
	Prompt {
		/// Order identifier
		order_id: String,
	},
	/// Submit an operator decision for an order
	Decide {
		/// Order identifier
		order_id: String,

		/// Accept the order
		#[arg(long, conflicts_with_all = ["reject", "custom"])]
		accept: bool,

		/// Reject with a catalogued reason code
		#[arg(long, conflicts_with = "custom")]
		reject: Option<u8>,

		/// Reject with a custom free-text reason
		#[arg(long)]
		custom: Option<String>,
	},
	/// Validate and submit a resale price for an order
	Price {
		/// Order identifier
		order_id: String,

		/// Candidate price, as entered
		input: String,

		/// The order's known source cost
		#[arg(long)]
		reference_cost: String,
	},
}

/// Main entry point for the review desk service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the review engine with all implementations
/// 5. Runs the requested operator action
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	// Load configuration
	let config_path = args
		.config
		.to_str()
		.ok_or("config path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.workstation.id);

	// Build review engine with implementations
	let engine = build_engine(config)?;

	match args.command {
		Command::Prompt { order_id } => run_prompt(&engine, &order_id),
		Command::Decide {
			order_id,
			accept,
			reject,
			custom,
		} => run_decide(&engine, &order_id, accept, reject, custom).await?,
		Command::Price {
			order_id,
			input,
			reference_cost,
		} => run_price(&engine, &order_id, &input, &reference_cost).await?,
	}

	Ok(())
}

/// Builds the review engine with all remote implementations this binary
/// links in (HTTP for production, mock for development).
fn build_engine(config: Config) -> Result<ReviewEngine, Box<dyn std::error::Error>> {
	let remote_factories: HashMap<String, RemoteFactory> =
		review_remote::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect();

	Ok(ReviewEngineBuilder::new(config).build(remote_factories)?)
}

/// Renders the decision prompt for an order.
fn run_prompt(engine: &ReviewEngine, order_id: &str) {
	let prompt = engine.decision_prompt(order_id);

	println!("Decision options for order {}:", prompt.order_id);
	for option in &prompt.options {
		println!("  [{}] {}", option.code, option.label);
	}
}

/// Runs the disposition flow and reports the confirmed outcome.
async fn run_decide(
	engine: &ReviewEngine,
	order_id: &str,
	accept: bool,
	reject: Option<u8>,
	custom: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
	let decision = if accept {
		Decision::Accept
	} else if let Some(code) = reject {
		Decision::Reject(ReasonCode(code))
	} else if let Some(text) = custom {
		Decision::RejectCustom(text)
	} else {
		return Err("one of --accept, --reject, or --custom is required".into());
	};

	engine.register_order(order_id, None).await?;

	match engine.decide(order_id, decision).await? {
		DispositionOutcome::Accepted => {
			println!("Order {} accepted.", order_id);
		},
		DispositionOutcome::Unsuitable { code, reason } => {
			println!("Order {} marked unsuitable [{}]: {}", order_id, code, reason);
		},
		DispositionOutcome::Unconfirmed { status } => {
			// Soft failure: nothing changed, the action can be repeated
			tracing::warn!(status = %status, "Disposition not confirmed");
			println!("Order {} left unchanged (status: {}).", order_id, status);
		},
	}

	Ok(())
}

/// Runs the price flow and reports the confirmed figures.
async fn run_price(
	engine: &ReviewEngine,
	order_id: &str,
	input: &str,
	reference_cost: &str,
) -> Result<(), Box<dyn std::error::Error>> {
	// An unparseable cost registers as missing, so the price flow reports
	// it as its own error class rather than a format problem
	let reference_cost = Decimal::from_str(reference_cost).ok();
	engine.register_order(order_id, reference_cost).await?;

	match engine.set_price(order_id, input).await? {
		PriceOutcome::Updated {
			price,
			income,
			owner,
			profit,
		} => {
			println!("Order {} price set to {}$.", order_id, price);
			println!("Income: {}$", income);
			println!("{}: {}$", owner, profit);
		},
		PriceOutcome::Unconfirmed { status } => {
			tracing::warn!(status = %status, "Price update not confirmed");
			println!("Order {} left unchanged (status: {}).", order_id, status);
		},
	}

	Ok(())
}
