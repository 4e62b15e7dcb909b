//! Workflow handlers for operator actions.

mod disposition;
mod price;

pub use disposition::DispositionHandler;
pub use price::PriceHandler;
