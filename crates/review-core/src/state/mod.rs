//! Order state management.

mod order;

pub use order::{OrderBook, OrderStateError};
