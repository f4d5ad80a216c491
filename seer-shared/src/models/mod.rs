pub mod order;
pub mod problem;

pub use order::{LineItem, Order, OrderPayload};
pub use problem::Problem;
