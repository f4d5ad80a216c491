pub mod boundary;

pub use boundary::{error_boundary, HandlerPanic, ReportPanic};
