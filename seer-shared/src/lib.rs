pub mod masked;
pub mod models;

pub use masked::Masked;
