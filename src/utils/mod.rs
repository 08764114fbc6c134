pub mod error;
pub mod money;
pub mod rate_limit;

pub use error::{AppError, Result};
