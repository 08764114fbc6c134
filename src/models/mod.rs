pub mod deal;
pub mod filters;
pub mod listing;

// Re-exports for convenience
pub use deal::*;
pub use filters::*;
pub use listing::*;
