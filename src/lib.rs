pub mod analyzer;
pub mod config;
pub mod estimator;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod source;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use analyzer::{CostModel, DealEvaluator};
pub use config::AppConfig;
pub use estimator::{PriceEstimator, PricingTables, ValueEstimator};
pub use models::{Category, Deal, Listing, SearchFilters, ShirtSearch};
pub use monitor::{DealMonitor, ScanReport};
pub use notify::{DealNotifier, DiscordNotifier, NotificationResult};
pub use source::{ListingSource, VintedClient};
pub use store::DealStore;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
