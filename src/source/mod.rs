pub mod brands;
pub mod error;
pub mod fallback;
pub mod identity;
pub mod price_parser;
pub mod vinted;

pub use error::SourceError;
pub use fallback::FallbackGenerator;
pub use identity::ClientIdentity;
pub use price_parser::PriceParser;
pub use vinted::VintedClient;

use async_trait::async_trait;

use crate::models::{Listing, SearchFilters, ShirtSearch};

/// A marketplace that can be searched for listings.
///
/// Neither search fails: transient errors are retried inside the source and,
/// once exhausted, replaced with fallback listings so callers always get
/// something to analyse.
#[async_trait]
pub trait ListingSource: Send {
    fn name(&self) -> &str;

    async fn fetch(&mut self, filters: &SearchFilters) -> Vec<Listing>;

    async fn search_football_shirts(&mut self, search: &ShirtSearch) -> Vec<Listing>;
}
