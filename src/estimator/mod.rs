pub mod cache;
pub mod collectible;
pub mod general;
pub mod tables;

pub use cache::EstimateCache;
pub use collectible::{CollectibleBreakdown, CollectibleEstimator};
pub use general::GeneralEstimator;
pub use tables::PricingTables;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AnalyzerConfig;
use crate::models::{Category, Listing, PriceEstimate};

/// Anything that can put a resale value on a listing.
///
/// `None` means "not enough signal", and the listing is skipped.
pub trait ValueEstimator {
    fn estimate(&mut self, listing: &Listing) -> Option<PriceEstimate>;

    /// Drop cached estimates that have expired; returns how many went.
    fn purge_expired(&mut self) -> usize {
        0
    }
}

/// Category dispatcher: football shirts go to the collectible rules,
/// everything else to the general brand/keyword rules.
pub struct PriceEstimator<R = StdRng> {
    general: GeneralEstimator<R>,
    collectible: CollectibleEstimator,
}

impl PriceEstimator<StdRng> {
    pub fn new(tables: Arc<PricingTables>, config: &AnalyzerConfig) -> Self {
        Self::with_rng(tables, config, StdRng::from_entropy())
    }

    /// Reproducible estimator for tests and replays.
    pub fn seeded(tables: Arc<PricingTables>, config: &AnalyzerConfig, seed: u64) -> Self {
        Self::with_rng(tables, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PriceEstimator<R> {
    pub fn with_rng(tables: Arc<PricingTables>, config: &AnalyzerConfig, rng: R) -> Self {
        Self {
            general: GeneralEstimator::new(
                Arc::clone(&tables),
                Duration::from_secs(config.cache_ttl_secs),
                rng,
            ),
            collectible: CollectibleEstimator::new(tables, config.reference_year),
        }
    }
}

impl<R: Rng> ValueEstimator for PriceEstimator<R> {
    fn estimate(&mut self, listing: &Listing) -> Option<PriceEstimate> {
        match listing.category {
            Category::FootballShirt => self.collectible.estimate(listing),
            Category::General => self.general.estimate(listing),
        }
    }

    fn purge_expired(&mut self) -> usize {
        self.general.purge_expired()
    }
}
