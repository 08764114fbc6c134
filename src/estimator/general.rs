use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::cache::EstimateCache;
use super::tables::PricingTables;
use crate::models::{Listing, PriceEstimate, RuleSet};

/// Brand and keyword heuristic with simulated market noise.
pub struct GeneralEstimator<R> {
    tables: Arc<PricingTables>,
    cache: EstimateCache,
    rng: R,
}

impl<R: Rng> GeneralEstimator<R> {
    pub fn new(tables: Arc<PricingTables>, cache_ttl: Duration, rng: R) -> Self {
        Self {
            tables,
            cache: EstimateCache::new(cache_ttl),
            rng,
        }
    }

    pub fn estimate(&mut self, listing: &Listing) -> Option<PriceEstimate> {
        let brand = listing.brand.trim();
        if brand.is_empty() || !listing.is_priceable() {
            return None;
        }

        if let Some(value) = self.cache.get(brand, &listing.title) {
            debug!("Cached estimate for {}:{} = {:.2}", brand, listing.title, value);
            return Some(PriceEstimate::new(value, RuleSet::General));
        }

        let general = &self.tables.general;
        let base = general.base_price(brand, &listing.title);
        let variance = self
            .rng
            .gen_range(general.variance_min..=general.variance_max);
        let value = base * variance;

        debug!(
            "Estimated {}:{} base={:.2} variance={:.3} value={:.2}",
            brand, listing.title, base, variance, value
        );
        self.cache.insert(brand, &listing.title, value);
        Some(PriceEstimate::new(value, RuleSet::General))
    }

    pub fn cache(&self) -> &EstimateCache {
        &self.cache
    }

    pub fn purge_expired(&mut self) -> usize {
        let removed = self.cache.purge_expired();
        if removed > 0 {
            debug!("Purged {} expired estimates, {} cached", removed, self.cache.len());
        }
        removed
    }
}
