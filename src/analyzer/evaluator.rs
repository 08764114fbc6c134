use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

use super::costs::CostModel;
use crate::estimator::ValueEstimator;
use crate::models::{Deal, Listing};
use crate::utils::money::{round1, round2};

/// Prices every listing, nets out fees and shipping, and keeps those whose
/// profit clears the threshold, best first.
pub struct DealEvaluator<E> {
    estimator: E,
    costs: CostModel,
    profit_threshold: f64,
}

impl<E: ValueEstimator> DealEvaluator<E> {
    pub fn new(estimator: E, costs: CostModel, profit_threshold: f64) -> Self {
        Self {
            estimator,
            costs,
            profit_threshold,
        }
    }

    pub fn profit_threshold(&self) -> f64 {
        self.profit_threshold
    }

    /// Forget estimates whose cache entry has expired.
    pub fn purge_expired(&mut self) -> usize {
        self.estimator.purge_expired()
    }

    pub fn evaluate(&mut self, listings: &[Listing]) -> Vec<Deal> {
        self.evaluate_with_threshold(listings, self.profit_threshold)
    }

    pub fn evaluate_with_threshold(&mut self, listings: &[Listing], profit_threshold: f64) -> Vec<Deal> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut deals = Vec::new();

        for listing in listings {
            if !listing.is_priceable() {
                continue;
            }
            if seen.contains(listing.id.as_str()) {
                debug!("Skipping duplicate listing {}", listing.id);
                continue;
            }

            let Some(estimate) = self.estimator.estimate(listing) else {
                debug!("No estimate for '{}'", listing.title);
                continue;
            };

            let breakdown = self.costs.profit(listing, estimate.value);
            if breakdown.profit < profit_threshold {
                continue;
            }

            seen.insert(listing.id.as_str());
            debug!(
                "Deal '{}' price={:.2} value={:.2} fees={:.2} shipping={:.2} profit={:.2} ({})",
                listing.title,
                listing.price,
                breakdown.estimated_value,
                breakdown.fees,
                breakdown.shipping,
                breakdown.profit,
                estimate.rule_set
            );
            deals.push(Deal {
                listing: listing.clone(),
                estimated_value: round2(breakdown.estimated_value),
                estimated_profit: round2(breakdown.profit),
                profit_percentage: round1(breakdown.profit_percentage),
            });
        }

        // Stable: equal profits keep input order
        deals.sort_by(|a, b| {
            b.estimated_profit
                .partial_cmp(&a.estimated_profit)
                .unwrap_or(Ordering::Equal)
        });

        metrics::counter!("flipwatch_deals_found_total").increment(deals.len() as u64);
        info!(
            "Evaluated {} listings, found {} deals (threshold £{:.2})",
            listings.len(),
            deals.len(),
            profit_threshold
        );
        deals
    }
}
