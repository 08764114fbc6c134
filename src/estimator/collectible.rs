use std::sync::Arc;
use tracing::debug;

use super::tables::PricingTables;
use crate::models::{Listing, PriceEstimate, RuleSet};
use crate::utils::money::round2;

/// Every factor that went into a collectible estimate, kept for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectibleBreakdown {
    pub base: f64,
    pub team: f64,
    pub age: f64,
    pub special: f64,
    pub condition: f64,
    pub unclamped: f64,
    pub value: f64,
}

/// Markup-and-modifier heuristic for football shirts, clamped so the
/// estimate never implies an unrealistic loss or windfall.
pub struct CollectibleEstimator {
    tables: Arc<PricingTables>,
    reference_year: i32,
}

impl CollectibleEstimator {
    pub fn new(tables: Arc<PricingTables>, reference_year: i32) -> Self {
        Self {
            tables,
            reference_year,
        }
    }

    pub fn breakdown(&self, listing: &Listing) -> Option<CollectibleBreakdown> {
        if !listing.is_priceable() {
            return None;
        }

        let t = &self.tables.collectible;
        let price = listing.price;

        let base = price * t.markup;
        let team = t.team_modifier(listing.team.as_deref());
        let age = t
            .age_tiers
            .modifier(listing.year.map(|year| self.reference_year - year));
        let special = t.special_modifier(&listing.title);
        let condition = t.condition_modifier(&listing.title);

        let unclamped = base * team * age * special * condition;
        let value = round2(unclamped.min(t.ceiling(price)).max(t.floor(price)));

        Some(CollectibleBreakdown {
            base,
            team,
            age,
            special,
            condition,
            unclamped,
            value,
        })
    }

    pub fn estimate(&self, listing: &Listing) -> Option<PriceEstimate> {
        let b = self.breakdown(listing)?;
        debug!(
            "Shirt estimate for '{}': base={:.2} team={} age={} special={:.3} condition={} -> {:.2}",
            listing.title, b.base, b.team, b.age, b.special, b.condition, b.value
        );
        Some(PriceEstimate::new(b.value, RuleSet::Collectible))
    }
}
