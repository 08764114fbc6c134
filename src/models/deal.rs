use serde::{Deserialize, Serialize};
use std::fmt;

use super::Listing;

/// Which heuristic produced an estimate. Bump the version when a table or
/// factor changes so persisted estimates can be traced back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    General,
    Collectible,
}

impl RuleSet {
    pub fn version(&self) -> &'static str {
        match self {
            RuleSet::General => "general-v1",
            RuleSet::Collectible => "collectible-v1",
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceEstimate {
    pub value: f64,
    pub rule_set: RuleSet,
}

impl PriceEstimate {
    pub fn new(value: f64, rule_set: RuleSet) -> Self {
        Self {
            value: value.max(0.0),
            rule_set,
        }
    }
}

/// A listing whose estimated resale value clears the profit threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    #[serde(flatten)]
    pub listing: Listing,
    pub estimated_value: f64,
    pub estimated_profit: f64,
    pub profit_percentage: f64,
}

impl Deal {
    pub fn id(&self) -> &str {
        &self.listing.id
    }

    pub fn title(&self) -> &str {
        &self.listing.title
    }

    pub fn price(&self) -> f64 {
        self.listing.price
    }
}
