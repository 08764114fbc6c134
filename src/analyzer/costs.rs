//! Resale cost model: platform and payment fees plus outbound shipping.

use crate::config::AnalyzerConfig;
use crate::models::{Category, Listing};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeModel {
    pub platform_rate: f64,
    pub payment_rate: f64,
}

impl FeeModel {
    pub fn fees(&self, price: f64) -> f64 {
        price * (self.platform_rate + self.payment_rate)
    }
}

impl Default for FeeModel {
    fn default() -> Self {
        Self {
            platform_rate: 0.12,
            payment_rate: 0.03,
        }
    }
}

/// Flat shipping rates: a per-category rate when one exists, else by price bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingTable {
    pub football_shirt: f64,
    /// `(upper bound exclusive, rate)`, ascending.
    pub brackets: Vec<(f64, f64)>,
    pub above_brackets: f64,
}

impl ShippingTable {
    pub fn shipping(&self, price: f64, category: Category) -> f64 {
        if category == Category::FootballShirt {
            return self.football_shirt;
        }
        self.brackets
            .iter()
            .find(|(upper, _)| price < *upper)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.above_brackets)
    }
}

impl Default for ShippingTable {
    fn default() -> Self {
        Self {
            football_shirt: 3.95,
            brackets: vec![(20.0, 3.50), (50.0, 4.95)],
            above_brackets: 6.50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitBreakdown {
    pub estimated_value: f64,
    pub fees: f64,
    pub shipping: f64,
    pub profit: f64,
    pub profit_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostModel {
    pub fees: FeeModel,
    pub shipping: ShippingTable,
}

impl CostModel {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            fees: FeeModel {
                platform_rate: config.platform_fee_rate,
                payment_rate: config.payment_fee_rate,
            },
            shipping: ShippingTable::default(),
        }
    }

    pub fn profit(&self, listing: &Listing, estimated_value: f64) -> ProfitBreakdown {
        let fees = self.fees.fees(listing.price);
        let shipping = self.shipping.shipping(listing.price, listing.category);
        let profit = estimated_value - listing.price - fees - shipping;
        let profit_percentage = if listing.price > 0.0 {
            profit / listing.price * 100.0
        } else {
            0.0
        };

        ProfitBreakdown {
            estimated_value,
            fees,
            shipping,
            profit,
            profit_percentage,
        }
    }
}
