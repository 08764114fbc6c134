use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::error::{AppError, Result};

/// Brand selector that disables brand filtering on the marketplace side.
pub const ANY_BRAND: &str = "Other";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct SearchFilters {
    #[validate(range(min = 0.0))]
    pub min_price: f64,
    #[validate(range(min = 0.0))]
    pub max_price: f64,
    pub brands: Vec<String>,
}

impl SearchFilters {
    pub fn new(min_price: f64, max_price: f64, brands: Vec<String>) -> Self {
        Self {
            min_price,
            max_price,
            brands,
        }
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.min_price > self.max_price {
            return Err(AppError::Validation(format!(
                "min_price {} exceeds max_price {}",
                self.min_price, self.max_price
            )));
        }
        Ok(())
    }
}

/// Football shirt search: a free-text term (usually "<team> <kit>") plus ranges.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ShirtSearch {
    #[validate(length(min = 1))]
    pub search_term: String,
    #[validate(range(min = 0.0))]
    pub min_price: f64,
    #[validate(range(min = 0.0))]
    pub max_price: f64,
    pub brand: Option<String>,
    #[validate(range(min = 1870, max = 2100))]
    pub min_year: Option<i32>,
    #[validate(range(min = 1870, max = 2100))]
    pub max_year: Option<i32>,
}

impl ShirtSearch {
    pub fn new(search_term: impl Into<String>, min_price: f64, max_price: f64) -> Self {
        Self {
            search_term: search_term.into(),
            min_price,
            max_price,
            brand: None,
            min_year: None,
            max_year: None,
        }
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.min_price > self.max_price {
            return Err(AppError::Validation(format!(
                "min_price {} exceeds max_price {}",
                self.min_price, self.max_price
            )));
        }
        if let (Some(min), Some(max)) = (self.min_year, self.max_year) {
            if min > max {
                return Err(AppError::Validation(format!(
                    "min_year {} exceeds max_year {}",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// First word of the search term, e.g. "Liverpool" for "Liverpool home".
    pub fn team_name(&self) -> &str {
        self.search_term
            .split_whitespace()
            .next()
            .unwrap_or(self.search_term.as_str())
    }

    /// Brand to filter on, ignoring the catch-all selector.
    pub fn specific_brand(&self) -> Option<&str> {
        self.brand.as_deref().filter(|b| !b.is_empty() && *b != ANY_BRAND)
    }
}
