use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{Category, Deal, Listing};
use crate::utils::error::{AppError, Result};

/// One CSV row. Flat because the `csv` crate cannot serialize nested structs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub brand: String,
    pub size: Option<String>,
    pub category: Category,
    pub url: String,
    pub photo: Option<String>,
    pub team: Option<String>,
    pub year: Option<i32>,
    pub estimated_value: f64,
    pub estimated_profit: f64,
    pub profit_percentage: f64,
}

impl From<&Deal> for DealRecord {
    fn from(deal: &Deal) -> Self {
        let l = &deal.listing;
        Self {
            id: l.id.clone(),
            title: l.title.clone(),
            price: l.price,
            brand: l.brand.clone(),
            size: l.size.clone(),
            category: l.category,
            url: l.url.clone(),
            photo: l.photo.clone(),
            team: l.team.clone(),
            year: l.year,
            estimated_value: deal.estimated_value,
            estimated_profit: deal.estimated_profit,
            profit_percentage: deal.profit_percentage,
        }
    }
}

impl From<DealRecord> for Deal {
    fn from(record: DealRecord) -> Self {
        Deal {
            listing: Listing {
                id: record.id,
                title: record.title,
                price: record.price,
                brand: record.brand,
                size: record.size,
                category: record.category,
                url: record.url,
                photo: record.photo,
                team: record.team,
                year: record.year,
            },
            estimated_value: record.estimated_value,
            estimated_profit: record.estimated_profit,
            profit_percentage: record.profit_percentage,
        }
    }
}

/// Deal history persisted as a single CSV file, rewritten on every save.
#[derive(Debug, Clone)]
pub struct DealStore {
    path: PathBuf,
}

impl DealStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, deals: &[Deal]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_writer(File::create(&self.path)?);
        for deal in deals {
            writer.serialize(DealRecord::from(deal))?;
        }
        writer.flush()?;

        info!("Saved {} deals to {}", deals.len(), self.path.display());
        Ok(())
    }

    /// Previously saved deals in file order; empty if nothing was saved yet.
    pub fn load(&self) -> Result<Vec<Deal>> {
        if !self.path.exists() {
            debug!("No deal history at {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let mut deals = Vec::new();
        for record in reader.deserialize::<DealRecord>() {
            let record = record.map_err(|e| AppError::Parse {
                message: format!("bad deal row in {}: {}", self.path.display(), e),
            })?;
            deals.push(Deal::from(record));
        }
        Ok(deals)
    }
}
