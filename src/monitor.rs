use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analyzer::DealEvaluator;
use crate::config::{MIN_SCAN_INTERVAL_SECS, MonitorConfig};
use crate::estimator::ValueEstimator;
use crate::models::{Deal, SearchFilters, ShirtSearch};
use crate::notify::DealNotifier;
use crate::source::ListingSource;
use crate::source::brands::random_brand;
use crate::store::DealStore;
use crate::utils::error::Result;

/// Outcome of a single scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub brands: Vec<String>,
    pub listings_fetched: usize,
    pub new_listings: usize,
    pub deals: Vec<Deal>,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorStats {
    pub scans: u64,
    pub total_scanned: u64,
    pub last_scan: Option<DateTime<Utc>>,
}

/// Drives repeated scans: fetch by brand batch, evaluate only unseen
/// listings, keep a bounded deal history, alert and persist.
pub struct DealMonitor<S, E> {
    source: S,
    evaluator: DealEvaluator<E>,
    notifiers: Vec<Box<dyn DealNotifier>>,
    store: Option<DealStore>,
    config: MonitorConfig,
    previous_ids: HashSet<String>,
    deals: Vec<Deal>,
    stats: MonitorStats,
    rng: StdRng,
}

impl<S: ListingSource, E: ValueEstimator + Send> DealMonitor<S, E> {
    pub fn new(source: S, evaluator: DealEvaluator<E>, config: MonitorConfig) -> Self {
        let store = if config.deals_csv_path.is_empty() {
            None
        } else {
            Some(DealStore::new(&config.deals_csv_path))
        };

        Self {
            source,
            evaluator,
            notifiers: Vec::new(),
            store,
            config,
            previous_ids: HashSet::new(),
            deals: Vec::new(),
            stats: MonitorStats::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn add_notifier(&mut self, notifier: Box<dyn DealNotifier>) {
        info!("Registered notifier: {}", notifier.name());
        self.notifiers.push(notifier);
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    /// Load the persisted deal history, newest first.
    pub fn restore_history(&mut self) -> Result<usize> {
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let mut deals = store.load()?;
        deals.truncate(self.config.max_deals_kept);
        info!("Restored {} deals from {}", deals.len(), store.path().display());
        self.deals = deals;
        Ok(self.deals.len())
    }

    fn selected_brands(&mut self) -> Vec<String> {
        if self.config.random_brand {
            let brand = random_brand(&mut self.rng).to_string();
            info!("Randomly selected brand: {}", brand);
            vec![brand]
        } else {
            self.config.brands.clone()
        }
    }

    pub async fn scan(&mut self) -> ScanReport {
        let scan_id = Uuid::new_v4();
        let started_at = Utc::now();
        let brands = self.selected_brands();
        info!("Scan {} started for brands {:?}", scan_id, brands);
        self.evaluator.purge_expired();

        let batches: Vec<Vec<String>> = if brands.is_empty() {
            vec![Vec::new()]
        } else {
            brands
                .chunks(self.config.brand_batch_size.max(1))
                .map(|c| c.to_vec())
                .collect()
        };

        let mut listings = Vec::new();
        let batch_count = batches.len();
        for (i, batch) in batches.into_iter().enumerate() {
            let filters = SearchFilters::new(self.config.min_price, self.config.max_price, batch);
            let fetched = self.source.fetch(&filters).await;
            debug!("Batch {}/{} {:?}: {} listings", i + 1, batch_count, filters.brands, fetched.len());
            listings.extend(fetched);

            if i + 1 < batch_count && self.config.batch_pause_ms > 0 {
                sleep(Duration::from_millis(self.config.batch_pause_ms)).await;
            }
        }

        self.stats.scans += 1;
        self.stats.total_scanned += listings.len() as u64;
        self.stats.last_scan = Some(started_at);

        let fresh: Vec<_> = listings
            .iter()
            .filter(|l| !self.previous_ids.contains(&l.id))
            .cloned()
            .collect();
        info!("Fetched {} listings, {} new since last scan", listings.len(), fresh.len());

        let deals = self.evaluator.evaluate(&fresh);

        if !deals.is_empty() {
            let mut history = deals.clone();
            history.append(&mut self.deals);
            history.truncate(self.config.max_deals_kept);
            self.deals = history;
        }

        let mut notifications_sent = 0;
        let mut notifications_failed = 0;
        for deal in &deals {
            for notifier in self.notifiers.iter_mut() {
                let result = notifier.send_deal(deal).await;
                if result.success {
                    notifications_sent += 1;
                } else {
                    notifications_failed += 1;
                    warn!(
                        "{} notification failed for '{}': {}",
                        notifier.name(),
                        deal.title(),
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }

        if !deals.is_empty() {
            if let Some(store) = &self.store {
                if let Err(e) = store.save(&self.deals) {
                    error!("Failed to persist deals to {}: {}", store.path().display(), e);
                }
            }
        }

        self.previous_ids = listings.iter().map(|l| l.id.clone()).collect();

        info!(
            "Scan {} finished: {} deals, {} notifications sent, {} failed",
            scan_id,
            deals.len(),
            notifications_sent,
            notifications_failed
        );

        ScanReport {
            scan_id,
            started_at,
            brands,
            listings_fetched: listings.len(),
            new_listings: fresh.len(),
            deals,
            notifications_sent,
            notifications_failed,
        }
    }

    /// One-off football shirt search, evaluated but not added to the history.
    pub async fn search_shirts(&mut self, search: &ShirtSearch) -> Vec<Deal> {
        let listings = self.source.search_football_shirts(search).await;
        self.stats.total_scanned += listings.len() as u64;
        self.evaluator.evaluate(&listings)
    }

    /// Scan repeatedly, sleeping the clamped interval in between.
    /// Runs until `max_scans` is reached, or forever when `None`.
    pub async fn watch(&mut self, max_scans: Option<u64>) {
        if self.config.scan_interval_secs < MIN_SCAN_INTERVAL_SECS {
            warn!(
                "Scan interval {}s is below the {}s minimum, using {}s",
                self.config.scan_interval_secs, MIN_SCAN_INTERVAL_SECS, MIN_SCAN_INTERVAL_SECS
            );
        }
        let interval = self.config.effective_scan_interval();
        let mut completed = 0u64;

        loop {
            let report = self.scan().await;
            completed += 1;
            info!(
                "Scan {} complete ({} total scanned, {} deals kept)",
                report.scan_id,
                self.stats.total_scanned,
                self.deals.len()
            );

            if max_scans.is_some_and(|max| completed >= max) {
                break;
            }

            info!("Next scan in {}s", interval.as_secs());
            sleep(interval).await;
        }
    }
}
