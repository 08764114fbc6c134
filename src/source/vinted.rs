use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::brands::brand_ids_param;
use super::error::SourceError;
use super::fallback::FallbackGenerator;
use super::identity::ClientIdentity;
use super::price_parser::PriceParser;
use super::ListingSource;
use crate::config::{DEFAULT_REFERENCE_YEAR, SourceConfig};
use crate::models::{ANY_BRAND, Listing, SearchFilters, ShirtSearch};
use crate::utils::error::Result;
use crate::utils::rate_limit::RateLimiter;

/// Marketplace category id for shirts and tops.
const SHIRTS_CATALOG_ID: &str = "5066";

static SEASON_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(18[7-9]\d|19\d{2}|20\d{2})\b").expect("season pattern is valid"));

/// Items stay raw so one odd entry cannot fail the whole page.
#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    brand_title: Option<String>,
    #[serde(default)]
    size_title: Option<String>,
    #[serde(default)]
    photos: Option<Vec<RawPhoto>>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct CatalogQuery {
    search_text: String,
    catalog_ids: String,
    brand_ids: String,
    min_price: f64,
    max_price: f64,
    /// Tags every result as a football shirt of this team.
    shirt_team: Option<String>,
}

impl CatalogQuery {
    fn params(&self, config: &SourceConfig) -> Vec<(&'static str, String)> {
        vec![
            ("search_text", self.search_text.clone()),
            ("catalog_ids", self.catalog_ids.clone()),
            ("color_ids", String::new()),
            ("brand_ids", self.brand_ids.clone()),
            ("size_ids", String::new()),
            ("material_ids", String::new()),
            ("status_ids", String::new()),
            ("order", "newest_first".to_string()),
            ("price_from", self.min_price.to_string()),
            ("price_to", self.max_price.to_string()),
            ("currency", config.currency.clone()),
            ("page", "1".to_string()),
            ("per_page", config.per_page.to_string()),
        ]
    }
}

/// Client for the Vinted catalog API.
///
/// Every request goes through the rate limiter. A fetch warms the session up
/// on the catalog page, then queries the items endpoint. Failed attempts back off
/// exponentially and rotate the browser identity; once retries run out the
/// caller gets synthetic listings instead of an error.
pub struct VintedClient<R = StdRng> {
    client: Client,
    config: SourceConfig,
    limiter: RateLimiter,
    prices: PriceParser,
    fallback: FallbackGenerator,
    rng: R,
}

impl VintedClient<StdRng> {
    pub fn new(config: SourceConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng + Send> VintedClient<R> {
    pub fn with_rng(config: SourceConfig, rng: R) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        if let Ok(url) = Url::parse(&config.base_url) {
            jar.add_cookie_str("cookie_consent=true", &url);
        }

        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(Duration::from_millis(config.min_request_interval_ms)),
            prices: PriceParser::new(&config.currency, config.usd_to_gbp),
            fallback: FallbackGenerator::new(config.base_url.clone(), DEFAULT_REFERENCE_YEAR),
            config,
            rng,
        })
    }

    /// Year that synthetic football shirt ages are measured against.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.fallback.set_reference_year(year);
        self
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Delay before retry number `attempt + 1`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        Duration::from_millis(self.config.retry_delay_ms.saturating_mul(factor))
    }

    async fn fetch_with_retry(&mut self, query: &CatalogQuery) -> std::result::Result<Vec<Listing>, SourceError> {
        let max_attempts = self.config.retry_attempts.max(1);
        let mut identity = ClientIdentity::random(&mut self.rng);
        let mut attempt = 0;

        loop {
            info!("Attempt {}/{} to fetch listings", attempt + 1, max_attempts);
            match self.try_fetch(query, &identity).await {
                Ok(listings) => {
                    if attempt > 0 {
                        debug!("Fetch succeeded after {} retries", attempt);
                    }
                    return Ok(listings);
                }
                Err(err) => {
                    attempt += 1;
                    if attempt >= max_attempts {
                        warn!("Fetch failed after {} attempts: {}", max_attempts, err);
                        return Err(err);
                    }

                    let delay = self.backoff_delay(attempt - 1);
                    if err.is_block_signal() {
                        warn!("Marketplace is blocking us: {}", err);
                    }
                    warn!(
                        "Fetch failed (attempt {}/{}): {}. Retrying in {}ms with a new identity",
                        attempt,
                        max_attempts,
                        err,
                        delay.as_millis()
                    );
                    metrics::counter!("flipwatch_source_retries_total").increment(1);

                    sleep(delay).await;
                    identity = ClientIdentity::random(&mut self.rng);
                }
            }
        }
    }

    async fn try_fetch(
        &mut self,
        query: &CatalogQuery,
        identity: &ClientIdentity,
    ) -> std::result::Result<Vec<Listing>, SourceError> {
        let headers = identity.headers(&self.config.base_url);

        self.limiter.acquire().await;
        let init = self
            .client
            .get(self.config.catalog_url())
            .headers(headers.clone())
            .send()
            .await?;
        check_status(init.status())?;

        self.warmup().await;

        self.limiter.acquire().await;
        let response = self
            .client
            .get(self.config.items_api_url())
            .headers(headers)
            .query(&query.params(&self.config))
            .send()
            .await?;
        debug!("Request URL: {}", response.url());
        check_status(response.status())?;

        let body = response.text().await?;
        self.parse_catalog(&body, query)
    }

    async fn warmup(&mut self) {
        let (min, max) = (self.config.warmup_min_ms, self.config.warmup_max_ms);
        if max == 0 {
            return;
        }
        let ms = self.rng.gen_range(min.min(max)..=max);
        sleep(Duration::from_millis(ms)).await;
    }

    fn parse_catalog(&self, body: &str, query: &CatalogQuery) -> std::result::Result<Vec<Listing>, SourceError> {
        let head: String = body.trim_start().chars().take(100).collect::<String>().to_lowercase();
        if head.starts_with('<') || head.contains("<html") {
            return Err(SourceError::Captcha);
        }

        let response: CatalogResponse =
            serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

        let items = response.items.unwrap_or_default();
        let total = items.len();
        let listings: Vec<Listing> = items
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<RawItem>(raw) {
                Ok(item) => self.to_listing(item, query.shirt_team.as_deref()),
                Err(e) => {
                    debug!("Skipping unreadable catalog item: {}", e);
                    None
                }
            })
            .collect();

        if listings.len() < total {
            debug!("Dropped {} items without a usable id or price", total - listings.len());
        }
        Ok(listings)
    }

    fn to_listing(&self, item: RawItem, shirt_team: Option<&str>) -> Option<Listing> {
        let id = match item.id? {
            Value::String(s) if !s.is_empty() => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let price = item.price.as_ref().and_then(|p| self.prices.parse_value(p))?;
        let title = item.title.unwrap_or_default();
        let brand = item
            .brand_title
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| ANY_BRAND.to_string());

        let mut listing = Listing::new(id.clone(), title, price, brand, self.config.item_url(&id));
        if let Some(size) = item.size_title.filter(|s| !s.is_empty()) {
            listing = listing.with_size(size);
        }
        if let Some(photo) = item.photos.into_iter().flatten().find_map(|p| p.url) {
            listing = listing.with_photo(photo);
        }
        if let Some(team) = shirt_team {
            let year = season_year(&listing.title);
            listing = listing.football_shirt(team, year);
        }
        Some(listing)
    }
}

fn check_status(status: StatusCode) -> std::result::Result<(), SourceError> {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(SourceError::Blocked {
            status: status.as_u16(),
        }),
        s if !s.is_success() => Err(SourceError::Status(s.as_u16())),
        _ => Ok(()),
    }
}

/// Season year mentioned in a listing title, e.g. 2004 in "Arsenal 2004 home".
pub fn season_year(title: &str) -> Option<i32> {
    SEASON_YEAR
        .captures(title)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[async_trait]
impl<R: Rng + Send> ListingSource for VintedClient<R> {
    fn name(&self) -> &str {
        "vinted"
    }

    async fn fetch(&mut self, filters: &SearchFilters) -> Vec<Listing> {
        if let Err(e) = filters.check() {
            error!("Ignoring invalid search filters: {}", e);
            return Vec::new();
        }

        let query = CatalogQuery {
            brand_ids: brand_ids_param(&filters.brands),
            min_price: filters.min_price,
            max_price: filters.max_price,
            ..Default::default()
        };

        match self.fetch_with_retry(&query).await {
            Ok(listings) => {
                info!("Fetched {} listings", listings.len());
                metrics::counter!("flipwatch_listings_fetched_total").increment(listings.len() as u64);
                listings
            }
            Err(e) => {
                warn!("All fetch attempts failed ({}), serving fallback listings", e);
                metrics::counter!("flipwatch_source_fallbacks_total").increment(1);
                self.fallback.general_listings(&mut self.rng)
            }
        }
    }

    async fn search_football_shirts(&mut self, search: &ShirtSearch) -> Vec<Listing> {
        if let Err(e) = search.check() {
            error!("Ignoring invalid shirt search: {}", e);
            return Vec::new();
        }

        let query = CatalogQuery {
            search_text: search.search_term.clone(),
            catalog_ids: SHIRTS_CATALOG_ID.to_string(),
            brand_ids: search
                .specific_brand()
                .map(|b| brand_ids_param(&[b]))
                .unwrap_or_default(),
            min_price: search.min_price,
            max_price: search.max_price,
            shirt_team: Some(search.team_name().to_string()),
        };

        match self.fetch_with_retry(&query).await {
            Ok(listings) => {
                let shirts: Vec<Listing> = listings
                    .into_iter()
                    .filter(|l| within_years(l.year, search.min_year, search.max_year))
                    .collect();
                info!("Found {} football shirts for '{}'", shirts.len(), search.search_term);
                metrics::counter!("flipwatch_listings_fetched_total").increment(shirts.len() as u64);
                shirts
            }
            Err(e) => {
                warn!("Football shirt search failed ({}), serving fallback shirts", e);
                metrics::counter!("flipwatch_source_fallbacks_total").increment(1);
                self.fallback.football_shirts(search, &mut self.rng)
            }
        }
    }
}

/// Shirts without a detectable year are kept; the estimator prices them as unknown age.
fn within_years(year: Option<i32>, min: Option<i32>, max: Option<i32>) -> bool {
    let Some(year) = year else {
        return true;
    };
    min.is_none_or(|m| year >= m) && max.is_none_or(|m| year <= m)
}
