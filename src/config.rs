use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

/// Scans closer together than this get the account throttled or blocked.
pub const MIN_SCAN_INTERVAL_SECS: u64 = 120;

pub const DISCORD_WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

/// Year that item ages are measured against.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub analyzer: AnalyzerConfig,
    pub monitor: MonitorConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    pub min_request_interval_ms: u64,
    pub request_timeout: u64,
    pub warmup_min_ms: u64,
    pub warmup_max_ms: u64,
    pub per_page: u32,
    pub currency: String,
    pub usd_to_gbp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub profit_threshold: f64,
    pub platform_fee_rate: f64,
    pub payment_fee_rate: f64,
    pub cache_ttl_secs: u64,
    pub reference_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub min_price: f64,
    pub max_price: f64,
    pub brands: Vec<String>,
    pub random_brand: bool,
    pub scan_interval_secs: u64,
    pub brand_batch_size: usize,
    pub batch_pause_ms: u64,
    pub max_deals_kept: usize,
    pub deals_csv_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub webhook_url: Option<String>,
    pub username: String,
    pub avatar_url: Option<String>,
    pub min_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.vinted.co.uk".to_string(),
            retry_attempts: 3,
            retry_delay_ms: 5000,
            min_request_interval_ms: 1000,
            request_timeout: 15,
            warmup_min_ms: 1000,
            warmup_max_ms: 2500,
            per_page: 20,
            currency: "GBP".to_string(),
            usd_to_gbp: 0.79,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            profit_threshold: 5.0,
            platform_fee_rate: 0.12,
            payment_fee_rate: 0.03,
            cache_ttl_secs: 3600,
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: 1000.0,
            brands: vec!["Nike".to_string(), "Adidas".to_string(), "Supreme".to_string()],
            random_brand: false,
            scan_interval_secs: 300,
            brand_batch_size: 4,
            batch_pause_ms: 200,
            max_deals_kept: 100,
            deals_csv_path: "deals.csv".to_string(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            username: "Flipwatch".to_string(),
            avatar_url: None,
            min_interval_ms: 2000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9001,
        }
    }
}

impl SourceConfig {
    pub fn catalog_url(&self) -> String {
        format!("{}/catalog", self.base_url.trim_end_matches('/'))
    }

    pub fn items_api_url(&self) -> String {
        format!("{}/api/v2/catalog/items", self.base_url.trim_end_matches('/'))
    }

    pub fn item_url(&self, id: &str) -> String {
        format!("{}/items/{}", self.base_url.trim_end_matches('/'), id)
    }
}

impl MonitorConfig {
    /// Scan interval with the throttling floor applied.
    pub fn effective_scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(MIN_SCAN_INTERVAL_SECS))
    }
}

impl AppConfig {
    /// Layered load: defaults, `config/default`, `config/{RUN_MODE}`, `config/local`,
    /// an explicit file if given, then `FLIPWATCH__*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        let s = builder
            .add_source(Environment::with_prefix("FLIPWATCH").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.source.base_url).is_err() {
            return Err(ConfigError::Message("Invalid source base_url format".into()));
        }

        if self.source.retry_attempts == 0 {
            return Err(ConfigError::Message("Source retry_attempts must be greater than 0".into()));
        }

        if self.source.per_page == 0 {
            return Err(ConfigError::Message("Source per_page must be greater than 0".into()));
        }

        if self.source.warmup_min_ms > self.source.warmup_max_ms {
            return Err(ConfigError::Message("Source warmup_min_ms cannot exceed warmup_max_ms".into()));
        }

        if self.source.usd_to_gbp <= 0.0 {
            return Err(ConfigError::Message("Source usd_to_gbp must be positive".into()));
        }

        if self.analyzer.platform_fee_rate < 0.0 || self.analyzer.payment_fee_rate < 0.0 {
            return Err(ConfigError::Message("Fee rates cannot be negative".into()));
        }

        if self.analyzer.platform_fee_rate + self.analyzer.payment_fee_rate >= 1.0 {
            return Err(ConfigError::Message("Combined fee rate must be below 1.0".into()));
        }

        if self.monitor.min_price < 0.0 {
            return Err(ConfigError::Message("Monitor min_price cannot be negative".into()));
        }

        if self.monitor.min_price > self.monitor.max_price {
            return Err(ConfigError::Message("Monitor min_price cannot exceed max_price".into()));
        }

        if self.monitor.brand_batch_size == 0 {
            return Err(ConfigError::Message("Monitor brand_batch_size must be greater than 0".into()));
        }

        if let Some(webhook) = &self.notifications.discord.webhook_url {
            if !webhook.is_empty() && !webhook.starts_with(DISCORD_WEBHOOK_PREFIX) {
                return Err(ConfigError::Message("Invalid Discord webhook URL format".into()));
            }
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::Message("Metrics port must be greater than 0".into()));
        }

        Ok(())
    }
}
