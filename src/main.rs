use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use flipwatch::config::{AppConfig, LoggingConfig, MetricsConfig};
use flipwatch::models::{Deal, ShirtSearch};
use flipwatch::utils::money::format_gbp;
use flipwatch::{
    CostModel, DealEvaluator, DealMonitor, DealStore, DiscordNotifier, PriceEstimator, PricingTables,
    VintedClient,
};

#[derive(Parser)]
#[command(name = "flipwatch")]
#[command(version, about = "Watches second-hand listings for underpriced resale deals", long_about = None)]
struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single scan and print the deals found
    Scan,
    /// Scan continuously at the configured interval
    Watch,
    /// Search football shirts and print the deals among them
    Shirts {
        /// Search term, e.g. "Arsenal home"
        term: String,
        #[arg(long)]
        min_year: Option<i32>,
        #[arg(long)]
        max_year: Option<i32>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        min_price: f64,
        #[arg(long, default_value_t = 200.0)]
        max_price: f64,
    },
    /// Print previously saved deals
    Deals {
        #[arg(short, long, default_value_t = 30)]
        limit: usize,
    },
}

type Monitor = DealMonitor<VintedClient, PriceEstimator>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging)?;
    init_metrics(&config.metrics)?;

    info!("Starting Flipwatch...");

    match cli.command {
        Commands::Scan => {
            let mut monitor = build_monitor(&config)?;
            let report = monitor.scan().await;
            println!(
                "Scanned {} listings ({} new), {} deals",
                report.listings_fetched,
                report.new_listings,
                report.deals.len()
            );
            print_deals(&report.deals, 30);
        }
        Commands::Watch => {
            let mut monitor = build_monitor(&config)?;
            tokio::select! {
                _ = monitor.watch(None) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down...");
                }
            }
            print_deals(monitor.deals(), 30);
        }
        Commands::Shirts {
            term,
            min_year,
            max_year,
            brand,
            min_price,
            max_price,
        } => {
            let mut search = ShirtSearch::new(term, min_price, max_price);
            search.min_year = min_year;
            search.max_year = max_year;
            search.brand = brand;
            search.check()?;

            let mut monitor = build_monitor(&config)?;
            let deals = monitor.search_shirts(&search).await;
            print_deals(&deals, 30);
        }
        Commands::Deals { limit } => {
            let store = DealStore::new(&config.monitor.deals_csv_path);
            let deals = store.load()?;
            print_deals(&deals, limit);
        }
    }

    Ok(())
}

fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::from_default_env().add_directive(format!("flipwatch={}", config.level).parse()?);

    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "flipwatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            Ok(None)
        }
    }
}

fn init_metrics(config: &MetricsConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], config.port))
        .install()
        .context("Failed to install metrics exporter")?;
    info!("Metrics exporter listening on port {}", config.port);
    Ok(())
}

fn build_monitor(config: &AppConfig) -> Result<Monitor> {
    let tables = Arc::new(PricingTables::standard());
    let estimator = PriceEstimator::new(tables, &config.analyzer);
    let evaluator = DealEvaluator::new(
        estimator,
        CostModel::from_config(&config.analyzer),
        config.analyzer.profit_threshold,
    );

    let source = VintedClient::new(config.source.clone())?.with_reference_year(config.analyzer.reference_year);
    let mut monitor = DealMonitor::new(source, evaluator, config.monitor.clone());
    if let Err(e) = monitor.restore_history() {
        tracing::warn!("Could not restore deal history: {}", e);
    }

    let discord = DiscordNotifier::new(config.notifications.discord.clone())?;
    if discord.is_configured() {
        monitor.add_notifier(Box::new(discord));
    } else {
        info!("Discord webhook not configured, notifications disabled");
    }

    Ok(monitor)
}

fn print_deals(deals: &[Deal], limit: usize) {
    if deals.is_empty() {
        println!("No deals found.");
        return;
    }

    println!(
        "{:<48} {:>6} {:>9} {:>9} {:>8}  {}",
        "Title", "Size", "Price", "Profit", "Profit%", "URL"
    );
    for deal in deals.iter().take(limit) {
        let title: String = deal.title().chars().take(48).collect();
        println!(
            "{:<48} {:>6} {:>9} {:>9} {:>7.1}%  {}",
            title,
            deal.listing.size.as_deref().unwrap_or("-"),
            format_gbp(deal.price()),
            format_gbp(deal.estimated_profit),
            deal.profit_percentage,
            deal.listing.url
        );
    }
}
