use garage_deals::config::{load_config, AppConfig};
use garage_deals::model::Deal;
use garage_deals::sort::{sort_deals, SortKey};
use garage_deals::utils::format_price;
use garage_deals::{DealOptions, DealProvider};

use std::path::Path;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        info!("No .env loaded: {}", e);
    }

    let config = Arc::new(read_config());
    info!("Loaded config: {:?}", config);

    let provider = match DealProvider::from_config(config.clone()) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to build deal provider: {}", e);
            return;
        }
    };
    let sort_key = SortKey::parse(&config.sort);

    let Some(interval) = config.refresh_interval_seconds else {
        publish(&provider, sort_key).await;
        return;
    };

    loop {
        publish(&provider, sort_key).await;

        info!("Waiting {}s for next refresh (Ctrl-C to stop)...", interval);
        tokio::select! {
            _ = sleep(Duration::from_secs(interval)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
        }
    }
}

/// Config file is optional; without it the defaults plus environment apply.
fn read_config() -> AppConfig {
    let mut config = if Path::new(CONFIG_PATH).exists() {
        match load_config(CONFIG_PATH) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Config load error, using defaults: {}", e);
                AppConfig::default()
            }
        }
    } else {
        AppConfig::default()
    };
    config.apply_env();
    config
}

/// Fetches, sorts and prints the deal list as `{"deals": [...]}`.
async fn publish(provider: &DealProvider, sort_key: SortKey) {
    let mut deals = provider.get_deals(DealOptions::default()).await;
    sort_deals(&mut deals, sort_key);

    for deal in &deals {
        log_deal(deal);
    }

    match serde_json::to_string_pretty(&serde_json::json!({ "deals": deals })) {
        Ok(payload) => println!("{}", payload),
        Err(e) => error!("Failed to serialize deals: {}", e),
    }
}

fn log_deal(deal: &Deal) {
    info!(
        "{:>3}% off | {} → {} | {} | {}",
        deal.percent_off,
        format_price(deal.original_price),
        format_price(deal.current_price),
        deal.brand,
        deal.title
    );
}
