//! Klinesight market report
//!
//! Prints the enhanced market report for one symbol (default BTCUSDT).
//!
//! Usage: `market-report [SYMBOL] [--basic]`

use dotenvy::dotenv;
use klinesight::config::{get_environment, Config};
use klinesight::logging::{self, TraceIdGenerator};
use klinesight::services::{BinanceKlineSource, MarketDataService};
use serde_json::Value;
use std::env;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let basic = args.iter().any(|a| a == "--basic");
    let symbol = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| "BTCUSDT".to_string());

    let config = Config::from_env();
    info!(
        environment = %get_environment(),
        symbol = %symbol,
        base_url = %config.exchange.base_url,
        degradation = ?config.degradation,
        "Starting market report"
    );

    let source = Arc::new(BinanceKlineSource::new(&config.exchange)?);
    let service = MarketDataService::new(source, config, Arc::new(TraceIdGenerator::new()));

    let report = if basic {
        service.basic_report(&symbol).await
    } else {
        service.enhanced_report(&symbol).await
    };

    match report {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            let context = Value::Object(e.context_map());
            error!(
                error_type = e.error_type(),
                context = %context,
                "Market report failed"
            );
            Err(e.into())
        }
    }
}
