//! Bandwatch Scanner
//!
//! Runs the Bollinger/RSI scan loop over every Bitget USDT perpetual and a
//! small HTTP server answering liveness and metrics requests.

use bandwatch::config::{get_environment, AppConfig};
use bandwatch::core::http::start_server;
use bandwatch::core::runtime::{RuntimeConfig, ScanRuntime};
use bandwatch::logging;
use bandwatch::metrics::Metrics;
use bandwatch::services::bitget::{BitgetMarketDataProvider, BitgetRestClient};
use bandwatch::services::market_data::MarketDataProvider;
use bandwatch::services::notifier::Notifier;
use bandwatch::services::telegram::TelegramNotifier;
use bandwatch::signals::engine::{EngineSettings, SignalEngine};
use bandwatch::signals::tracker::AlertTracker;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    info!("Starting Bandwatch Scanner");
    info!(environment = %get_environment(), "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(
        timeframe = %config.timeframe,
        bar_limit = config.bar_limit,
        interval_secs = config.eval_interval.as_secs(),
        concurrency = config.scan_concurrency,
        "Scan settings"
    );

    let metrics = Arc::new(Metrics::new()?);

    let bitget = Arc::new(BitgetRestClient::new(
        config.bitget_base_url.clone(),
        config.http_timeout,
    )?);
    let provider: Arc<dyn MarketDataProvider> = Arc::new(BitgetMarketDataProvider::new(bitget));

    let notifier: Arc<dyn Notifier> = Arc::new(
        TelegramNotifier::new(
            config.telegram.api_url.clone(),
            config.telegram.token.clone(),
            config.telegram.chat_id.clone(),
            config.http_timeout,
        )?
        .with_metrics(metrics.clone()),
    );

    let settings = EngineSettings {
        timeframe: config.timeframe,
        bar_limit: config.bar_limit,
        fetch_timeout: config.http_timeout * 3,
        ..EngineSettings::default()
    };
    let engine = Arc::new(
        SignalEngine::new(provider, notifier, Arc::new(AlertTracker::new()), settings)
            .with_metrics(metrics.clone()),
    );

    let runtime = ScanRuntime::new(
        RuntimeConfig {
            evaluation_interval: config.eval_interval,
            concurrency: config.scan_concurrency,
            ..RuntimeConfig::default()
        },
        engine,
    )
    .with_metrics(metrics.clone());

    let port = config.port;
    let server_metrics = metrics.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, server_metrics).await {
            error!(error = %e, "HTTP server error");
        }
    });

    let runtime_handle = tokio::spawn(async move {
        runtime.run().await;
    });

    // Graceful shutdown
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down scanner...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
        _ = runtime_handle => {
            error!("Scan runtime stopped");
        }
    }

    Ok(())
}
