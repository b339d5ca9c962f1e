//! Scan loop: evaluates the whole instrument universe once per interval.

use std::sync::Arc;
use std::time::{Duration, Instant};

use backon::{ExponentialBuilder, Retryable};
use futures_util::stream::{self, StreamExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::error::MarketDataError;
use crate::metrics::Metrics;
use crate::models::signal::AlertPayload;
use crate::services::market_data::MarketDataProvider;
use crate::signals::engine::{EvaluationOutcome, SignalEngine};

/// Configuration for the scan runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub evaluation_interval: Duration,
    /// Instruments evaluated at the same time; 1 keeps the scan sequential.
    pub concurrency: usize,
    /// Extra attempts when listing the universe fails transiently.
    pub universe_retries: usize,
    pub retry_min_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            evaluation_interval: Duration::from_secs(60),
            concurrency: 1,
            universe_retries: 3,
            retry_min_delay: Duration::from_millis(500),
        }
    }
}

/// Tally of one scan cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub instruments: usize,
    pub alerts: Vec<AlertPayload>,
    pub evaluated: usize,
    pub not_ready: usize,
    /// Instruments whose evaluation failed this cycle.
    pub failed: Vec<String>,
    pub duration: Duration,
}

impl CycleReport {
    fn record(&mut self, instrument: String, outcome: EvaluationOutcome) {
        match outcome {
            EvaluationOutcome::Alerted(payload) => self.alerts.push(payload),
            EvaluationOutcome::Evaluated { .. } => self.evaluated += 1,
            EvaluationOutcome::NotReady { .. } => self.not_ready += 1,
            EvaluationOutcome::Failed(_) => self.failed.push(instrument),
        }
    }
}

pub struct ScanRuntime {
    config: RuntimeConfig,
    engine: Arc<SignalEngine>,
    metrics: Option<Arc<Metrics>>,
}

impl ScanRuntime {
    pub fn new(config: RuntimeConfig, engine: Arc<SignalEngine>) -> Self {
        Self {
            config,
            engine,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn engine(&self) -> &Arc<SignalEngine> {
        &self.engine
    }

    async fn list_universe(&self) -> Result<Vec<String>, MarketDataError> {
        let provider: &dyn MarketDataProvider = self.engine.provider().as_ref();
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.config.retry_min_delay)
            .with_max_times(self.config.universe_retries);

        (|| async move { provider.list_instruments().await })
            .retry(backoff)
            .when(MarketDataError::is_transient)
            .notify(|e: &MarketDataError, delay: Duration| {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Listing instruments failed, retrying");
            })
            .await
    }

    /// Run one scan over a freshly listed universe.
    ///
    /// Only a failure to list the universe aborts the cycle; per-instrument
    /// failures are counted in the report.
    pub async fn run_cycle(&self) -> Result<CycleReport, MarketDataError> {
        let start = Instant::now();
        let instruments = match self.list_universe().await {
            Ok(instruments) => instruments,
            Err(e) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.scan_cycle_failures_total.inc();
                }
                return Err(e);
            }
        };

        info!(count = instruments.len(), "Scanning {} instruments", instruments.len());

        let mut report = CycleReport {
            instruments: instruments.len(),
            ..CycleReport::default()
        };

        if self.config.concurrency <= 1 {
            for instrument in instruments {
                let outcome = self.engine.evaluate_instrument(&instrument).await;
                report.record(instrument, outcome);
            }
        } else {
            let engine = &self.engine;
            let outcomes: Vec<(String, EvaluationOutcome)> = stream::iter(instruments)
                .map(|instrument| async move {
                    let outcome = engine.evaluate_instrument(&instrument).await;
                    (instrument, outcome)
                })
                .buffer_unordered(self.config.concurrency)
                .collect()
                .await;
            for (instrument, outcome) in outcomes {
                report.record(instrument, outcome);
            }
        }

        report.duration = start.elapsed();
        if let Some(ref metrics) = self.metrics {
            metrics.scan_cycles_total.inc();
            metrics.scan_instruments.set(report.instruments as f64);
            metrics
                .scan_cycle_duration_seconds
                .observe(report.duration.as_secs_f64());
        }

        info!(
            instruments = report.instruments,
            alerts = report.alerts.len(),
            evaluated = report.evaluated,
            not_ready = report.not_ready,
            failed = report.failed.len(),
            duration_ms = report.duration.as_millis() as u64,
            "Cycle complete"
        );
        Ok(report)
    }

    /// Scan forever. A cycle that overruns the interval is followed
    /// immediately by the next one; cycles never overlap.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.config.evaluation_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.config.evaluation_interval.as_secs(),
            concurrency = self.config.concurrency,
            "ScanRuntime: started"
        );

        loop {
            ticker.tick().await;
            if let Err(e) = self.run_cycle().await {
                error!(error = %e, "Scan cycle aborted: {}", e);
            }
            debug!("ScanRuntime: waiting for next cycle");
        }
    }
}
