//! Per-instrument evaluation: bars → indicators → verdict → alert memory.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{EngineError, MarketDataError};
use crate::indicators::{IndicatorCalculator, IndicatorSettings};
use crate::metrics::Metrics;
use crate::models::indicators::{Candle, IndicatorSnapshot, ReadyIndicators};
use crate::models::signal::{AlertCategory, AlertPayload, BandSide, Classification};
use crate::models::timeframe::Timeframe;
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::Notifier;
use crate::signals::classifier::SignalClassifier;
use crate::signals::tracker::{AlertDecision, AlertTracker};

pub const DEFAULT_BAR_LIMIT: usize = 120;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub timeframe: Timeframe,
    /// Bars requested per evaluation.
    pub bar_limit: usize,
    /// Upper bound on a single `fetch_bars` call.
    pub fetch_timeout: Duration,
    pub indicators: IndicatorSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            bar_limit: DEFAULT_BAR_LIMIT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            indicators: IndicatorSettings::default(),
        }
    }
}

/// Result of evaluating one instrument. Never an error: failures are folded
/// into [`EvaluationOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EvaluationOutcome {
    /// Warm-up window not satisfied yet.
    NotReady { bars: usize },
    /// Classified without emitting.
    Evaluated {
        classification: Classification,
        decision: AlertDecision,
    },
    /// New alert handed to the notifier.
    Alerted(AlertPayload),
    Failed(String),
}

impl EvaluationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationOutcome::NotReady { .. } => "not_ready",
            EvaluationOutcome::Evaluated { .. } => "evaluated",
            EvaluationOutcome::Alerted(_) => "alerted",
            EvaluationOutcome::Failed(_) => "failed",
        }
    }
}

pub struct SignalEngine {
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    tracker: Arc<AlertTracker>,
    calculator: IndicatorCalculator,
    classifier: SignalClassifier,
    settings: EngineSettings,
    metrics: Option<Arc<Metrics>>,
}

impl SignalEngine {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
        tracker: Arc<AlertTracker>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            provider,
            notifier,
            tracker,
            calculator: IndicatorCalculator::new(settings.indicators),
            classifier: SignalClassifier::default(),
            settings,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn provider(&self) -> &Arc<dyn MarketDataProvider> {
        &self.provider
    }

    pub fn tracker(&self) -> &Arc<AlertTracker> {
        &self.tracker
    }

    /// Evaluate one instrument end to end. Errors are logged and reported as
    /// [`EvaluationOutcome::Failed`]; they never reach the caller.
    pub async fn evaluate_instrument(&self, instrument: &str) -> EvaluationOutcome {
        let outcome = match self.try_evaluate(instrument).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(symbol = %instrument, error = %e, "Evaluation failed for {}: {}", instrument, e);
                EvaluationOutcome::Failed(e.to_string())
            }
        };

        if let Some(ref metrics) = self.metrics {
            metrics
                .signal_evaluations_total
                .with_label_values(&[outcome.label()])
                .inc();
            metrics.active_alerts.set(self.tracker.active_count() as f64);
        }

        outcome
    }

    async fn try_evaluate(&self, instrument: &str) -> Result<EvaluationOutcome, EngineError> {
        let fetch = self
            .provider
            .fetch_bars(instrument, self.settings.timeframe, self.settings.bar_limit);
        let bars = tokio::time::timeout(self.settings.fetch_timeout, fetch)
            .await
            .map_err(|_| {
                MarketDataError::Timeout(format!(
                    "fetch_bars for {} exceeded {:?}",
                    instrument, self.settings.fetch_timeout
                ))
            })??;

        self.evaluate_bars(instrument, &bars)
    }

    /// Evaluate an already fetched bar series against the instrument's memory.
    pub fn evaluate_bars(
        &self,
        instrument: &str,
        bars: &[Candle],
    ) -> Result<EvaluationOutcome, EngineError> {
        validate_bars(bars)?;

        let snapshot = match self.calculator.snapshot(bars) {
            Some(snapshot) => snapshot,
            None => return Ok(EvaluationOutcome::NotReady { bars: 0 }),
        };
        let inputs = match snapshot.ready() {
            Some(inputs) => inputs,
            None => {
                debug!(
                    symbol = %instrument,
                    bars = bars.len(),
                    needed = self.settings.indicators.warm_up_bars(),
                    "Indicators not ready for {}",
                    instrument
                );
                return Ok(EvaluationOutcome::NotReady { bars: bars.len() });
            }
        };

        let classification = self.classifier.classify(&inputs)?;
        let decision = self.tracker.observe(instrument, classification.verdict);

        match decision {
            AlertDecision::Emit(category) => {
                let payload = build_payload(instrument, category, &snapshot, &inputs, &classification);
                info!(
                    symbol = %instrument,
                    category = %category,
                    price = inputs.price,
                    rsi = inputs.rsi,
                    distance_pct = payload.distance_pct,
                    "{} alert for {}",
                    category,
                    instrument
                );
                if let Some(ref metrics) = self.metrics {
                    metrics
                        .alerts_emitted_total
                        .with_label_values(&[category.as_str()])
                        .inc();
                }
                self.notifier.notify(payload.clone());
                Ok(EvaluationOutcome::Alerted(payload))
            }
            AlertDecision::Reset {
                previous: Some(previous),
            } => {
                debug!(
                    symbol = %instrument,
                    previous = %previous,
                    "Reset alert memory for {}",
                    instrument
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.alert_memory_resets_total.inc();
                }
                Ok(EvaluationOutcome::Evaluated {
                    classification,
                    decision,
                })
            }
            _ => Ok(EvaluationOutcome::Evaluated {
                classification,
                decision,
            }),
        }
    }
}

fn validate_bars(bars: &[Candle]) -> Result<(), EngineError> {
    if let Some(bad) = bars.iter().find(|c| !c.close.is_finite()) {
        return Err(EngineError::MalformedBars(format!(
            "non-finite close at {}",
            bad.timestamp
        )));
    }
    if let Some(pair) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
        return Err(EngineError::MalformedBars(format!(
            "timestamps not strictly increasing: {} then {}",
            pair[0].timestamp, pair[1].timestamp
        )));
    }
    Ok(())
}

fn build_payload(
    instrument: &str,
    category: AlertCategory,
    snapshot: &IndicatorSnapshot,
    inputs: &ReadyIndicators,
    classification: &Classification,
) -> AlertPayload {
    let (band_value, distance_pct) = match category.band_side() {
        BandSide::Upper => (inputs.upper, classification.distance_above_pct),
        BandSide::Lower => (inputs.lower, classification.distance_below_pct),
    };

    AlertPayload {
        instrument: instrument.to_string(),
        category,
        price: inputs.price,
        rsi: inputs.rsi,
        band_value,
        distance_pct,
        bar_time: snapshot.timestamp,
        timestamp: Utc::now(),
    }
}
