//! Indicator snapshot for the latest bar of a series.

use serde::{Deserialize, Serialize};

use crate::indicators::momentum::{calculate_rsi, DEFAULT_RSI_PERIOD};
use crate::indicators::volatility::{
    calculate_bollinger_bands, DEFAULT_BOLLINGER_PERIOD, DEFAULT_BOLLINGER_STD_DEV,
};
use crate::models::indicators::{Candle, IndicatorSnapshot};

/// Indicator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub rsi_period: u32,
    pub bollinger_period: u32,
    pub bollinger_std_dev: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: DEFAULT_RSI_PERIOD,
            bollinger_period: DEFAULT_BOLLINGER_PERIOD,
            bollinger_std_dev: DEFAULT_BOLLINGER_STD_DEV,
        }
    }
}

impl IndicatorSettings {
    /// Bars needed before every indicator is defined.
    pub fn warm_up_bars(&self) -> usize {
        (self.rsi_period as usize + 1).max(self.bollinger_period as usize)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorCalculator {
    settings: IndicatorSettings,
}

impl IndicatorCalculator {
    pub fn new(settings: IndicatorSettings) -> Self {
        Self { settings }
    }

    /// Snapshot for the last candle, or `None` for an empty series.
    pub fn snapshot(&self, candles: &[Candle]) -> Option<IndicatorSnapshot> {
        let last = candles.last()?;
        let mut snapshot = IndicatorSnapshot::new(last.close, last.timestamp);

        if let Some(rsi) = calculate_rsi(candles, self.settings.rsi_period) {
            snapshot = snapshot.with_rsi(rsi);
        }
        if let Some(bands) = calculate_bollinger_bands(
            candles,
            self.settings.bollinger_period,
            self.settings.bollinger_std_dev,
        ) {
            snapshot = snapshot.with_bollinger(bands);
        }

        Some(snapshot)
    }
}
