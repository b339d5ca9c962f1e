use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar for a fixed interval of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Open time of the interval.
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub period: u32,
    pub std_dev: f64,
}

/// Indicator values for the most recent bar of a series.
///
/// Fields stay `None` until their warm-up window is satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_middle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_lower: Option<f64>,
}

/// Snapshot with every value the classifier needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadyIndicators {
    pub price: f64,
    pub rsi: f64,
    pub upper: f64,
    pub lower: f64,
}

impl IndicatorSnapshot {
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            timestamp,
            rsi: None,
            bollinger_upper: None,
            bollinger_middle: None,
            bollinger_lower: None,
        }
    }

    pub fn with_rsi(mut self, rsi: RsiIndicator) -> Self {
        self.rsi = Some(rsi.value);
        self
    }

    pub fn with_bollinger(mut self, bands: BollingerBandsIndicator) -> Self {
        self.bollinger_upper = Some(bands.upper);
        self.bollinger_middle = Some(bands.middle);
        self.bollinger_lower = Some(bands.lower);
        self
    }

    /// Returns the classifier inputs, or `None` while any is still warming up.
    pub fn ready(&self) -> Option<ReadyIndicators> {
        Some(ReadyIndicators {
            price: self.price,
            rsi: self.rsi?,
            upper: self.bollinger_upper?,
            lower: self.bollinger_lower?,
        })
    }
}
