use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categories that can be held in alert memory and trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    Short,
    ExtremeShort,
    Long,
    ExtremeLong,
}

/// Which Bollinger band an alert category is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSide {
    Upper,
    Lower,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 4] = [
        AlertCategory::Short,
        AlertCategory::ExtremeShort,
        AlertCategory::Long,
        AlertCategory::ExtremeLong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Short => "SHORT",
            AlertCategory::ExtremeShort => "EXTREME_SHORT",
            AlertCategory::Long => "LONG",
            AlertCategory::ExtremeLong => "EXTREME_LONG",
        }
    }

    pub fn band_side(&self) -> BandSide {
        match self {
            AlertCategory::Short | AlertCategory::ExtremeShort => BandSide::Upper,
            AlertCategory::Long | AlertCategory::ExtremeLong => BandSide::Lower,
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalVerdict {
    /// Ambiguous zone; alert memory is left alone.
    None,
    Short,
    ExtremeShort,
    Long,
    ExtremeLong,
    /// Price back inside both bands; alert memory is cleared.
    Neutral,
}

impl SignalVerdict {
    pub fn alert_category(&self) -> Option<AlertCategory> {
        match self {
            SignalVerdict::Short => Some(AlertCategory::Short),
            SignalVerdict::ExtremeShort => Some(AlertCategory::ExtremeShort),
            SignalVerdict::Long => Some(AlertCategory::Long),
            SignalVerdict::ExtremeLong => Some(AlertCategory::ExtremeLong),
            SignalVerdict::None | SignalVerdict::Neutral => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalVerdict::None => "NONE",
            SignalVerdict::Short => "SHORT",
            SignalVerdict::ExtremeShort => "EXTREME_SHORT",
            SignalVerdict::Long => "LONG",
            SignalVerdict::ExtremeLong => "EXTREME_LONG",
            SignalVerdict::Neutral => "NEUTRAL",
        }
    }
}

impl From<AlertCategory> for SignalVerdict {
    fn from(category: AlertCategory) -> Self {
        match category {
            AlertCategory::Short => SignalVerdict::Short,
            AlertCategory::ExtremeShort => SignalVerdict::ExtremeShort,
            AlertCategory::Long => SignalVerdict::Long,
            AlertCategory::ExtremeLong => SignalVerdict::ExtremeLong,
        }
    }
}

impl fmt::Display for SignalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict together with the band distances that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: SignalVerdict,
    /// `(price - upper) / upper * 100`
    pub distance_above_pct: f64,
    /// `(lower - price) / lower * 100`
    pub distance_below_pct: f64,
}

/// Structured alert handed to the notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub instrument: String,
    pub category: AlertCategory,
    pub price: f64,
    pub rsi: f64,
    /// Upper band for short categories, lower band for long ones.
    pub band_value: f64,
    /// Distance beyond `band_value`, in percent.
    pub distance_pct: f64,
    /// Open time of the evaluated bar.
    pub bar_time: DateTime<Utc>,
    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,
}
