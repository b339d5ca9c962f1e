//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::{BollingerBandsIndicator, Candle};

pub const DEFAULT_BOLLINGER_PERIOD: u32 = 20;
pub const DEFAULT_BOLLINGER_STD_DEV: f64 = 2.0;

fn bands_for_window(closes: &[f64], period: u32, std_dev: f64) -> Option<BollingerBandsIndicator> {
    let middle = math::sma(closes, period as usize)?;
    let std = math::standard_deviation(closes, period as usize)?;

    Some(BollingerBandsIndicator {
        upper: middle + (std_dev * std),
        middle,
        lower: middle - (std_dev * std),
        period,
        std_dev,
    })
}

/// Per-bar Bollinger Bands; entry `i` only looks at closes `..=i`.
pub fn bollinger_series(
    closes: &[f64],
    period: u32,
    std_dev: f64,
) -> Vec<Option<BollingerBandsIndicator>> {
    (0..closes.len())
        .map(|i| bands_for_window(&closes[..=i], period, std_dev))
        .collect()
}

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * population standard deviation)
/// Lower Band = Middle - (std_dev * population standard deviation)
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Option<BollingerBandsIndicator> {
    if candles.len() < period as usize {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    bands_for_window(&closes, period, std_dev)
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Option<BollingerBandsIndicator> {
    calculate_bollinger_bands(candles, DEFAULT_BOLLINGER_PERIOD, DEFAULT_BOLLINGER_STD_DEV)
}
