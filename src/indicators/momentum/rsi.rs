//! RSI (Relative Strength Index) indicator

use crate::common::math;
use crate::models::indicators::{Candle, RsiIndicator};

pub const DEFAULT_RSI_PERIOD: u32 = 14;

/// Per-bar RSI over closing prices using Wilder's smoothing.
///
/// Entry `i` is `None` until `period` changes are available, i.e. the first
/// defined value is at index `period`. The first average gain/loss is the
/// simple mean of the first `period` changes; later averages follow
/// `((prev * (n - 1)) + current) / n`.
pub fn rsi_series(closes: &[f64], period: u32) -> Vec<Option<f64>> {
    let period = period as usize;
    let mut series = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return series;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let seed = &changes[..period];
    let mut avg_gain = seed.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
    let mut avg_loss = seed.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;
    series[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for (offset, change) in changes.iter().enumerate().skip(period) {
        avg_gain = math::wilder_smooth(avg_gain, change.max(0.0), period);
        avg_loss = math::wilder_smooth(avg_loss, (-change).max(0.0), period);
        // changes[k] ends at closes[k + 1]
        series[offset + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    series
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // flat series has no direction
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate RSI for the last candle
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Option<RsiIndicator> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let value = rsi_series(&closes, period).last().copied().flatten()?;
    Some(RsiIndicator { value, period })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<RsiIndicator> {
    calculate_rsi(candles, DEFAULT_RSI_PERIOD)
}
