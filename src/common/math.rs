//! Rolling-window statistics used by the indicators.

/// Simple moving average of the trailing `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Population standard deviation of the trailing `period` values.
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    let mean = sma(values, period)?;
    let window = &values[values.len() - period..];
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
    Some(variance.sqrt())
}

/// Wilder's smoothed moving average step: `((prev * (n - 1)) + current) / n`.
pub fn wilder_smooth(previous: f64, current: f64, period: usize) -> f64 {
    let n = period as f64;
    (previous * (n - 1.0) + current) / n
}
