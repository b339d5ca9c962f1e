//! Bitget USDT-margined perpetual market data.

pub mod client;
pub mod messages;
pub mod provider;

pub use client::BitgetRestClient;
pub use provider::BitgetMarketDataProvider;

use crate::models::timeframe::Timeframe;

pub const DEFAULT_BASE_URL: &str = "https://api.bitget.com";
pub const USDT_FUTURES: &str = "USDT-FUTURES";
/// Largest `limit` the candles endpoint accepts.
pub const MAX_CANDLE_LIMIT: usize = 1000;

/// Bitget `granularity` parameter for a timeframe.
pub fn granularity(timeframe: Timeframe) -> &'static str {
    match timeframe {
        Timeframe::OneMinute => "1m",
        Timeframe::FiveMinutes => "5m",
        Timeframe::FifteenMinutes => "15m",
        Timeframe::ThirtyMinutes => "30m",
        Timeframe::OneHour => "1H",
        Timeframe::FourHours => "4H",
        Timeframe::OneDay => "1D",
    }
}
