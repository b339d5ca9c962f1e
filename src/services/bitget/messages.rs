//! Bitget REST response payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::MarketDataError;
use crate::models::indicators::Candle;

pub const SUCCESS_CODE: &str = "00000";

/// Common `{code, msg, data}` envelope.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

/// Entry of `/api/v2/mix/market/contracts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub symbol: String,
    #[serde(default)]
    pub base_coin: String,
    #[serde(default)]
    pub quote_coin: String,
    #[serde(default)]
    pub symbol_type: String,
    #[serde(default)]
    pub symbol_status: String,
}

impl ContractInfo {
    /// Tradable USDT-quoted perpetual.
    pub fn is_usdt_perpetual(&self) -> bool {
        self.quote_coin.eq_ignore_ascii_case("USDT")
            && self.symbol_type.eq_ignore_ascii_case("perpetual")
            && self.symbol_status.eq_ignore_ascii_case("normal")
    }
}

/// Raw candle row: `[ts, open, high, low, close, baseVolume, quoteVolume]`.
///
/// Fields normally arrive as strings; plain numbers are accepted too.
pub type CandleRow = Vec<Value>;

fn field(row: &CandleRow, index: usize, name: &str) -> Result<f64, MarketDataError> {
    let value = row
        .get(index)
        .ok_or_else(|| MarketDataError::Malformed(format!("candle row missing {}", name)))?;
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| MarketDataError::Malformed(format!("invalid {}: {}", name, value)))
}

pub fn parse_candle_row(row: &CandleRow) -> Result<Candle, MarketDataError> {
    let millis = field(row, 0, "timestamp")? as i64;
    let timestamp: DateTime<Utc> = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| MarketDataError::Malformed(format!("timestamp out of range: {}", millis)))?;

    Ok(Candle::new(
        field(row, 1, "open")?,
        field(row, 2, "high")?,
        field(row, 3, "low")?,
        field(row, 4, "close")?,
        field(row, 5, "volume")?,
        timestamp,
    ))
}
