//! Bitget market data provider implementation

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::client::BitgetRestClient;
use super::messages::parse_candle_row;
use super::{granularity, MAX_CANDLE_LIMIT, USDT_FUTURES};
use crate::error::MarketDataError;
use crate::models::indicators::Candle;
use crate::models::timeframe::Timeframe;
use crate::services::market_data::MarketDataProvider;

pub struct BitgetMarketDataProvider {
    client: Arc<BitgetRestClient>,
    product_type: String,
}

impl BitgetMarketDataProvider {
    pub fn new(client: Arc<BitgetRestClient>) -> Self {
        Self {
            client,
            product_type: USDT_FUTURES.to_string(),
        }
    }
}

/// Sorts by open time, drops duplicate timestamps and any bar that has not
/// closed yet at `now`.
pub fn closed_bars(mut candles: Vec<Candle>, timeframe: Timeframe, now: DateTime<Utc>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);
    candles.retain(|c| c.timestamp + timeframe.duration() <= now);
    candles
}

#[async_trait]
impl MarketDataProvider for BitgetMarketDataProvider {
    async fn fetch_bars(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        // one extra row covers the bar still forming
        let request_limit = (limit + 1).min(MAX_CANDLE_LIMIT);
        let rows = self
            .client
            .candles(instrument, &self.product_type, granularity(timeframe), request_limit)
            .await?;

        let candles = rows
            .iter()
            .map(parse_candle_row)
            .collect::<Result<Vec<_>, _>>()?;

        let mut candles = closed_bars(candles, timeframe, Utc::now());
        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }

        debug!(
            symbol = %instrument,
            timeframe = %timeframe,
            count = candles.len(),
            "Fetched {} closed bars for {}",
            candles.len(),
            instrument
        );
        Ok(candles)
    }

    async fn list_instruments(&self) -> Result<Vec<String>, MarketDataError> {
        let contracts = self.client.contracts(&self.product_type).await?;
        let mut seen = HashSet::new();

        let symbols: Vec<String> = contracts
            .into_iter()
            .filter(|c| c.is_usdt_perpetual())
            .filter(|c| seen.insert(c.symbol.clone()))
            .map(|c| c.symbol)
            .collect();

        debug!(count = symbols.len(), "Listed {} USDT perpetuals", symbols.len());
        Ok(symbols)
    }
}
