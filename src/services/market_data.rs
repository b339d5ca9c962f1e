//! Market data provider interface consumed by the signal engine.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::MarketDataError;
use crate::models::indicators::Candle;
use crate::models::timeframe::Timeframe;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fully-formed bars for `instrument`, oldest first, at most `limit` long.
    async fn fetch_bars(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;

    /// Instruments to scan this cycle.
    async fn list_instruments(&self) -> Result<Vec<String>, MarketDataError>;
}

/// Provider backed by bars held in memory.
///
/// Instruments are listed in insertion order. Instruments marked as failing
/// return a [`MarketDataError::Malformed`] from `fetch_bars`.
#[derive(Debug, Default)]
pub struct InMemoryMarketDataProvider {
    bars: RwLock<HashMap<String, Vec<Candle>>>,
    order: RwLock<Vec<String>>,
    failing: RwLock<HashSet<String>>,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bars(&self, instrument: &str, candles: Vec<Candle>) {
        if let Ok(mut bars) = self.bars.write() {
            if bars.insert(instrument.to_string(), candles).is_none() {
                if let Ok(mut order) = self.order.write() {
                    order.push(instrument.to_string());
                }
            }
        }
    }

    pub fn set_failing(&self, instrument: &str, failing: bool) {
        if let Ok(mut set) = self.failing.write() {
            if failing {
                set.insert(instrument.to_string());
                if let Ok(mut order) = self.order.write() {
                    if !order.iter().any(|s| s == instrument) {
                        order.push(instrument.to_string());
                    }
                }
            } else {
                set.remove(instrument);
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn fetch_bars(
        &self,
        instrument: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let failing = self
            .failing
            .read()
            .map(|set| set.contains(instrument))
            .unwrap_or(false);
        if failing {
            return Err(MarketDataError::Malformed(format!(
                "no data source for {}",
                instrument
            )));
        }

        let bars = self
            .bars
            .read()
            .map_err(|_| MarketDataError::Malformed("bar store poisoned".to_string()))?;
        let candles = bars.get(instrument).cloned().unwrap_or_default();
        let skip = candles.len().saturating_sub(limit);
        Ok(candles.into_iter().skip(skip).collect())
    }

    async fn list_instruments(&self) -> Result<Vec<String>, MarketDataError> {
        self.order
            .read()
            .map(|order| order.clone())
            .map_err(|_| MarketDataError::Malformed("instrument list poisoned".to_string()))
    }
}
