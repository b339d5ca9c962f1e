//! Bitget public REST client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::messages::{ApiResponse, CandleRow, ContractInfo, SUCCESS_CODE};
use crate::error::MarketDataError;

#[derive(Debug, Clone)]
pub struct BitgetRestClient {
    base_url: Url,
    http: reqwest::Client,
}

impl BitgetRestClient {
    /// Client whose requests give up after `timeout`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, MarketDataError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: Url, http: reqwest::Client) -> Self {
        Self { base_url, http }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| MarketDataError::Malformed(format!("invalid URL for {}: {}", path, e)))?;

        debug!(url = %url, "Bitget GET {}", path);
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::Malformed(format!("{}: {}", path, e)))?;
        if envelope.code != SUCCESS_CODE {
            return Err(MarketDataError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }

        envelope
            .data
            .ok_or_else(|| MarketDataError::Malformed(format!("{}: response has no data", path)))
    }

    /// All contracts listed under `product_type`.
    pub async fn contracts(&self, product_type: &str) -> Result<Vec<ContractInfo>, MarketDataError> {
        self.get(
            "/api/v2/mix/market/contracts",
            &[("productType", product_type.to_string())],
        )
        .await
    }

    /// Raw candle rows, as returned by the exchange.
    pub async fn candles(
        &self,
        symbol: &str,
        product_type: &str,
        granularity: &str,
        limit: usize,
    ) -> Result<Vec<CandleRow>, MarketDataError> {
        self.get(
            "/api/v2/mix/market/candles",
            &[
                ("symbol", symbol.to_string()),
                ("productType", product_type.to_string()),
                ("granularity", granularity.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}
