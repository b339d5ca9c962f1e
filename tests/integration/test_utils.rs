use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use bandwatch::core::http::{create_router, AppState};
use bandwatch::metrics::Metrics;
use bandwatch::services::bitget::{BitgetMarketDataProvider, BitgetRestClient};
use chrono::Utc;
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HOUR_MS: i64 = 3_600_000;

/// HTTP server over a fresh metrics registry.
#[allow(dead_code)]
pub struct TestHttpServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

#[allow(dead_code)]
impl TestHttpServer {
    pub async fn new() -> Self {
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let router = create_router(AppState::new(metrics.clone()));
        let server = TestServer::new(router).expect("start test server");
        Self { server, metrics }
    }
}

/// Bitget provider pointed at a wiremock server.
#[allow(dead_code)]
pub struct MockBitget {
    pub server: MockServer,
    pub provider: Arc<BitgetMarketDataProvider>,
}

#[allow(dead_code)]
impl MockBitget {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let client = BitgetRestClient::new(
            Url::parse(&server.uri()).expect("mock server url"),
            Duration::from_secs(2),
        )
        .expect("build Bitget client");
        let provider = Arc::new(BitgetMarketDataProvider::new(Arc::new(client)));
        Self { server, provider }
    }
}

/// Open time (ms) of the current hour.
pub fn current_hour_open_ms() -> i64 {
    Utc::now().timestamp_millis() / HOUR_MS * HOUR_MS
}

/// Hourly candle rows for `closes`, the last one closing at the top of the
/// current hour, followed by an unfinished bar that opens an hour later so it
/// stays in the future even if the hour rolls over mid-test.
pub fn hourly_rows(closes: &[f64]) -> Vec<Value> {
    let current_open = current_hour_open_ms();
    let first_open = current_open - closes.len() as i64 * HOUR_MS;

    let mut rows: Vec<Value> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| candle_row(first_open + i as i64 * HOUR_MS, *close))
        .collect();
    rows.push(candle_row(current_open + HOUR_MS, 999_999.0));
    rows
}

/// Open time (ms) of a row built by [`hourly_rows`].
pub fn row_open_ms(row: &Value) -> i64 {
    row[0]
        .as_str()
        .and_then(|ts| ts.parse().ok())
        .expect("row timestamp")
}

fn candle_row(open_ms: i64, close: f64) -> Value {
    json!([
        open_ms.to_string(),
        close.to_string(),
        (close * 1.01).to_string(),
        (close * 0.99).to_string(),
        close.to_string(),
        "1000",
        (close * 1000.0).to_string()
    ])
}

/// `count - 1` closes at 100 followed by `last`.
pub fn flat_then(count: usize, last: f64) -> Vec<f64> {
    let mut closes = vec![100.0; count - 1];
    closes.push(last);
    closes
}

pub fn ok_envelope(data: Value) -> Value {
    json!({
        "code": "00000",
        "msg": "success",
        "requestTime": Utc::now().timestamp_millis(),
        "data": data
    })
}

pub fn contract(symbol: &str, quote: &str, symbol_type: &str, status: &str) -> Value {
    json!({
        "symbol": symbol,
        "baseCoin": symbol.trim_end_matches(quote),
        "quoteCoin": quote,
        "symbolType": symbol_type,
        "symbolStatus": status,
        "pricePlace": "1"
    })
}

pub async fn mock_contracts(server: &MockServer, contracts: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/v2/mix/market/contracts"))
        .and(query_param("productType", "USDT-FUTURES"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(Value::Array(contracts))))
        .mount(server)
        .await;
}

pub async fn mock_candles(server: &MockServer, symbol: &str, rows: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/v2/mix/market/candles"))
        .and(query_param("symbol", symbol))
        .and(query_param("productType", "USDT-FUTURES"))
        .and(query_param("granularity", "1H"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(Value::Array(rows))))
        .mount(server)
        .await;
}

/// Poll `check` until it holds or `timeout` elapses.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check().await
}
