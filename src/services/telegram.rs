//! Telegram Bot API notifier.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::NotifyError;
use crate::metrics::Metrics;
use crate::models::signal::{AlertCategory, AlertPayload};
use crate::services::notifier::Notifier;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Human-readable alert text.
pub fn format_alert(payload: &AlertPayload) -> String {
    let (title, rsi_note, band_label, distance_label) = match payload.category {
        AlertCategory::Short => ("📉 SHORT Signal", "", "Upper BB", "Distance Above Upper BB"),
        AlertCategory::ExtremeShort => (
            "⚠️ EXTREME SHORT Alert",
            " (>99)",
            "Upper BB",
            "Distance Above Upper BB",
        ),
        AlertCategory::Long => ("📈 LONG Signal", "", "Lower BB", "Distance Below Lower BB"),
        AlertCategory::ExtremeLong => (
            "⚠️ EXTREME LONG Alert",
            " (<1)",
            "Lower BB",
            "Distance Below Lower BB",
        ),
    };

    format!(
        "{} – {}\nRSI: {:.2}{}\nCurrent Price: {:.8}\n{}: {:.8}\n{}: {:.2}%\n{}",
        title,
        payload.instrument,
        payload.rsi,
        rsi_note,
        payload.price,
        band_label,
        payload.band_value,
        distance_label,
        payload.distance_pct,
        payload.timestamp.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// `sendMessage` endpoint under `api_url`, keeping any path prefix it carries.
fn send_message_url(api_url: &Url, token: &str) -> Result<Url, url::ParseError> {
    let mut base = api_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    // leading "./" keeps "bot<id>:" from parsing as a URL scheme
    base.join(&format!("./bot{}/sendMessage", token))
}

#[derive(Clone)]
pub struct TelegramNotifier {
    api_url: Url,
    token: String,
    chat_id: String,
    http: reqwest::Client,
    metrics: Option<Arc<Metrics>>,
}

impl TelegramNotifier {
    pub fn new(
        api_url: Url,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_url,
            token: token.into(),
            chat_id: chat_id.into(),
            http,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Send `text` to the configured chat and wait for the API's answer.
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let url = send_message_url(&self.api_url, &self.token).map_err(|e| NotifyError::Rejected {
            status: 0,
            body: format!("invalid Telegram URL: {}", e),
        })?;

        let response = self
            .http
            .post(url)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn deliver(&self, payload: AlertPayload) {
        let text = format_alert(&payload);
        match self.send_message(&text).await {
            Ok(()) => debug!(
                symbol = %payload.instrument,
                category = %payload.category,
                "Delivered {} alert for {}",
                payload.category,
                payload.instrument
            ),
            Err(e) => {
                warn!(
                    symbol = %payload.instrument,
                    category = %payload.category,
                    error = %e,
                    "Failed to deliver {} alert for {}",
                    payload.category,
                    payload.instrument
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.alert_delivery_failures_total.inc();
                }
            }
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, payload: AlertPayload) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(
                    symbol = %payload.instrument,
                    error = %e,
                    "No async runtime to deliver alert for {}",
                    payload.instrument
                );
                return;
            }
        };

        let notifier = self.clone();
        handle.spawn(async move {
            notifier.deliver(payload).await;
        });
    }
}
