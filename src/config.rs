//! Environment-based configuration.
//!
//! Everything is read from environment variables (optionally seeded from a
//! `.env` file by the binary). Only the Telegram credentials are required.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::models::timeframe::Timeframe;
use crate::services::bitget;
use crate::services::telegram;
use crate::signals::engine::DEFAULT_BAR_LIMIT;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_EVAL_INTERVAL_SECONDS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_SCAN_CONCURRENCY: usize = 1;

/// Deployment environment name (`APP_ENV`), `sandbox` when unset.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    pub api_url: Url,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub port: u16,
    pub eval_interval: Duration,
    pub timeframe: Timeframe,
    pub bar_limit: usize,
    pub scan_concurrency: usize,
    pub http_timeout: Duration,
    pub bitget_base_url: Url,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("TELEGRAM_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_TOKEN"))?;
        let chat_id = get("CHAT_ID").ok_or(ConfigError::Missing("CHAT_ID"))?;

        let eval_interval_seconds: u64 =
            parse_or("EVAL_INTERVAL_SECONDS", get("EVAL_INTERVAL_SECONDS"), DEFAULT_EVAL_INTERVAL_SECONDS)?;
        if eval_interval_seconds == 0 {
            return Err(invalid("EVAL_INTERVAL_SECONDS", "0", "must be greater than 0"));
        }

        let bar_limit: usize = parse_or("BAR_LIMIT", get("BAR_LIMIT"), DEFAULT_BAR_LIMIT)?;
        if bar_limit < 21 || bar_limit > bitget::MAX_CANDLE_LIMIT - 1 {
            return Err(invalid(
                "BAR_LIMIT",
                &bar_limit.to_string(),
                "must be between 21 and 999",
            ));
        }

        let scan_concurrency: usize =
            parse_or("SCAN_CONCURRENCY", get("SCAN_CONCURRENCY"), DEFAULT_SCAN_CONCURRENCY)?;
        if scan_concurrency == 0 {
            return Err(invalid("SCAN_CONCURRENCY", "0", "must be at least 1"));
        }

        let http_timeout_seconds: u64 =
            parse_or("HTTP_TIMEOUT_SECONDS", get("HTTP_TIMEOUT_SECONDS"), DEFAULT_HTTP_TIMEOUT_SECONDS)?;
        if http_timeout_seconds == 0 {
            return Err(invalid("HTTP_TIMEOUT_SECONDS", "0", "must be greater than 0"));
        }

        Ok(Self {
            telegram: TelegramConfig {
                token,
                chat_id,
                api_url: parse_url(
                    "TELEGRAM_API_URL",
                    get("TELEGRAM_API_URL"),
                    telegram::DEFAULT_API_URL,
                )?,
            },
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            eval_interval: Duration::from_secs(eval_interval_seconds),
            timeframe: parse_or("TIMEFRAME", get("TIMEFRAME"), Timeframe::default())?,
            bar_limit,
            scan_concurrency,
            http_timeout: Duration::from_secs(http_timeout_seconds),
            bitget_base_url: parse_url(
                "BITGET_BASE_URL",
                get("BITGET_BASE_URL"),
                bitget::DEFAULT_BASE_URL,
            )?,
        })
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| invalid(key, &value, &e.to_string())),
    }
}

fn parse_url(key: &'static str, raw: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let value = raw.unwrap_or_else(|| default.to_string());
    Url::parse(&value).map_err(|e| invalid(key, &value, &e.to_string()))
}
