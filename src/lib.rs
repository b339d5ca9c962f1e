//! Bollinger/RSI extreme scanner for USDT perpetual swaps.
//!
//! The signal engine turns a bar series into indicator values, classifies the
//! latest bar, and emits an alert only when an instrument enters a new alert
//! category. Market data, notifications and the health server are adapters
//! around that core.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
