//! Adapters around the signal engine: market data in, notifications out.

pub mod bitget;
pub mod market_data;
pub mod notifier;
pub mod telegram;
