//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;
pub mod timeframe;

pub use indicators::{
    BollingerBandsIndicator, Candle, IndicatorSnapshot, ReadyIndicators, RsiIndicator,
};
pub use signal::{AlertCategory, AlertPayload, BandSide, Classification, SignalVerdict};
pub use timeframe::Timeframe;
