pub mod calculator;
pub mod momentum;
pub mod volatility;

pub use calculator::*;
