//! Band-distance + RSI classification of the latest bar.
//!
//! Rules are an ordered list evaluated top to bottom; the first match wins.
//! The extreme variants sit after their standard counterparts and are only
//! reached when the standard rule does not match.

use std::ops::{Bound, RangeBounds};

use crate::error::EngineError;
use crate::models::indicators::ReadyIndicators;
use crate::models::signal::{AlertCategory, BandSide, Classification, SignalVerdict};

/// RSI condition of a rule. Both variants are strict comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RsiBound {
    Above(f64),
    Below(f64),
}

impl RsiBound {
    pub fn admits(&self, rsi: f64) -> bool {
        match *self {
            RsiBound::Above(threshold) => rsi > threshold,
            RsiBound::Below(threshold) => rsi < threshold,
        }
    }
}

/// One alert rule: a distance range beyond the category's band plus an RSI bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRule {
    pub category: AlertCategory,
    pub distance_pct: (Bound<f64>, Bound<f64>),
    pub rsi: RsiBound,
}

impl SignalRule {
    pub fn matches(&self, distance_above_pct: f64, distance_below_pct: f64, rsi: f64) -> bool {
        let distance = match self.category.band_side() {
            BandSide::Upper => distance_above_pct,
            BandSide::Lower => distance_below_pct,
        };
        self.distance_pct.contains(&distance) && self.rsi.admits(rsi)
    }
}

/// Zone in which alert memory is reset. Both bounds are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutralZone {
    pub max_above_pct: f64,
    pub max_below_pct: f64,
}

impl NeutralZone {
    pub fn contains(&self, distance_above_pct: f64, distance_below_pct: f64) -> bool {
        distance_above_pct < self.max_above_pct && distance_below_pct < self.max_below_pct
    }
}

impl Default for NeutralZone {
    fn default() -> Self {
        Self {
            max_above_pct: 40.0,
            max_below_pct: 60.0,
        }
    }
}

/// Standard rule set, in evaluation order.
pub fn default_rules() -> Vec<SignalRule> {
    vec![
        SignalRule {
            category: AlertCategory::Short,
            distance_pct: (Bound::Included(40.0), Bound::Included(60.0)),
            rsi: RsiBound::Above(89.0),
        },
        SignalRule {
            category: AlertCategory::ExtremeShort,
            distance_pct: (Bound::Excluded(40.0), Bound::Unbounded),
            rsi: RsiBound::Above(99.0),
        },
        SignalRule {
            category: AlertCategory::Long,
            distance_pct: (Bound::Included(60.0), Bound::Included(80.0)),
            rsi: RsiBound::Below(10.0),
        },
        SignalRule {
            category: AlertCategory::ExtremeLong,
            distance_pct: (Bound::Excluded(40.0), Bound::Unbounded),
            rsi: RsiBound::Below(1.0),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct SignalClassifier {
    rules: Vec<SignalRule>,
    neutral: NeutralZone,
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self::new(default_rules(), NeutralZone::default())
    }
}

impl SignalClassifier {
    pub fn new(rules: Vec<SignalRule>, neutral: NeutralZone) -> Self {
        Self { rules, neutral }
    }

    pub fn rules(&self) -> &[SignalRule] {
        &self.rules
    }

    pub fn classify(&self, inputs: &ReadyIndicators) -> Result<Classification, EngineError> {
        self.classify_values(inputs.price, inputs.upper, inputs.lower, inputs.rsi)
    }

    pub fn classify_values(
        &self,
        price: f64,
        upper: f64,
        lower: f64,
        rsi: f64,
    ) -> Result<Classification, EngineError> {
        for (name, value) in [("price", price), ("upper", upper), ("lower", lower), ("rsi", rsi)] {
            if !value.is_finite() {
                return Err(EngineError::ClassificationInput(format!(
                    "{} is not finite ({})",
                    name, value
                )));
            }
        }
        // A zero band is rejected; a negative lower band flips the sign of distance_below_pct.
        if upper == 0.0 || lower == 0.0 {
            return Err(EngineError::ClassificationInput(format!(
                "zero band value (upper={}, lower={})",
                upper, lower
            )));
        }

        let distance_above_pct = (price - upper) / upper * 100.0;
        let distance_below_pct = (lower - price) / lower * 100.0;

        let verdict = self
            .rules
            .iter()
            .find(|rule| rule.matches(distance_above_pct, distance_below_pct, rsi))
            .map(|rule| SignalVerdict::from(rule.category))
            .unwrap_or_else(|| {
                if self.neutral.contains(distance_above_pct, distance_below_pct) {
                    SignalVerdict::Neutral
                } else {
                    SignalVerdict::None
                }
            });

        Ok(Classification {
            verdict,
            distance_above_pct,
            distance_below_pct,
        })
    }
}
