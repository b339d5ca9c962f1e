//! Unit tests for the band-distance + RSI classifier

use std::ops::Bound;

use bandwatch::error::EngineError;
use bandwatch::models::indicators::ReadyIndicators;
use bandwatch::models::signal::{AlertCategory, SignalVerdict};
use bandwatch::signals::classifier::{default_rules, RsiBound, SignalClassifier};

fn above(price: f64, rsi: f64) -> SignalVerdict {
    // lower band far below price so only the upper rules can fire
    SignalClassifier::default()
        .classify_values(price, 100.0, 10.0, rsi)
        .unwrap()
        .verdict
}

fn below(price: f64, rsi: f64) -> SignalVerdict {
    // upper band far below price so the neutral zone is never entered from above
    SignalClassifier::default()
        .classify_values(price, 1.0, 100.0, rsi)
        .unwrap()
        .verdict
}

#[test]
fn test_default_rule_order() {
    let categories: Vec<AlertCategory> = default_rules().iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![
            AlertCategory::Short,
            AlertCategory::ExtremeShort,
            AlertCategory::Long,
            AlertCategory::ExtremeLong,
        ]
    );

    let rules = default_rules();
    assert_eq!(rules[0].distance_pct, (Bound::Included(40.0), Bound::Included(60.0)));
    assert_eq!(rules[1].rsi, RsiBound::Above(99.0));
    assert_eq!(rules[3].rsi, RsiBound::Below(1.0));
}

#[test]
fn test_short_band_is_inclusive() {
    assert_eq!(above(140.0, 95.0), SignalVerdict::Short);
    assert_eq!(above(160.0, 95.0), SignalVerdict::Short);
    assert_eq!(above(160.5, 95.0), SignalVerdict::None);
    assert_eq!(above(139.0, 95.0), SignalVerdict::Neutral);
}

#[test]
fn test_short_rsi_threshold_is_strict() {
    assert_eq!(above(150.0, 89.0), SignalVerdict::None);
    assert_eq!(above(150.0, 89.01), SignalVerdict::Short);
}

#[test]
fn test_standard_short_takes_precedence_over_extreme() {
    // 50% above with RSI 100 satisfies both upper rules; the first one wins
    assert_eq!(above(150.0, 100.0), SignalVerdict::Short);
    assert_eq!(above(148.0, 100.0), SignalVerdict::Short);
}

#[test]
fn test_extreme_short_beyond_standard_band() {
    assert_eq!(above(170.0, 100.0), SignalVerdict::ExtremeShort);
    assert_eq!(above(170.0, 99.5), SignalVerdict::ExtremeShort);
    assert_eq!(above(170.0, 99.0), SignalVerdict::None);
    assert_eq!(above(170.0, 95.0), SignalVerdict::None);
}

#[test]
fn test_long_band_is_inclusive() {
    assert_eq!(below(40.0, 5.0), SignalVerdict::Long);
    assert_eq!(below(20.0, 5.0), SignalVerdict::Long);
    assert_eq!(below(30.0, 9.99), SignalVerdict::Long);
    assert_eq!(below(30.0, 10.0), SignalVerdict::None);
}

#[test]
fn test_extreme_long() {
    assert_eq!(below(15.0, 0.5), SignalVerdict::ExtremeLong);
    assert_eq!(below(15.0, 5.0), SignalVerdict::None);
    // 50% below fails LONG's 60% floor but clears EXTREME_LONG's 40%
    assert_eq!(below(50.0, 0.5), SignalVerdict::ExtremeLong);
    assert_eq!(below(30.0, 0.5), SignalVerdict::Long);
}

#[test]
fn test_neutral_zone() {
    let classifier = SignalClassifier::default();

    let result = classifier.classify_values(100.0, 110.0, 90.0, 50.0).unwrap();
    assert_eq!(result.verdict, SignalVerdict::Neutral);

    // 10% above the upper band with a nearby lower band is still neutral
    let result = classifier.classify_values(110.0, 100.0, 90.0, 90.0).unwrap();
    assert!((result.distance_above_pct - 10.0).abs() < 1e-9);
    assert_eq!(result.verdict, SignalVerdict::Neutral);

    // 45% below the lower band with RSI 5 matches no rule and resets
    let result = classifier.classify_values(55.0, 120.0, 100.0, 5.0).unwrap();
    assert!((result.distance_below_pct - 45.0).abs() < 1e-9);
    assert_eq!(result.verdict, SignalVerdict::Neutral);
}

#[test]
fn test_none_between_neutral_and_alert_zones() {
    // 45% above with a moderate RSI: outside neutral, no rule matches
    assert_eq!(above(145.0, 50.0), SignalVerdict::None);
    // exactly 40% above is not neutral
    assert_eq!(above(140.0, 50.0), SignalVerdict::None);
    // exactly 60% below is not neutral either
    assert_eq!(below(40.0, 50.0), SignalVerdict::None);
}

#[test]
fn test_classify_reports_distances() {
    let inputs = ReadyIndicators {
        price: 148.0,
        rsi: 95.0,
        upper: 100.0,
        lower: 80.0,
    };
    let result = SignalClassifier::default().classify(&inputs).unwrap();
    assert_eq!(result.verdict, SignalVerdict::Short);
    assert!((result.distance_above_pct - 48.0).abs() < 1e-9);
    assert!((result.distance_below_pct - -85.0).abs() < 1e-9);
}

#[test]
fn test_rejects_invalid_inputs() {
    let classifier = SignalClassifier::default();

    let err = classifier.classify_values(100.0, 0.0, 90.0, 50.0).unwrap_err();
    assert!(matches!(err, EngineError::ClassificationInput(_)));

    let err = classifier.classify_values(100.0, 110.0, 0.0, 50.0).unwrap_err();
    assert!(matches!(err, EngineError::ClassificationInput(_)));

    let err = classifier.classify_values(f64::NAN, 110.0, 90.0, 50.0).unwrap_err();
    assert!(matches!(err, EngineError::ClassificationInput(_)));

    let err = classifier.classify_values(100.0, 110.0, 90.0, f64::INFINITY).unwrap_err();
    assert!(matches!(err, EngineError::ClassificationInput(_)));
}

#[test]
fn test_negative_lower_band_flips_distance_sign() {
    // price above a negative lower band reads as 300% below it
    let result = SignalClassifier::default()
        .classify_values(10.0, 100.0, -5.0, 50.0)
        .unwrap();
    assert!((result.distance_below_pct - 300.0).abs() < 1e-9);
    assert!((result.distance_above_pct - -90.0).abs() < 1e-9);
    assert_eq!(result.verdict, SignalVerdict::None);
}

#[test]
fn test_custom_rules() {
    let classifier = SignalClassifier::new(
        vec![bandwatch::signals::SignalRule {
            category: AlertCategory::Short,
            distance_pct: (Bound::Excluded(0.0), Bound::Unbounded),
            rsi: RsiBound::Above(70.0),
        }],
        Default::default(),
    );
    assert_eq!(classifier.rules().len(), 1);
    let result = classifier.classify_values(105.0, 100.0, 10.0, 75.0).unwrap();
    assert_eq!(result.verdict, SignalVerdict::Short);
}
