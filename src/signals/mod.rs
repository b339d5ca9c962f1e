//! Signal classification, alert memory and per-instrument evaluation.

pub mod classifier;
pub mod engine;
pub mod tracker;

pub use classifier::{default_rules, NeutralZone, RsiBound, SignalClassifier, SignalRule};
pub use engine::{EngineSettings, EvaluationOutcome, SignalEngine};
pub use tracker::{AlertDecision, AlertTracker};
