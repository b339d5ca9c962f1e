//! Per-instrument alert memory.
//!
//! Turns a stream of verdicts into edge-triggered alerts: a category fires
//! once when entered and stays quiet until it changes or the instrument
//! passes through the neutral zone.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use crate::models::signal::{AlertCategory, SignalVerdict};

/// What the tracker decided for one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertDecision {
    /// New category; notify.
    Emit(AlertCategory),
    /// Same category as the active alert.
    Suppress(AlertCategory),
    /// Neutral verdict; `previous` is the memory that was cleared, if any.
    Reset { previous: Option<AlertCategory> },
    /// Ambiguous zone; memory untouched.
    Ignore,
}

impl AlertDecision {
    pub fn should_emit(&self) -> bool {
        matches!(self, AlertDecision::Emit(_))
    }
}

/// Keyed store of the last alert category dispatched per instrument.
///
/// Backed by a sharded map, so instruments on different keys can be
/// evaluated concurrently without contending.
#[derive(Debug, Default)]
pub struct AlertTracker {
    memory: DashMap<String, AlertCategory>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a verdict to the instrument's memory and report the decision.
    pub fn observe(&self, instrument: &str, verdict: SignalVerdict) -> AlertDecision {
        if let Some(category) = verdict.alert_category() {
            return match self.memory.entry(instrument.to_string()) {
                Entry::Occupied(mut entry) => {
                    if *entry.get() == category {
                        AlertDecision::Suppress(category)
                    } else {
                        entry.insert(category);
                        AlertDecision::Emit(category)
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(category);
                    AlertDecision::Emit(category)
                }
            };
        }

        match verdict {
            SignalVerdict::Neutral => AlertDecision::Reset {
                previous: self.memory.remove(instrument).map(|(_, category)| category),
            },
            _ => AlertDecision::Ignore,
        }
    }

    pub fn current(&self, instrument: &str) -> Option<AlertCategory> {
        self.memory.get(instrument).map(|entry| *entry.value())
    }

    /// Number of instruments with an active alert.
    pub fn active_count(&self) -> usize {
        self.memory.len()
    }

    pub fn clear(&self) {
        self.memory.clear();
    }
}
