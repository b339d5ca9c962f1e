//! Outbound alert interface.

use crate::models::signal::AlertPayload;

/// Receives alerts from the signal engine.
///
/// Delivery is fire-and-forget: `notify` must return without waiting on the
/// transport, and failures stay inside the implementation.
pub trait Notifier: Send + Sync {
    fn notify(&self, payload: AlertPayload);
}
