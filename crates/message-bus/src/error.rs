//! Transport-level error conditions.
//!
//! A timeout and a closed endpoint are deliberately distinct from each other
//! and from a dropped reply handle: callers converting these into their own
//! error taxonomy usually treat all three as "upstream unavailable", but the
//! distinction matters in logs.

use std::time::Duration;

/// Errors surfaced by the transport primitives.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The endpoint's receiving side is gone; the request was never delivered.
    #[error("endpoint closed")]
    Closed,
    /// The request was delivered but the reply handle was dropped unanswered.
    #[error("reply channel dropped")]
    Dropped,
    /// No reply arrived within the configured bound.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}
