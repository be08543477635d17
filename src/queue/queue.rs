//! The minimal contract the bus asks of a queue backend.

use std::fmt;
use std::time::Duration;

use crate::envelope::Envelope;

/// Error type for queue ingress.
///
/// A push failure is the one failure mode producers can observe: the
/// event may be lost unless the producer retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushError {
    /// The queue has been closed for shutdown and accepts no new
    /// envelopes.
    Closed,
    /// The backend rejected or lost the push (connection failure, broker
    /// error, …).
    Backend(String),
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Closed => write!(f, "queue is closed"),
            PushError::Backend(msg) => write!(f, "queue backend error: {}", msg),
        }
    }
}

impl std::error::Error for PushError {}

/// What the dispatcher needs from a queue: concurrent-safe push,
/// timeout-bounded pop, and a close switch for graceful shutdown.
///
/// Delivery guarantees (persistence, at-least-once vs exactly-once,
/// redelivery on crash) are properties of the implementation and are
/// inherited as-is; the bus neither strengthens nor weakens them.
/// Consumers compete: each envelope is popped by exactly one worker.
pub trait EnvelopeQueue: Send + Sync {
    /// Push one envelope. May block for backpressure (a bounded queue
    /// protecting memory under subscriber slowness); fails once the
    /// queue is closed.
    fn push(&self, envelope: Envelope) -> Result<(), PushError>;

    /// Pop the next envelope, waiting up to `timeout` for one to arrive.
    /// Returns `None` on timeout, and immediately once the queue is
    /// closed and drained.
    fn poll(&self, timeout: Duration) -> Option<Envelope>;

    /// Stop accepting pushes. Envelopes already queued remain pollable
    /// so workers can drain.
    fn close(&self);

    /// Whether [`close`](EnvelopeQueue::close) has been called.
    fn is_closed(&self) -> bool;
}
