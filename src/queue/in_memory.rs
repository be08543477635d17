//! In-process queue for single-binary deployments and tests.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use super::queue::{EnvelopeQueue, PushError};
use crate::envelope::Envelope;

struct Inner {
    queue: VecDeque<Envelope>,
    closed: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    /// Signaled when an envelope arrives or the queue closes.
    ready: Condvar,
    /// Signaled when a pop frees room in a bounded queue.
    space: Condvar,
}

/// Thread-safe in-memory envelope queue.
///
/// FIFO for a single consumer; with several workers polling, envelopes
/// are handed to whichever worker wakes first (competing consumers).
/// Unbounded by default; [`bounded`](InMemoryQueue::bounded) adds a
/// capacity limit that makes `push` block until a worker drains — the
/// single intentional backpressure point of the bus.
///
/// Cloning produces another handle to the same queue.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use forgebus::{Envelope, EnvelopeQueue, InMemoryQueue};
///
/// let queue = InMemoryQueue::new();
/// queue.push(Envelope::new("new_issue", vec![])).unwrap();
///
/// assert_eq!(queue.poll(Duration::from_millis(10)).unwrap().name, "new_issue");
/// assert!(queue.poll(Duration::from_millis(10)).is_none());
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    shared: Arc<Shared>,
    capacity: Option<usize>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    /// Create an unbounded queue.
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Create a queue that holds at most `capacity` envelopes; `push`
    /// blocks while full.
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity))
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    queue: VecDeque::new(),
                    closed: false,
                }),
                ready: Condvar::new(),
                space: Condvar::new(),
            }),
            capacity,
        }
    }

    /// Number of envelopes currently queued.
    pub fn len(&self) -> usize {
        self.shared.inner.lock().unwrap().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.inner.lock().unwrap().queue.is_empty()
    }
}

impl EnvelopeQueue for InMemoryQueue {
    fn push(&self, envelope: Envelope) -> Result<(), PushError> {
        let mut inner = self.shared.inner.lock().unwrap();
        if let Some(capacity) = self.capacity {
            while inner.queue.len() >= capacity && !inner.closed {
                inner = self.shared.space.wait(inner).unwrap();
            }
        }
        if inner.closed {
            return Err(PushError::Closed);
        }
        inner.queue.push_back(envelope);
        self.shared.ready.notify_one();
        Ok(())
    }

    fn poll(&self, timeout: Duration) -> Option<Envelope> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.shared.inner.lock().unwrap();
        loop {
            if let Some(envelope) = inner.queue.pop_front() {
                self.shared.space.notify_one();
                return Some(envelope);
            }
            if inner.closed {
                return None;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (guard, _timed_out) = self.shared.ready.wait_timeout(inner, remaining).unwrap();
            inner = guard;
        }
    }

    fn close(&self) {
        let mut inner = self.shared.inner.lock().unwrap();
        inner.closed = true;
        // Wake pollers so drained workers can exit, and blocked pushers
        // so they observe the close.
        self.shared.ready.notify_all();
        self.shared.space.notify_all();
    }

    fn is_closed(&self) -> bool {
        self.shared.inner.lock().unwrap().closed
    }
}
