//! Registry and lifecycle: the object the host process wires up once.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::sender::QueueNotifier;
use super::worker::{DeliveryWorker, WorkerStats};
use crate::notifier::Notifier;
use crate::queue::EnvelopeQueue;

/// Aggregate counters from every worker of a stopped bus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    pub workers: usize,
    pub delivered: usize,
    pub decode_failures: usize,
    pub subscriber_panics: usize,
    pub polls: usize,
}

impl DeliveryStats {
    fn absorb(&mut self, stats: WorkerStats) {
        self.workers += 1;
        self.delivered += stats.delivered;
        self.decode_failures += stats.decode_failures;
        self.subscriber_panics += stats.subscriber_panics;
        self.polls += stats.polls;
    }
}

/// The bus facade: owns the queue handle and the ordered subscriber
/// registry, hands out the sending side, and runs delivery.
///
/// Constructed once at process start; the subscriber list is frozen the
/// moment [`start`](NotifyBus::start) runs (no dynamic add/remove). The
/// registration order is the fan-out order for every envelope.
///
/// ## Example
///
/// ```ignore
/// let bus = NotifyBus::new(InMemoryQueue::new())
///     .with_subscriber(Arc::new(MailNotifier::new(mailer)))
///     .with_subscriber(Arc::new(IndexerNotifier::new(index)));
///
/// let sender = bus.sender(); // hand this to producers
/// let handle = bus.start();
/// // ...
/// let stats = handle.stop(); // close, drain, join
/// ```
pub struct NotifyBus<Q: EnvelopeQueue> {
    queue: Arc<Q>,
    subscribers: Vec<Arc<dyn Notifier>>,
    workers: usize,
    poll_timeout: Duration,
}

impl<Q: EnvelopeQueue + 'static> NotifyBus<Q> {
    pub fn new(queue: Q) -> Self {
        Self {
            queue: Arc::new(queue),
            subscribers: Vec::new(),
            workers: 1,
            poll_timeout: Duration::from_millis(100),
        }
    }

    /// Append a subscriber. Registration order is fan-out order.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Notifier>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Number of delivery workers (default 1). A single worker preserves
    /// queue FIFO end-to-end; more workers trade cross-envelope ordering
    /// for throughput.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// How long an idle worker waits on the queue before re-checking its
    /// stop signal.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// The sending side producers hold. Cheap to clone; implements the
    /// full event contract.
    pub fn sender(&self) -> QueueNotifier<Q> {
        QueueNotifier::new(Arc::clone(&self.queue))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Initialize every subscriber, then spawn the delivery workers.
    ///
    /// The returned handle is the graceful-shutdown hook: dropping it
    /// leaks the workers, [`stop`](BusHandle::stop) drains and joins
    /// them.
    pub fn start(self) -> BusHandle<Q> {
        for subscriber in &self.subscribers {
            subscriber.init();
        }

        let registry: Arc<[Arc<dyn Notifier>]> = self.subscribers.into();
        let workers = (0..self.workers)
            .map(|_| {
                DeliveryWorker::spawn(
                    Arc::clone(&self.queue),
                    Arc::clone(&registry),
                    self.poll_timeout,
                )
            })
            .collect();

        info!(
            workers = self.workers,
            subscribers = registry.len(),
            "notification bus started"
        );

        BusHandle {
            queue: self.queue,
            workers,
        }
    }
}

/// A running bus. Owned by the host's graceful-shutdown coordinator.
pub struct BusHandle<Q: EnvelopeQueue> {
    queue: Arc<Q>,
    workers: Vec<DeliveryWorker>,
}

impl<Q: EnvelopeQueue> BusHandle<Q> {
    /// The sending side, for producers wired up after start.
    pub fn sender(&self) -> QueueNotifier<Q> {
        QueueNotifier::new(Arc::clone(&self.queue))
    }

    /// Block until `stop` fires (or its sender is dropped), then shut
    /// down. This is the entry point a host's graceful-shutdown
    /// coordinator drives: it parks the calling thread while the workers
    /// deliver, and drains on the way out.
    pub fn run_until(self, stop: std::sync::mpsc::Receiver<()>) -> DeliveryStats {
        let _ = stop.recv();
        self.stop()
    }

    /// Graceful shutdown: stop accepting pushes, let the workers drain
    /// everything already queued, join them, and report totals.
    pub fn stop(self) -> DeliveryStats {
        self.queue.close();

        let mut total = DeliveryStats::default();
        for worker in self.workers {
            total.absorb(worker.join());
        }
        debug!(
            delivered = total.delivered,
            decode_failures = total.decode_failures,
            "notification bus stopped"
        );
        total
    }
}
