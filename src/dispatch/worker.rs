//! The receiving side of the dispatcher: the consume loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::envelope::Call;
use crate::notifier::Notifier;
use crate::queue::EnvelopeQueue;

/// Counters from one worker's lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Envelopes decoded and fanned out to every subscriber.
    pub delivered: usize,
    /// Envelopes dropped because they would not decode (unknown event,
    /// wrong arity, garbled argument).
    pub decode_failures: usize,
    /// Subscriber invocations that panicked and were contained.
    pub subscriber_panics: usize,
    /// Poll iterations, including empty ones.
    pub polls: usize,
}

/// A background thread consuming envelopes and fanning them out.
///
/// Each popped envelope is decoded and re-invoked on every registered
/// subscriber in registration order, synchronously, one after another.
/// Nothing a single envelope does is fatal: decode failures are logged
/// and dropped, and a panicking subscriber is contained so the remaining
/// subscribers still see the envelope.
///
/// The worker exits when [`stop`](DeliveryWorker::stop) is called, or on
/// its own once the queue is closed and drained.
pub struct DeliveryWorker {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl DeliveryWorker {
    /// Spawn a worker polling `queue` and delivering to `subscribers`.
    pub fn spawn<Q>(
        queue: Arc<Q>,
        subscribers: Arc<[Arc<dyn Notifier>]>,
        poll_timeout: Duration,
    ) -> Self
    where
        Q: EnvelopeQueue + 'static,
    {
        let (stop_tx, stop_rx) = channel();

        let handle = thread::spawn(move || {
            let mut stats = WorkerStats::default();

            loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }

                stats.polls += 1;

                let envelope = match queue.poll(poll_timeout) {
                    Some(envelope) => envelope,
                    None => {
                        if queue.is_closed() {
                            // Closed and drained.
                            break;
                        }
                        continue;
                    }
                };

                match Call::decode(&envelope) {
                    Ok(call) => {
                        deliver(&call, &subscribers, &mut stats);
                        stats.delivered += 1;
                    }
                    Err(err) => {
                        stats.decode_failures += 1;
                        warn!(event = %envelope.name, error = %err, "dropping undecodable envelope");
                    }
                }
            }

            debug!(
                delivered = stats.delivered,
                decode_failures = stats.decode_failures,
                "delivery worker exiting"
            );
            stats
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Ask the worker to stop at the top of its next iteration, without
    /// waiting for the queue to drain, and join it.
    pub fn stop(mut self) -> WorkerStats {
        let _ = self.stop_tx.send(());
        self.join_inner()
    }

    /// Wait for the worker to exit on its own (queue closed and
    /// drained).
    pub fn join(mut self) -> WorkerStats {
        self.join_inner()
    }

    fn join_inner(&mut self) -> WorkerStats {
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => WorkerStats::default(),
        }
    }
}

/// Fan one decoded call out to every subscriber, in registration order.
///
/// Subscriber invocations are isolated from each other: subscribers log
/// their own failures (operations are void), and a panic is caught here
/// so it cannot take the worker loop down or starve later subscribers.
fn deliver(call: &Call, subscribers: &[Arc<dyn Notifier>], stats: &mut WorkerStats) {
    for subscriber in subscribers {
        let invocation = catch_unwind(AssertUnwindSafe(|| call.apply(subscriber.as_ref())));
        if invocation.is_err() {
            stats.subscriber_panics += 1;
            error!(event = call.name(), "subscriber panicked while handling event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::ids::{IssueId, RepoId, UserId};
    use crate::payload::IssueRef;
    use crate::queue::InMemoryQueue;
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Notifier for Recorder {
        fn new_issue(&self, issue: &IssueRef, _mentions: &[UserId]) {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:new_issue:{}", self.label, issue.index));
        }
    }

    struct Panicker;

    impl Notifier for Panicker {
        fn new_issue(&self, _issue: &IssueRef, _mentions: &[UserId]) {
            panic!("boom");
        }
    }

    fn new_issue_call(index: i64) -> Call {
        Call::NewIssue {
            issue: IssueRef::issue(IssueId(1), RepoId(2), index),
            mentions: vec![],
        }
    }

    fn registry(subscribers: Vec<Arc<dyn Notifier>>) -> Arc<[Arc<dyn Notifier>]> {
        subscribers.into()
    }

    #[test]
    fn fans_out_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscribers = registry(vec![
            Arc::new(Recorder {
                label: "first",
                seen: Arc::clone(&seen),
            }),
            Arc::new(Recorder {
                label: "second",
                seen: Arc::clone(&seen),
            }),
        ]);

        let mut stats = WorkerStats::default();
        deliver(&new_issue_call(42), &subscribers, &mut stats);

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["first:new_issue:42", "second:new_issue:42"]
        );
        assert_eq!(stats.subscriber_panics, 0);
    }

    #[test]
    fn panicking_subscriber_does_not_starve_the_rest() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscribers = registry(vec![
            Arc::new(Panicker),
            Arc::new(Recorder {
                label: "after",
                seen: Arc::clone(&seen),
            }),
        ]);

        let mut stats = WorkerStats::default();
        deliver(&new_issue_call(7), &subscribers, &mut stats);

        assert_eq!(seen.lock().unwrap().as_slice(), ["after:new_issue:7"]);
        assert_eq!(stats.subscriber_panics, 1);
    }

    #[test]
    fn worker_survives_undecodable_envelopes() {
        let queue = Arc::new(InMemoryQueue::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscribers = registry(vec![Arc::new(Recorder {
            label: "only",
            seen: Arc::clone(&seen),
        })]);

        queue
            .push(Envelope::new("no_such_event", vec![]))
            .unwrap();
        queue
            .push(new_issue_call(42).encode().unwrap())
            .unwrap();
        queue.close();

        let worker =
            DeliveryWorker::spawn(Arc::clone(&queue), subscribers, Duration::from_millis(20));
        let stats = worker.join();

        assert_eq!(seen.lock().unwrap().as_slice(), ["only:new_issue:42"]);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.decode_failures, 1);
    }

    #[test]
    fn stop_interrupts_an_idle_worker() {
        let queue = Arc::new(InMemoryQueue::new());
        let worker =
            DeliveryWorker::spawn(Arc::clone(&queue), registry(vec![]), Duration::from_millis(10));

        let stats = worker.stop();
        assert_eq!(stats.delivered, 0);
        // The queue stays open; stop() only halts this worker.
        assert_eq!(queue.push(Envelope::new("x", vec![])), Ok(()));
    }
}
