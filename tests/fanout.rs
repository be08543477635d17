//! End-to-end delivery through the full stack: sender → envelope →
//! queue → worker → subscribers.

mod support;

use std::sync::{Arc, Mutex};
use std::thread;

use forgebus::{
    Envelope, EnvelopeQueue, IndexerNotifier, InMemoryQueue, IssueId, IssueRef, MailNotifier,
    Notifier, NotifyBus, RepoId, UserId,
};
use support::{BufferIndex, BufferMailer, PanickingNotifier, RecordingNotifier};

#[test]
fn mail_and_index_both_react_to_a_new_issue() {
    support::init_tracing();

    let attempts = Arc::new(Mutex::new(Vec::new()));
    let indexed = Arc::new(Mutex::new(Vec::new()));

    // Mail first, indexer second; a mail failure for one recipient must
    // not disturb the indexer.
    let mailer = BufferMailer::new(Arc::clone(&attempts)).failing_for(UserId(9));
    let bus = NotifyBus::new(InMemoryQueue::new())
        .with_subscriber(Arc::new(MailNotifier::new(mailer)))
        .with_subscriber(Arc::new(IndexerNotifier::new(BufferIndex::new(
            Arc::clone(&indexed),
        ))));

    let sender = bus.sender();
    let handle = bus.start();

    let issue = IssueRef::issue(IssueId(42), RepoId(1), 42);
    sender.new_issue(&issue, &[UserId(7), UserId(9)]);

    let stats = handle.stop();
    assert_eq!(stats.delivered, 1);

    let attempts = attempts.lock().unwrap();
    let recipients: Vec<UserId> = attempts.iter().map(|m| m.to).collect();
    assert_eq!(recipients, [UserId(7), UserId(9)]);
    assert!(attempts[0].subject.contains("#42"));

    assert_eq!(*indexed.lock().unwrap(), [IssueId(42)]);
}

#[test]
fn subscribers_fire_in_registration_order() {
    support::init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let bus = NotifyBus::new(InMemoryQueue::new())
        .with_subscriber(Arc::new(RecordingNotifier::new("mail", Arc::clone(&log))))
        .with_subscriber(Arc::new(RecordingNotifier::new("index", Arc::clone(&log))))
        .with_subscriber(Arc::new(RecordingNotifier::new("audit", Arc::clone(&log))));

    let sender = bus.sender();
    let handle = bus.start();

    sender.new_issue(&IssueRef::issue(IssueId(1), RepoId(1), 1), &[]);
    handle.stop();

    assert_eq!(
        *log.lock().unwrap(),
        ["mail:new_issue:1", "index:new_issue:1", "audit:new_issue:1"]
    );
}

#[test]
fn panicking_subscriber_does_not_break_the_stream() {
    support::init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let bus = NotifyBus::new(InMemoryQueue::new())
        .with_subscriber(Arc::new(PanickingNotifier))
        .with_subscriber(Arc::new(RecordingNotifier::new("after", Arc::clone(&log))));

    let sender = bus.sender();
    let handle = bus.start();

    // The panicker only dislikes new_issue; both envelopes must reach
    // the second subscriber regardless.
    sender.new_issue(&IssueRef::issue(IssueId(1), RepoId(1), 1), &[]);
    sender.new_issue(&IssueRef::issue(IssueId(2), RepoId(1), 2), &[]);

    let stats = handle.stop();
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.subscriber_panics, 2);
    assert_eq!(
        *log.lock().unwrap(),
        ["after:new_issue:1", "after:new_issue:2"]
    );
}

#[test]
fn garbled_envelope_is_dropped_and_the_next_one_delivered() {
    support::init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let queue = InMemoryQueue::new();
    // Clones share the underlying queue; keep one to inject raw
    // envelopes behind the sender's back.
    let back_door = queue.clone();

    let bus = NotifyBus::new(queue)
        .with_subscriber(Arc::new(RecordingNotifier::new("sub", Arc::clone(&log))));
    let sender = bus.sender();
    let handle = bus.start();

    sender.new_issue(&IssueRef::issue(IssueId(1), RepoId(1), 1), &[]);
    back_door
        .push(Envelope::new("not_a_known_event", vec![]))
        .unwrap();
    back_door
        .push(Envelope::new("new_issue", vec![vec![0xff, 0xff]]))
        .unwrap();
    sender.new_issue(&IssueRef::issue(IssueId(2), RepoId(1), 2), &[]);

    let stats = handle.stop();
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.decode_failures, 2);
    assert_eq!(
        *log.lock().unwrap(),
        ["sub:new_issue:1", "sub:new_issue:2"]
    );
}

#[test]
fn concurrent_producers_all_get_through() {
    support::init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let bus = NotifyBus::new(InMemoryQueue::new())
        .with_workers(2)
        .with_subscriber(Arc::new(RecordingNotifier::new("sub", Arc::clone(&log))));

    let sender = bus.sender();
    let handle = bus.start();

    let mut producers = Vec::new();
    for p in 0..4 {
        let sender = sender.clone();
        producers.push(thread::spawn(move || {
            for i in 0..25 {
                let index = p * 100 + i;
                sender.new_issue(&IssueRef::issue(IssueId(index), RepoId(1), index), &[]);
            }
        }));
    }
    for producer in producers {
        producer.join().unwrap();
    }

    let stats = handle.stop();
    assert_eq!(stats.delivered, 100);
    assert_eq!(log.lock().unwrap().len(), 100);
}
