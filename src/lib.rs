//! Queue-backed event notification bus for a self-hosted git forge.
//!
//! Producers fire void, fire-and-forget domain events at a [`Notifier`]
//! handle; the bus serializes each call into an [`Envelope`], pushes it
//! onto an [`EnvelopeQueue`], and delivery workers decode envelopes and
//! re-invoke the event on every registered subscriber in registration
//! order. Producers never learn which subscribers exist or how slow they
//! are.

mod dispatch;
mod envelope;
mod ids;
mod notifier;
mod payload;
mod queue;
mod subscribers;

pub use dispatch::{
    BusHandle, DeliveryStats, DeliveryWorker, NotifyBus, NotifyError, QueueNotifier, WorkerStats,
};
pub use envelope::{names, Call, DecodeError, EncodeError, Envelope};
pub use ids::{CommentId, IssueId, ReleaseId, RepoId, UserId};
pub use notifier::{Notifier, NullNotifier};
pub use payload::{
    CommitInfo, IssueRef, PushUpdate, RefKind, ReleaseRef, RepoRef, ReviewKind, ZERO_SHA,
};
pub use queue::{EnvelopeQueue, InMemoryQueue, PushError};
pub use subscribers::{
    AuditNotifier, IndexError, IndexerNotifier, IssueIndex, MailError, MailMessage, MailNotifier,
    Mailer, MirrorNotifier, MirrorSyncer, SyncError,
};
