//! Mirror synchronization triggers.

use std::fmt;

use tracing::error;

use crate::ids::{RepoId, UserId};
use crate::notifier::Notifier;
use crate::payload::{CommitInfo, PushUpdate, RefKind, RepoRef};

/// Failure reported by a [`MirrorSyncer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The repository has no push mirrors configured (or no longer
    /// exists). Expected for most repositories; callers treat it as a
    /// quiet no-op.
    NotMirrored(RepoId),
    /// The sync scheduler itself failed.
    Backend(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::NotMirrored(repo) => write!(f, "repository {} is not mirrored", repo),
            SyncError::Backend(msg) => write!(f, "mirror sync error: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

/// The mirror boundary: request a push-mirror sync for one repository.
pub trait MirrorSyncer: Send + Sync {
    fn queue_sync(&self, repo: RepoId) -> Result<(), SyncError>;
}

/// Subscriber that schedules a push-mirror sync whenever a repository's
/// refs change.
///
/// `sync_push_commits` is deliberately not handled: those pushes are
/// produced by mirror synchronization itself, and reacting to them
/// would loop.
pub struct MirrorNotifier<S> {
    syncer: S,
}

impl<S: MirrorSyncer> MirrorNotifier<S> {
    pub fn new(syncer: S) -> Self {
        Self { syncer }
    }

    fn sync(&self, event: &'static str, repo: &RepoRef) {
        match self.syncer.queue_sync(repo.id) {
            Ok(()) => {}
            Err(SyncError::NotMirrored(_)) => {}
            Err(err) => {
                error!(event = event, repo = %repo.id, error = %err, "failed to queue mirror sync");
            }
        }
    }
}

impl<S: MirrorSyncer> Notifier for MirrorNotifier<S> {
    fn push_commits(
        &self,
        _pusher: UserId,
        repo: &RepoRef,
        _update: &PushUpdate,
        _commits: &[CommitInfo],
    ) {
        self.sync("push_commits", repo);
    }

    fn create_ref(&self, _doer: UserId, repo: &RepoRef, _kind: RefKind, _full_name: &str) {
        self.sync("create_ref", repo);
    }

    fn delete_ref(&self, _doer: UserId, repo: &RepoRef, _kind: RefKind, _full_name: &str) {
        self.sync("delete_ref", repo);
    }
}
