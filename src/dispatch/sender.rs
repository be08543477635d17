//! The sending side of the dispatcher.

use std::fmt;
use std::sync::Arc;

use tracing::error;

use crate::envelope::{Call, EncodeError};
use crate::ids::{CommentId, UserId};
use crate::notifier::Notifier;
use crate::payload::{CommitInfo, IssueRef, PushUpdate, RefKind, ReleaseRef, RepoRef, ReviewKind};
use crate::queue::{EnvelopeQueue, PushError};

/// A notify call could not reach the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    Encode(EncodeError),
    Push(PushError),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Encode(e) => write!(f, "{}", e),
            NotifyError::Push(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotifyError::Encode(e) => Some(e),
            NotifyError::Push(e) => Some(e),
        }
    }
}

/// The queue-backed sending side: implements every contract operation by
/// encoding the call into an envelope and pushing it.
///
/// Stateless beyond the shared queue handle, cheap to clone, and safe
/// for unlimited concurrent callers; a method returns as soon as the
/// push completes and never waits on subscriber work. The only thing
/// that can slow a producer down is backpressure from a bounded queue.
///
/// The contract methods are void, so a push failure there is logged at
/// error level and the event is lost. Producers that must observe the
/// failure call [`enqueue`](QueueNotifier::enqueue) directly.
pub struct QueueNotifier<Q: EnvelopeQueue> {
    queue: Arc<Q>,
}

impl<Q: EnvelopeQueue> QueueNotifier<Q> {
    pub fn new(queue: Arc<Q>) -> Self {
        Self { queue }
    }

    /// Encode and push one call. This is the fallible primitive the void
    /// contract methods delegate to.
    pub fn enqueue(&self, call: Call) -> Result<(), NotifyError> {
        let envelope = call.encode().map_err(NotifyError::Encode)?;
        self.queue.push(envelope).map_err(NotifyError::Push)
    }

    fn fire(&self, call: Call) {
        let event = call.name();
        if let Err(err) = self.enqueue(call) {
            error!(event = event, error = %err, "failed to enqueue notification, event lost");
        }
    }
}

impl<Q: EnvelopeQueue> Clone for QueueNotifier<Q> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<Q: EnvelopeQueue> Notifier for QueueNotifier<Q> {
    fn create_repository(&self, doer: UserId, owner: UserId, repo: &RepoRef) {
        self.fire(Call::CreateRepository {
            doer,
            owner,
            repo: repo.clone(),
        });
    }

    fn delete_repository(&self, doer: UserId, repo: &RepoRef) {
        self.fire(Call::DeleteRepository {
            doer,
            repo: repo.clone(),
        });
    }

    fn fork_repository(&self, doer: UserId, old_repo: &RepoRef, repo: &RepoRef) {
        self.fire(Call::ForkRepository {
            doer,
            old_repo: old_repo.clone(),
            repo: repo.clone(),
        });
    }

    fn rename_repository(&self, doer: UserId, repo: &RepoRef, old_name: &str) {
        self.fire(Call::RenameRepository {
            doer,
            repo: repo.clone(),
            old_name: old_name.to_string(),
        });
    }

    fn transfer_repository(&self, doer: UserId, repo: &RepoRef, old_owner: &str) {
        self.fire(Call::TransferRepository {
            doer,
            repo: repo.clone(),
            old_owner: old_owner.to_string(),
        });
    }

    fn new_issue(&self, issue: &IssueRef, mentions: &[UserId]) {
        self.fire(Call::NewIssue {
            issue: *issue,
            mentions: mentions.to_vec(),
        });
    }

    fn issue_change_status(&self, doer: UserId, issue: &IssueRef, is_closed: bool) {
        self.fire(Call::IssueChangeStatus {
            doer,
            issue: *issue,
            is_closed,
        });
    }

    fn issue_change_title(&self, doer: UserId, issue: &IssueRef, old_title: &str) {
        self.fire(Call::IssueChangeTitle {
            doer,
            issue: *issue,
            old_title: old_title.to_string(),
        });
    }

    fn new_issue_comment(
        &self,
        doer: UserId,
        issue: &IssueRef,
        comment: CommentId,
        mentions: &[UserId],
    ) {
        self.fire(Call::NewIssueComment {
            doer,
            issue: *issue,
            comment,
            mentions: mentions.to_vec(),
        });
    }

    fn update_comment(&self, doer: UserId, issue: &IssueRef, comment: CommentId, old_content: &str) {
        self.fire(Call::UpdateComment {
            doer,
            issue: *issue,
            comment,
            old_content: old_content.to_string(),
        });
    }

    fn delete_comment(&self, doer: UserId, issue: &IssueRef, comment: CommentId) {
        self.fire(Call::DeleteComment {
            doer,
            issue: *issue,
            comment,
        });
    }

    fn new_pull_request(&self, pull: &IssueRef, mentions: &[UserId]) {
        self.fire(Call::NewPullRequest {
            pull: *pull,
            mentions: mentions.to_vec(),
        });
    }

    fn merge_pull_request(&self, doer: UserId, pull: &IssueRef) {
        self.fire(Call::MergePullRequest { doer, pull: *pull });
    }

    fn pull_request_review(
        &self,
        doer: UserId,
        pull: &IssueRef,
        kind: ReviewKind,
        mentions: &[UserId],
    ) {
        self.fire(Call::PullRequestReview {
            doer,
            pull: *pull,
            kind,
            mentions: mentions.to_vec(),
        });
    }

    fn push_commits(
        &self,
        pusher: UserId,
        repo: &RepoRef,
        update: &PushUpdate,
        commits: &[CommitInfo],
    ) {
        self.fire(Call::PushCommits {
            pusher,
            repo: repo.clone(),
            update: update.clone(),
            commits: commits.to_vec(),
        });
    }

    fn sync_push_commits(
        &self,
        pusher: UserId,
        repo: &RepoRef,
        update: &PushUpdate,
        commits: &[CommitInfo],
    ) {
        self.fire(Call::SyncPushCommits {
            pusher,
            repo: repo.clone(),
            update: update.clone(),
            commits: commits.to_vec(),
        });
    }

    fn create_ref(&self, doer: UserId, repo: &RepoRef, kind: RefKind, full_name: &str) {
        self.fire(Call::CreateRef {
            doer,
            repo: repo.clone(),
            kind,
            full_name: full_name.to_string(),
        });
    }

    fn delete_ref(&self, doer: UserId, repo: &RepoRef, kind: RefKind, full_name: &str) {
        self.fire(Call::DeleteRef {
            doer,
            repo: repo.clone(),
            kind,
            full_name: full_name.to_string(),
        });
    }

    fn new_release(&self, release: &ReleaseRef) {
        self.fire(Call::NewRelease {
            release: release.clone(),
        });
    }

    fn delete_release(&self, doer: UserId, release: &ReleaseRef) {
        self.fire(Call::DeleteRelease {
            doer,
            release: release.clone(),
        });
    }
}
