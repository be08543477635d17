//! The event contract and its no-op baseline.
//!
//! `Notifier` enumerates every domain event the forge emits, one method per
//! event. Adding an event starts here; the envelope codec and the queue
//! dispatcher then cover it via [`Call`](crate::Call).
//!
//! Every method returns `()`. Events are fire-and-forget by design: a
//! return value could not be delivered back across the queue boundary, so
//! the contract forbids them outright. Subscribers log their own failures.
//!
//! Default method bodies are no-ops, so a concrete subscriber implements
//! only the events it handles and inherits silence for the rest.

use crate::ids::{CommentId, UserId};
use crate::payload::{CommitInfo, IssueRef, PushUpdate, RefKind, ReleaseRef, RepoRef, ReviewKind};

/// The event contract: every domain event the forge emits.
///
/// Implementors that handle a subset of events override just those
/// methods. The queue dispatcher implements *all* of them (each one
/// serializes and enqueues); [`NullNotifier`] implements none (all
/// defaults).
#[allow(unused_variables)]
pub trait Notifier: Send + Sync {
    /// Called once by the bus before delivery starts, for subscribers
    /// with background state to warm up. Not a domain event; never
    /// serialized or fanned out.
    fn init(&self) {}

    // -- repositories --

    fn create_repository(&self, doer: UserId, owner: UserId, repo: &RepoRef) {}

    fn delete_repository(&self, doer: UserId, repo: &RepoRef) {}

    fn fork_repository(&self, doer: UserId, old_repo: &RepoRef, repo: &RepoRef) {}

    fn rename_repository(&self, doer: UserId, repo: &RepoRef, old_name: &str) {}

    fn transfer_repository(&self, doer: UserId, repo: &RepoRef, old_owner: &str) {}

    // -- issues --

    /// A new issue was opened. `mentions` are the users called out in the
    /// issue body.
    fn new_issue(&self, issue: &IssueRef, mentions: &[UserId]) {}

    /// An issue was closed (`is_closed`) or reopened (`!is_closed`).
    fn issue_change_status(&self, doer: UserId, issue: &IssueRef, is_closed: bool) {}

    fn issue_change_title(&self, doer: UserId, issue: &IssueRef, old_title: &str) {}

    // -- comments --

    fn new_issue_comment(
        &self,
        doer: UserId,
        issue: &IssueRef,
        comment: CommentId,
        mentions: &[UserId],
    ) {
    }

    fn update_comment(&self, doer: UserId, issue: &IssueRef, comment: CommentId, old_content: &str) {
    }

    fn delete_comment(&self, doer: UserId, issue: &IssueRef, comment: CommentId) {}

    // -- pull requests --

    fn new_pull_request(&self, pull: &IssueRef, mentions: &[UserId]) {}

    fn merge_pull_request(&self, doer: UserId, pull: &IssueRef) {}

    fn pull_request_review(
        &self,
        doer: UserId,
        pull: &IssueRef,
        kind: ReviewKind,
        mentions: &[UserId],
    ) {
    }

    // -- pushes and refs --

    fn push_commits(
        &self,
        pusher: UserId,
        repo: &RepoRef,
        update: &PushUpdate,
        commits: &[CommitInfo],
    ) {
    }

    /// Like [`push_commits`](Notifier::push_commits), but the push was
    /// performed by mirror synchronization rather than a user.
    fn sync_push_commits(
        &self,
        pusher: UserId,
        repo: &RepoRef,
        update: &PushUpdate,
        commits: &[CommitInfo],
    ) {
    }

    fn create_ref(&self, doer: UserId, repo: &RepoRef, kind: RefKind, full_name: &str) {}

    fn delete_ref(&self, doer: UserId, repo: &RepoRef, kind: RefKind, full_name: &str) {}

    // -- releases --

    fn new_release(&self, release: &ReleaseRef) {}

    fn delete_release(&self, doer: UserId, release: &ReleaseRef) {}
}

/// The all-no-op baseline implementation of the contract.
///
/// Useful directly wherever a do-nothing notifier is needed (tests,
/// disabled subsystems), and as the reference point for the no-op law:
/// calling any event on it has no observable effect and cannot fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {}
