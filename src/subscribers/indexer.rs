//! Search index maintenance driven by issue and comment events.

use std::fmt;

use tracing::error;

use crate::ids::{CommentId, IssueId, RepoId, UserId};
use crate::notifier::Notifier;
use crate::payload::{IssueRef, RepoRef};

/// Failure reported by an [`IssueIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The issue vanished between the event and its delivery.
    MissingIssue(IssueId),
    /// The index backend is unreachable or rejected the write.
    Backend(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::MissingIssue(issue) => write!(f, "issue {} not found", issue),
            IndexError::Backend(msg) => write!(f, "index backend error: {}", msg),
        }
    }
}

impl std::error::Error for IndexError {}

/// The search-index boundary: (re)index one issue, or drop a whole
/// repository's documents.
pub trait IssueIndex: Send + Sync {
    fn index_issue(&self, issue: IssueId) -> Result<(), IndexError>;

    fn remove_repository(&self, repo: RepoId) -> Result<(), IndexError>;
}

/// Subscriber that keeps the issue search index current.
///
/// Every event that can change an issue's searchable text triggers a
/// reindex of that issue; deleting a repository drops its documents.
/// Index failures are logged and swallowed — a missed update surfaces as
/// slightly stale search results, never as a broken worker.
pub struct IndexerNotifier<I> {
    index: I,
}

impl<I: IssueIndex> IndexerNotifier<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    fn reindex(&self, event: &'static str, issue: &IssueRef) {
        if let Err(err) = self.index.index_issue(issue.id) {
            error!(event = event, issue = %issue.id, error = %err, "issue reindex failed");
        }
    }
}

impl<I: IssueIndex> Notifier for IndexerNotifier<I> {
    fn new_issue(&self, issue: &IssueRef, _mentions: &[UserId]) {
        self.reindex("new_issue", issue);
    }

    fn issue_change_status(&self, _doer: UserId, issue: &IssueRef, _is_closed: bool) {
        self.reindex("issue_change_status", issue);
    }

    fn issue_change_title(&self, _doer: UserId, issue: &IssueRef, _old_title: &str) {
        self.reindex("issue_change_title", issue);
    }

    fn new_issue_comment(
        &self,
        _doer: UserId,
        issue: &IssueRef,
        _comment: CommentId,
        _mentions: &[UserId],
    ) {
        self.reindex("new_issue_comment", issue);
    }

    fn update_comment(
        &self,
        _doer: UserId,
        issue: &IssueRef,
        _comment: CommentId,
        _old_content: &str,
    ) {
        self.reindex("update_comment", issue);
    }

    fn delete_comment(&self, _doer: UserId, issue: &IssueRef, _comment: CommentId) {
        self.reindex("delete_comment", issue);
    }

    fn new_pull_request(&self, pull: &IssueRef, _mentions: &[UserId]) {
        self.reindex("new_pull_request", pull);
    }

    fn delete_repository(&self, _doer: UserId, repo: &RepoRef) {
        if let Err(err) = self.index.remove_repository(repo.id) {
            error!(
                event = "delete_repository",
                repo = %repo.id,
                error = %err,
                "failed to drop repository from index"
            );
        }
    }
}
