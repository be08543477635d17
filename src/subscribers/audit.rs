//! Audit trail: one JSON line per administrative event.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing::info;

use crate::ids::UserId;
use crate::notifier::Notifier;
use crate::payload::{IssueRef, RefKind, ReleaseRef, RepoRef};

/// Subscriber that records repository-lifecycle, ref and release events
/// as JSON lines.
///
/// By default lines go to the `audit` log target; tests (or hosts that
/// ship the trail elsewhere) attach a shared buffer instead.
pub struct AuditNotifier {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for AuditNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditNotifier {
    pub fn new() -> Self {
        AuditNotifier { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        AuditNotifier {
            buffer: Some(buffer),
        }
    }

    fn record(&self, event: &'static str, details: Value) {
        let line = json!({ "event": event, "details": details }).to_string();
        if let Some(buffer) = &self.buffer {
            // A poisoned buffer still holds valid lines; keep appending.
            buffer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(line);
        } else {
            info!(target: "audit", "{}", line);
        }
    }
}

impl Notifier for AuditNotifier {
    fn create_repository(&self, doer: UserId, owner: UserId, repo: &RepoRef) {
        self.record(
            "create_repository",
            json!({ "doer": doer, "owner": owner, "repo": repo.full_name() }),
        );
    }

    fn delete_repository(&self, doer: UserId, repo: &RepoRef) {
        self.record(
            "delete_repository",
            json!({ "doer": doer, "repo": repo.full_name() }),
        );
    }

    fn fork_repository(&self, doer: UserId, old_repo: &RepoRef, repo: &RepoRef) {
        self.record(
            "fork_repository",
            json!({ "doer": doer, "from": old_repo.full_name(), "to": repo.full_name() }),
        );
    }

    fn rename_repository(&self, doer: UserId, repo: &RepoRef, old_name: &str) {
        self.record(
            "rename_repository",
            json!({ "doer": doer, "repo": repo.full_name(), "old_name": old_name }),
        );
    }

    fn transfer_repository(&self, doer: UserId, repo: &RepoRef, old_owner: &str) {
        self.record(
            "transfer_repository",
            json!({ "doer": doer, "repo": repo.full_name(), "old_owner": old_owner }),
        );
    }

    fn merge_pull_request(&self, doer: UserId, pull: &IssueRef) {
        self.record(
            "merge_pull_request",
            json!({ "doer": doer, "repo": pull.repo, "pull": pull.index }),
        );
    }

    fn create_ref(&self, doer: UserId, repo: &RepoRef, kind: RefKind, full_name: &str) {
        self.record(
            "create_ref",
            json!({ "doer": doer, "repo": repo.full_name(), "kind": kind.as_str(), "ref": full_name }),
        );
    }

    fn delete_ref(&self, doer: UserId, repo: &RepoRef, kind: RefKind, full_name: &str) {
        self.record(
            "delete_ref",
            json!({ "doer": doer, "repo": repo.full_name(), "kind": kind.as_str(), "ref": full_name }),
        );
    }

    fn new_release(&self, release: &ReleaseRef) {
        self.record(
            "new_release",
            json!({ "repo": release.repo, "tag": release.tag_name }),
        );
    }

    fn delete_release(&self, doer: UserId, release: &ReleaseRef) {
        self.record(
            "delete_release",
            json!({ "doer": doer, "repo": release.repo, "tag": release.tag_name }),
        );
    }
}
