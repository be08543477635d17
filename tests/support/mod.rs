//! Shared test doubles for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use forgebus::{
    IndexError, IssueId, IssueIndex, MailError, MailMessage, Mailer, Notifier, RepoId, UserId,
};

/// Install a compact tracing subscriber once per test binary so the
/// log-and-continue paths are visible under `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A subscriber that appends `label:event` markers to a shared log.
pub struct RecordingNotifier {
    pub label: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { label, log }
    }

    fn mark(&self, event: &str, detail: impl std::fmt::Display) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", self.label, event, detail));
    }
}

impl Notifier for RecordingNotifier {
    fn new_issue(&self, issue: &forgebus::IssueRef, _mentions: &[UserId]) {
        self.mark("new_issue", issue.index);
    }

    fn merge_pull_request(&self, _doer: UserId, pull: &forgebus::IssueRef) {
        self.mark("merge_pull_request", pull.index);
    }

    fn delete_repository(&self, _doer: UserId, repo: &forgebus::RepoRef) {
        self.mark("delete_repository", repo.full_name());
    }
}

/// A subscriber that panics on `new_issue` and nothing else.
pub struct PanickingNotifier;

impl Notifier for PanickingNotifier {
    fn new_issue(&self, _issue: &forgebus::IssueRef, _mentions: &[UserId]) {
        panic!("subscriber bug");
    }
}

/// Mailer that records every attempt and fails deliveries to one user.
pub struct BufferMailer {
    pub attempts: Arc<Mutex<Vec<MailMessage>>>,
    pub failing: Option<UserId>,
}

impl BufferMailer {
    pub fn new(attempts: Arc<Mutex<Vec<MailMessage>>>) -> Self {
        Self {
            attempts,
            failing: None,
        }
    }

    pub fn failing_for(mut self, user: UserId) -> Self {
        self.failing = Some(user);
        self
    }
}

impl Mailer for BufferMailer {
    fn deliver(&self, message: &MailMessage) -> Result<(), MailError> {
        self.attempts.lock().unwrap().push(message.clone());
        if self.failing == Some(message.to) {
            return Err(MailError::Transport("smtp send failed".into()));
        }
        Ok(())
    }
}

/// Issue index that records writes.
pub struct BufferIndex {
    pub indexed: Arc<Mutex<Vec<IssueId>>>,
    pub removed_repos: Arc<Mutex<Vec<RepoId>>>,
}

impl BufferIndex {
    pub fn new(indexed: Arc<Mutex<Vec<IssueId>>>) -> Self {
        Self {
            indexed,
            removed_repos: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl IssueIndex for BufferIndex {
    fn index_issue(&self, issue: IssueId) -> Result<(), IndexError> {
        self.indexed.lock().unwrap().push(issue);
        Ok(())
    }

    fn remove_repository(&self, repo: RepoId) -> Result<(), IndexError> {
        self.removed_repos.lock().unwrap().push(repo);
        Ok(())
    }
}
