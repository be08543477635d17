//! Mention mail: one message per user called out by an event.

use std::fmt;

use tracing::error;

use crate::ids::{CommentId, UserId};
use crate::notifier::Notifier;
use crate::payload::{IssueRef, ReviewKind};

/// An outbound notification message, already composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: UserId,
    pub subject: String,
}

/// Delivery failure reported by a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    /// The recipient no longer exists or cannot receive mail. Events
    /// outlive the entities they reference; this is an expected case,
    /// not a bug.
    UnknownRecipient(UserId),
    /// The underlying transport failed.
    Transport(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::UnknownRecipient(user) => write!(f, "unknown recipient {}", user),
            MailError::Transport(msg) => write!(f, "mail transport error: {}", msg),
        }
    }
}

impl std::error::Error for MailError {}

/// The delivery boundary. The bus composes messages; how they leave the
/// process (SMTP pool, sendmail, a test buffer) is the implementor's
/// business.
pub trait Mailer: Send + Sync {
    fn deliver(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Subscriber that mails mentioned users about issue, comment, pull
/// request and review events.
///
/// A failed delivery is logged and the remaining recipients of the same
/// event are still attempted; nothing propagates.
pub struct MailNotifier<M> {
    mailer: M,
}

impl<M: Mailer> MailNotifier<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    fn mail_each(&self, event: &'static str, mentions: &[UserId], subject: String) {
        for &to in mentions {
            let message = MailMessage {
                to,
                subject: subject.clone(),
            };
            if let Err(err) = self.mailer.deliver(&message) {
                error!(event = event, user = %to, error = %err, "mention mail failed");
            }
        }
    }
}

impl<M: Mailer> Notifier for MailNotifier<M> {
    fn new_issue(&self, issue: &IssueRef, mentions: &[UserId]) {
        self.mail_each(
            "new_issue",
            mentions,
            format!("[repo {}] Issue #{} was opened", issue.repo, issue.index),
        );
    }

    fn new_issue_comment(
        &self,
        _doer: UserId,
        issue: &IssueRef,
        _comment: CommentId,
        mentions: &[UserId],
    ) {
        self.mail_each(
            "new_issue_comment",
            mentions,
            format!("[repo {}] New comment on issue #{}", issue.repo, issue.index),
        );
    }

    fn new_pull_request(&self, pull: &IssueRef, mentions: &[UserId]) {
        self.mail_each(
            "new_pull_request",
            mentions,
            format!("[repo {}] Pull request #{} was opened", pull.repo, pull.index),
        );
    }

    fn pull_request_review(
        &self,
        _doer: UserId,
        pull: &IssueRef,
        kind: ReviewKind,
        mentions: &[UserId],
    ) {
        self.mail_each(
            "pull_request_review",
            mentions,
            format!(
                "[repo {}] Review on pull request #{}: {}",
                pull.repo,
                pull.index,
                kind.as_str()
            ),
        );
    }
}
