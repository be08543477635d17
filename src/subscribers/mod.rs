//! Sample subscribers.
//!
//! Each one embeds the contract's no-op defaults and overrides only the
//! events it handles. Side effects go through an injected collaborator
//! trait so tests can substitute recorders and failures; a failing
//! collaborator is always logged and swallowed, never propagated.

mod audit;
mod indexer;
mod mail;
mod mirror;

pub use audit::AuditNotifier;
pub use indexer::{IndexError, IndexerNotifier, IssueIndex};
pub use mail::{MailError, MailMessage, MailNotifier, Mailer};
pub use mirror::{MirrorNotifier, MirrorSyncer, SyncError};
