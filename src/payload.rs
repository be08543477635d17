//! Event payload types.
//!
//! These are the parameter shapes of the event contract: lightweight,
//! serializable references to domain entities plus the few value fields an
//! event needs. No live handles, no object graphs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{IssueId, ReleaseId, RepoId};

/// The all-zero commit id git uses on either side of a ref creation or
/// deletion.
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// A repository reference with enough naming context for subscribers that
/// render messages (mail subjects, audit records).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub id: RepoId,
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(id: RepoId, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`, the form used in log and audit output.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An issue or pull request reference.
///
/// `index` is the repository-scoped number users see (`#42`); `id` is the
/// global row id. Pull requests share the issue table, so `is_pull`
/// distinguishes the two where an event applies to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub id: IssueId,
    pub repo: RepoId,
    pub index: i64,
    pub is_pull: bool,
}

impl IssueRef {
    pub fn issue(id: IssueId, repo: RepoId, index: i64) -> Self {
        Self {
            id,
            repo,
            index,
            is_pull: false,
        }
    }

    pub fn pull(id: IssueId, repo: RepoId, index: i64) -> Self {
        Self {
            id,
            repo,
            index,
            is_pull: true,
        }
    }
}

/// A release reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRef {
    pub id: ReleaseId,
    pub repo: RepoId,
    pub tag_name: String,
}

/// The ref-level half of a push: which ref moved, from where, to where.
///
/// A push that creates the ref carries [`ZERO_SHA`] as `old_commit_id`; a
/// push that deletes it carries [`ZERO_SHA`] as `new_commit_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushUpdate {
    pub ref_full_name: String,
    pub old_commit_id: String,
    pub new_commit_id: String,
}

impl PushUpdate {
    pub fn is_new_ref(&self) -> bool {
        self.old_commit_id == ZERO_SHA
    }

    pub fn is_del_ref(&self) -> bool {
        self.new_commit_id == ZERO_SHA
    }
}

/// One commit in a push, trimmed to what subscribers render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
}

impl CommitInfo {
    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// The kind of git ref a ref event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefKind {
    Branch,
    Tag,
}

impl RefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Branch => "branch",
            RefKind::Tag => "tag",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome a pull request review carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewKind {
    Approve,
    Comment,
    Reject,
}

impl ReviewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewKind::Approve => "approved",
            ReviewKind::Comment => "commented",
            ReviewKind::Reject => "requested changes",
        }
    }
}
