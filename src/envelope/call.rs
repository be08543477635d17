//! Typed counterpart of an [`Envelope`]: one variant per contract
//! operation, with the decode and invoke logic for each living next to
//! its name-table entry.
//!
//! The exhaustive `match`es in [`Call::name`], [`Call::encode`] and
//! [`Call::apply`] are what keep the wire names, the arity table and the
//! contract in sync: adding an event without covering it everywhere is a
//! compile error, not a silently missed branch.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::envelope::Envelope;
use super::error::{DecodeError, EncodeError};
use crate::ids::{CommentId, UserId};
use crate::notifier::Notifier;
use crate::payload::{CommitInfo, IssueRef, PushUpdate, RefKind, ReleaseRef, RepoRef, ReviewKind};

/// Event names as they appear on the wire.
pub mod names {
    pub const CREATE_REPOSITORY: &str = "create_repository";
    pub const DELETE_REPOSITORY: &str = "delete_repository";
    pub const FORK_REPOSITORY: &str = "fork_repository";
    pub const RENAME_REPOSITORY: &str = "rename_repository";
    pub const TRANSFER_REPOSITORY: &str = "transfer_repository";
    pub const NEW_ISSUE: &str = "new_issue";
    pub const ISSUE_CHANGE_STATUS: &str = "issue_change_status";
    pub const ISSUE_CHANGE_TITLE: &str = "issue_change_title";
    pub const NEW_ISSUE_COMMENT: &str = "new_issue_comment";
    pub const UPDATE_COMMENT: &str = "update_comment";
    pub const DELETE_COMMENT: &str = "delete_comment";
    pub const NEW_PULL_REQUEST: &str = "new_pull_request";
    pub const MERGE_PULL_REQUEST: &str = "merge_pull_request";
    pub const PULL_REQUEST_REVIEW: &str = "pull_request_review";
    pub const PUSH_COMMITS: &str = "push_commits";
    pub const SYNC_PUSH_COMMITS: &str = "sync_push_commits";
    pub const CREATE_REF: &str = "create_ref";
    pub const DELETE_REF: &str = "delete_ref";
    pub const NEW_RELEASE: &str = "new_release";
    pub const DELETE_RELEASE: &str = "delete_release";
}

/// One contract call in typed form, either about to be encoded on the
/// sending side or just decoded on the receiving side.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateRepository {
        doer: UserId,
        owner: UserId,
        repo: RepoRef,
    },
    DeleteRepository {
        doer: UserId,
        repo: RepoRef,
    },
    ForkRepository {
        doer: UserId,
        old_repo: RepoRef,
        repo: RepoRef,
    },
    RenameRepository {
        doer: UserId,
        repo: RepoRef,
        old_name: String,
    },
    TransferRepository {
        doer: UserId,
        repo: RepoRef,
        old_owner: String,
    },
    NewIssue {
        issue: IssueRef,
        mentions: Vec<UserId>,
    },
    IssueChangeStatus {
        doer: UserId,
        issue: IssueRef,
        is_closed: bool,
    },
    IssueChangeTitle {
        doer: UserId,
        issue: IssueRef,
        old_title: String,
    },
    NewIssueComment {
        doer: UserId,
        issue: IssueRef,
        comment: CommentId,
        mentions: Vec<UserId>,
    },
    UpdateComment {
        doer: UserId,
        issue: IssueRef,
        comment: CommentId,
        old_content: String,
    },
    DeleteComment {
        doer: UserId,
        issue: IssueRef,
        comment: CommentId,
    },
    NewPullRequest {
        pull: IssueRef,
        mentions: Vec<UserId>,
    },
    MergePullRequest {
        doer: UserId,
        pull: IssueRef,
    },
    PullRequestReview {
        doer: UserId,
        pull: IssueRef,
        kind: ReviewKind,
        mentions: Vec<UserId>,
    },
    PushCommits {
        pusher: UserId,
        repo: RepoRef,
        update: PushUpdate,
        commits: Vec<CommitInfo>,
    },
    SyncPushCommits {
        pusher: UserId,
        repo: RepoRef,
        update: PushUpdate,
        commits: Vec<CommitInfo>,
    },
    CreateRef {
        doer: UserId,
        repo: RepoRef,
        kind: RefKind,
        full_name: String,
    },
    DeleteRef {
        doer: UserId,
        repo: RepoRef,
        kind: RefKind,
        full_name: String,
    },
    NewRelease {
        release: ReleaseRef,
    },
    DeleteRelease {
        doer: UserId,
        release: ReleaseRef,
    },
}

fn enc<T: Serialize>(name: &'static str, index: usize, value: &T) -> Result<Vec<u8>, EncodeError> {
    bitcode::serialize(value).map_err(|e| EncodeError {
        name,
        index,
        cause: e.to_string(),
    })
}

/// Arity-checked accessor over an envelope's argument blobs.
struct Args<'a> {
    name: &'static str,
    envelope: &'a Envelope,
}

impl<'a> Args<'a> {
    fn new(name: &'static str, envelope: &'a Envelope, arity: usize) -> Result<Self, DecodeError> {
        if envelope.args.len() != arity {
            return Err(DecodeError::Arity {
                name,
                expected: arity,
                actual: envelope.args.len(),
            });
        }
        Ok(Args { name, envelope })
    }

    fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, DecodeError> {
        bitcode::deserialize(&self.envelope.args[index]).map_err(|e| DecodeError::Argument {
            name: self.name,
            index,
            cause: e.to_string(),
        })
    }
}

type DecodeFn = fn(&Envelope) -> Result<Call, DecodeError>;

/// The static `name → decoder` mapping, one entry per contract operation.
/// This table replaces dispatch-by-string-switch: each entry owns its own
/// typed decode logic, so adding an event is one localized change.
const DECODERS: &[(&str, DecodeFn)] = &[
    (names::CREATE_REPOSITORY, decode_create_repository),
    (names::DELETE_REPOSITORY, decode_delete_repository),
    (names::FORK_REPOSITORY, decode_fork_repository),
    (names::RENAME_REPOSITORY, decode_rename_repository),
    (names::TRANSFER_REPOSITORY, decode_transfer_repository),
    (names::NEW_ISSUE, decode_new_issue),
    (names::ISSUE_CHANGE_STATUS, decode_issue_change_status),
    (names::ISSUE_CHANGE_TITLE, decode_issue_change_title),
    (names::NEW_ISSUE_COMMENT, decode_new_issue_comment),
    (names::UPDATE_COMMENT, decode_update_comment),
    (names::DELETE_COMMENT, decode_delete_comment),
    (names::NEW_PULL_REQUEST, decode_new_pull_request),
    (names::MERGE_PULL_REQUEST, decode_merge_pull_request),
    (names::PULL_REQUEST_REVIEW, decode_pull_request_review),
    (names::PUSH_COMMITS, decode_push_commits),
    (names::SYNC_PUSH_COMMITS, decode_sync_push_commits),
    (names::CREATE_REF, decode_create_ref),
    (names::DELETE_REF, decode_delete_ref),
    (names::NEW_RELEASE, decode_new_release),
    (names::DELETE_RELEASE, decode_delete_release),
];

fn decode_create_repository(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::CREATE_REPOSITORY, env, 3)?;
    Ok(Call::CreateRepository {
        doer: args.get(0)?,
        owner: args.get(1)?,
        repo: args.get(2)?,
    })
}

fn decode_delete_repository(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::DELETE_REPOSITORY, env, 2)?;
    Ok(Call::DeleteRepository {
        doer: args.get(0)?,
        repo: args.get(1)?,
    })
}

fn decode_fork_repository(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::FORK_REPOSITORY, env, 3)?;
    Ok(Call::ForkRepository {
        doer: args.get(0)?,
        old_repo: args.get(1)?,
        repo: args.get(2)?,
    })
}

fn decode_rename_repository(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::RENAME_REPOSITORY, env, 3)?;
    Ok(Call::RenameRepository {
        doer: args.get(0)?,
        repo: args.get(1)?,
        old_name: args.get(2)?,
    })
}

fn decode_transfer_repository(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::TRANSFER_REPOSITORY, env, 3)?;
    Ok(Call::TransferRepository {
        doer: args.get(0)?,
        repo: args.get(1)?,
        old_owner: args.get(2)?,
    })
}

fn decode_new_issue(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::NEW_ISSUE, env, 2)?;
    Ok(Call::NewIssue {
        issue: args.get(0)?,
        mentions: args.get(1)?,
    })
}

fn decode_issue_change_status(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::ISSUE_CHANGE_STATUS, env, 3)?;
    Ok(Call::IssueChangeStatus {
        doer: args.get(0)?,
        issue: args.get(1)?,
        is_closed: args.get(2)?,
    })
}

fn decode_issue_change_title(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::ISSUE_CHANGE_TITLE, env, 3)?;
    Ok(Call::IssueChangeTitle {
        doer: args.get(0)?,
        issue: args.get(1)?,
        old_title: args.get(2)?,
    })
}

fn decode_new_issue_comment(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::NEW_ISSUE_COMMENT, env, 4)?;
    Ok(Call::NewIssueComment {
        doer: args.get(0)?,
        issue: args.get(1)?,
        comment: args.get(2)?,
        mentions: args.get(3)?,
    })
}

fn decode_update_comment(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::UPDATE_COMMENT, env, 4)?;
    Ok(Call::UpdateComment {
        doer: args.get(0)?,
        issue: args.get(1)?,
        comment: args.get(2)?,
        old_content: args.get(3)?,
    })
}

fn decode_delete_comment(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::DELETE_COMMENT, env, 3)?;
    Ok(Call::DeleteComment {
        doer: args.get(0)?,
        issue: args.get(1)?,
        comment: args.get(2)?,
    })
}

fn decode_new_pull_request(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::NEW_PULL_REQUEST, env, 2)?;
    Ok(Call::NewPullRequest {
        pull: args.get(0)?,
        mentions: args.get(1)?,
    })
}

fn decode_merge_pull_request(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::MERGE_PULL_REQUEST, env, 2)?;
    Ok(Call::MergePullRequest {
        doer: args.get(0)?,
        pull: args.get(1)?,
    })
}

fn decode_pull_request_review(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::PULL_REQUEST_REVIEW, env, 4)?;
    Ok(Call::PullRequestReview {
        doer: args.get(0)?,
        pull: args.get(1)?,
        kind: args.get(2)?,
        mentions: args.get(3)?,
    })
}

fn decode_push_commits(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::PUSH_COMMITS, env, 4)?;
    Ok(Call::PushCommits {
        pusher: args.get(0)?,
        repo: args.get(1)?,
        update: args.get(2)?,
        commits: args.get(3)?,
    })
}

fn decode_sync_push_commits(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::SYNC_PUSH_COMMITS, env, 4)?;
    Ok(Call::SyncPushCommits {
        pusher: args.get(0)?,
        repo: args.get(1)?,
        update: args.get(2)?,
        commits: args.get(3)?,
    })
}

fn decode_create_ref(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::CREATE_REF, env, 4)?;
    Ok(Call::CreateRef {
        doer: args.get(0)?,
        repo: args.get(1)?,
        kind: args.get(2)?,
        full_name: args.get(3)?,
    })
}

fn decode_delete_ref(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::DELETE_REF, env, 4)?;
    Ok(Call::DeleteRef {
        doer: args.get(0)?,
        repo: args.get(1)?,
        kind: args.get(2)?,
        full_name: args.get(3)?,
    })
}

fn decode_new_release(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::NEW_RELEASE, env, 1)?;
    Ok(Call::NewRelease {
        release: args.get(0)?,
    })
}

fn decode_delete_release(env: &Envelope) -> Result<Call, DecodeError> {
    let args = Args::new(names::DELETE_RELEASE, env, 2)?;
    Ok(Call::DeleteRelease {
        doer: args.get(0)?,
        release: args.get(1)?,
    })
}

impl Call {
    /// The wire name of this call's operation.
    pub fn name(&self) -> &'static str {
        match self {
            Call::CreateRepository { .. } => names::CREATE_REPOSITORY,
            Call::DeleteRepository { .. } => names::DELETE_REPOSITORY,
            Call::ForkRepository { .. } => names::FORK_REPOSITORY,
            Call::RenameRepository { .. } => names::RENAME_REPOSITORY,
            Call::TransferRepository { .. } => names::TRANSFER_REPOSITORY,
            Call::NewIssue { .. } => names::NEW_ISSUE,
            Call::IssueChangeStatus { .. } => names::ISSUE_CHANGE_STATUS,
            Call::IssueChangeTitle { .. } => names::ISSUE_CHANGE_TITLE,
            Call::NewIssueComment { .. } => names::NEW_ISSUE_COMMENT,
            Call::UpdateComment { .. } => names::UPDATE_COMMENT,
            Call::DeleteComment { .. } => names::DELETE_COMMENT,
            Call::NewPullRequest { .. } => names::NEW_PULL_REQUEST,
            Call::MergePullRequest { .. } => names::MERGE_PULL_REQUEST,
            Call::PullRequestReview { .. } => names::PULL_REQUEST_REVIEW,
            Call::PushCommits { .. } => names::PUSH_COMMITS,
            Call::SyncPushCommits { .. } => names::SYNC_PUSH_COMMITS,
            Call::CreateRef { .. } => names::CREATE_REF,
            Call::DeleteRef { .. } => names::DELETE_REF,
            Call::NewRelease { .. } => names::NEW_RELEASE,
            Call::DeleteRelease { .. } => names::DELETE_RELEASE,
        }
    }

    /// Serialize into the wire form: one blob per argument, in
    /// declaration order.
    pub fn encode(&self) -> Result<Envelope, EncodeError> {
        let name = self.name();
        let args = match self {
            Call::CreateRepository { doer, owner, repo } => {
                vec![enc(name, 0, doer)?, enc(name, 1, owner)?, enc(name, 2, repo)?]
            }
            Call::DeleteRepository { doer, repo } => {
                vec![enc(name, 0, doer)?, enc(name, 1, repo)?]
            }
            Call::ForkRepository {
                doer,
                old_repo,
                repo,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, old_repo)?,
                enc(name, 2, repo)?,
            ],
            Call::RenameRepository {
                doer,
                repo,
                old_name,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, repo)?,
                enc(name, 2, old_name)?,
            ],
            Call::TransferRepository {
                doer,
                repo,
                old_owner,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, repo)?,
                enc(name, 2, old_owner)?,
            ],
            Call::NewIssue { issue, mentions } => {
                vec![enc(name, 0, issue)?, enc(name, 1, mentions)?]
            }
            Call::IssueChangeStatus {
                doer,
                issue,
                is_closed,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, issue)?,
                enc(name, 2, is_closed)?,
            ],
            Call::IssueChangeTitle {
                doer,
                issue,
                old_title,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, issue)?,
                enc(name, 2, old_title)?,
            ],
            Call::NewIssueComment {
                doer,
                issue,
                comment,
                mentions,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, issue)?,
                enc(name, 2, comment)?,
                enc(name, 3, mentions)?,
            ],
            Call::UpdateComment {
                doer,
                issue,
                comment,
                old_content,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, issue)?,
                enc(name, 2, comment)?,
                enc(name, 3, old_content)?,
            ],
            Call::DeleteComment {
                doer,
                issue,
                comment,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, issue)?,
                enc(name, 2, comment)?,
            ],
            Call::NewPullRequest { pull, mentions } => {
                vec![enc(name, 0, pull)?, enc(name, 1, mentions)?]
            }
            Call::MergePullRequest { doer, pull } => {
                vec![enc(name, 0, doer)?, enc(name, 1, pull)?]
            }
            Call::PullRequestReview {
                doer,
                pull,
                kind,
                mentions,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, pull)?,
                enc(name, 2, kind)?,
                enc(name, 3, mentions)?,
            ],
            Call::PushCommits {
                pusher,
                repo,
                update,
                commits,
            } => vec![
                enc(name, 0, pusher)?,
                enc(name, 1, repo)?,
                enc(name, 2, update)?,
                enc(name, 3, commits)?,
            ],
            Call::SyncPushCommits {
                pusher,
                repo,
                update,
                commits,
            } => vec![
                enc(name, 0, pusher)?,
                enc(name, 1, repo)?,
                enc(name, 2, update)?,
                enc(name, 3, commits)?,
            ],
            Call::CreateRef {
                doer,
                repo,
                kind,
                full_name,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, repo)?,
                enc(name, 2, kind)?,
                enc(name, 3, full_name)?,
            ],
            Call::DeleteRef {
                doer,
                repo,
                kind,
                full_name,
            } => vec![
                enc(name, 0, doer)?,
                enc(name, 1, repo)?,
                enc(name, 2, kind)?,
                enc(name, 3, full_name)?,
            ],
            Call::NewRelease { release } => vec![enc(name, 0, release)?],
            Call::DeleteRelease { doer, release } => {
                vec![enc(name, 0, doer)?, enc(name, 1, release)?]
            }
        };
        Ok(Envelope::new(name, args))
    }

    /// Decode an envelope back into a typed call via the static decoder
    /// table.
    pub fn decode(envelope: &Envelope) -> Result<Call, DecodeError> {
        let decoder = DECODERS
            .iter()
            .find(|(name, _)| *name == envelope.name)
            .map(|(_, decode)| decode)
            .ok_or_else(|| DecodeError::UnknownEvent {
                name: envelope.name.clone(),
            })?;
        decoder(envelope)
    }

    /// Re-invoke this call on a notifier.
    pub fn apply(&self, notifier: &dyn Notifier) {
        match self {
            Call::CreateRepository { doer, owner, repo } => {
                notifier.create_repository(*doer, *owner, repo)
            }
            Call::DeleteRepository { doer, repo } => notifier.delete_repository(*doer, repo),
            Call::ForkRepository {
                doer,
                old_repo,
                repo,
            } => notifier.fork_repository(*doer, old_repo, repo),
            Call::RenameRepository {
                doer,
                repo,
                old_name,
            } => notifier.rename_repository(*doer, repo, old_name),
            Call::TransferRepository {
                doer,
                repo,
                old_owner,
            } => notifier.transfer_repository(*doer, repo, old_owner),
            Call::NewIssue { issue, mentions } => notifier.new_issue(issue, mentions),
            Call::IssueChangeStatus {
                doer,
                issue,
                is_closed,
            } => notifier.issue_change_status(*doer, issue, *is_closed),
            Call::IssueChangeTitle {
                doer,
                issue,
                old_title,
            } => notifier.issue_change_title(*doer, issue, old_title),
            Call::NewIssueComment {
                doer,
                issue,
                comment,
                mentions,
            } => notifier.new_issue_comment(*doer, issue, *comment, mentions),
            Call::UpdateComment {
                doer,
                issue,
                comment,
                old_content,
            } => notifier.update_comment(*doer, issue, *comment, old_content),
            Call::DeleteComment {
                doer,
                issue,
                comment,
            } => notifier.delete_comment(*doer, issue, *comment),
            Call::NewPullRequest { pull, mentions } => notifier.new_pull_request(pull, mentions),
            Call::MergePullRequest { doer, pull } => notifier.merge_pull_request(*doer, pull),
            Call::PullRequestReview {
                doer,
                pull,
                kind,
                mentions,
            } => notifier.pull_request_review(*doer, pull, *kind, mentions),
            Call::PushCommits {
                pusher,
                repo,
                update,
                commits,
            } => notifier.push_commits(*pusher, repo, update, commits),
            Call::SyncPushCommits {
                pusher,
                repo,
                update,
                commits,
            } => notifier.sync_push_commits(*pusher, repo, update, commits),
            Call::CreateRef {
                doer,
                repo,
                kind,
                full_name,
            } => notifier.create_ref(*doer, repo, *kind, full_name),
            Call::DeleteRef {
                doer,
                repo,
                kind,
                full_name,
            } => notifier.delete_ref(*doer, repo, *kind, full_name),
            Call::NewRelease { release } => notifier.new_release(release),
            Call::DeleteRelease { doer, release } => notifier.delete_release(*doer, release),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{IssueId, ReleaseId, RepoId};
    use crate::payload::ZERO_SHA;

    fn repo() -> RepoRef {
        RepoRef::new(RepoId(2), "alice", "widgets")
    }

    fn issue() -> IssueRef {
        IssueRef::issue(IssueId(3), RepoId(2), 42)
    }

    fn pull() -> IssueRef {
        IssueRef::pull(IssueId(4), RepoId(2), 43)
    }

    fn update() -> PushUpdate {
        PushUpdate {
            ref_full_name: "refs/heads/main".into(),
            old_commit_id: ZERO_SHA.into(),
            new_commit_id: "abc123".into(),
        }
    }

    fn commits() -> Vec<CommitInfo> {
        vec![CommitInfo {
            id: "abc123".into(),
            message: "initial".into(),
            author_name: "alice".into(),
            author_email: "alice@example.com".into(),
        }]
    }

    /// One sample of every variant; extend together with the enum.
    fn samples() -> Vec<Call> {
        vec![
            Call::CreateRepository {
                doer: UserId(1),
                owner: UserId(6),
                repo: repo(),
            },
            Call::DeleteRepository {
                doer: UserId(1),
                repo: repo(),
            },
            Call::ForkRepository {
                doer: UserId(1),
                old_repo: repo(),
                repo: RepoRef::new(RepoId(9), "bob", "widgets"),
            },
            Call::RenameRepository {
                doer: UserId(1),
                repo: repo(),
                old_name: "gadgets".into(),
            },
            Call::TransferRepository {
                doer: UserId(1),
                repo: repo(),
                old_owner: "bob".into(),
            },
            Call::NewIssue {
                issue: issue(),
                mentions: vec![UserId(7), UserId(9)],
            },
            Call::IssueChangeStatus {
                doer: UserId(1),
                issue: issue(),
                is_closed: true,
            },
            Call::IssueChangeTitle {
                doer: UserId(1),
                issue: issue(),
                old_title: "old".into(),
            },
            Call::NewIssueComment {
                doer: UserId(1),
                issue: issue(),
                comment: CommentId(8),
                mentions: vec![UserId(7)],
            },
            Call::UpdateComment {
                doer: UserId(1),
                issue: issue(),
                comment: CommentId(8),
                old_content: "before".into(),
            },
            Call::DeleteComment {
                doer: UserId(1),
                issue: issue(),
                comment: CommentId(8),
            },
            Call::NewPullRequest {
                pull: pull(),
                mentions: vec![],
            },
            Call::MergePullRequest {
                doer: UserId(1),
                pull: pull(),
            },
            Call::PullRequestReview {
                doer: UserId(1),
                pull: pull(),
                kind: ReviewKind::Reject,
                mentions: vec![UserId(7)],
            },
            Call::PushCommits {
                pusher: UserId(1),
                repo: repo(),
                update: update(),
                commits: commits(),
            },
            Call::SyncPushCommits {
                pusher: UserId(1),
                repo: repo(),
                update: update(),
                commits: commits(),
            },
            Call::CreateRef {
                doer: UserId(1),
                repo: repo(),
                kind: RefKind::Branch,
                full_name: "refs/heads/dev".into(),
            },
            Call::DeleteRef {
                doer: UserId(1),
                repo: repo(),
                kind: RefKind::Tag,
                full_name: "refs/tags/v0.9".into(),
            },
            Call::NewRelease {
                release: ReleaseRef {
                    id: ReleaseId(5),
                    repo: RepoId(2),
                    tag_name: "v1.0".into(),
                },
            },
            Call::DeleteRelease {
                doer: UserId(1),
                release: ReleaseRef {
                    id: ReleaseId(5),
                    repo: RepoId(2),
                    tag_name: "v1.0".into(),
                },
            },
        ]
    }

    #[test]
    fn every_call_round_trips() {
        for call in samples() {
            let envelope = call.encode().unwrap();
            assert_eq!(envelope.name, call.name());
            let back = Call::decode(&envelope).unwrap();
            assert_eq!(back, call, "round trip changed {}", call.name());
        }
    }

    #[test]
    fn decoder_table_covers_every_sample() {
        // Guards against a variant whose name is missing from DECODERS.
        for call in samples() {
            assert!(
                DECODERS.iter().any(|(name, _)| *name == call.name()),
                "no decoder registered for {}",
                call.name()
            );
        }
        assert_eq!(DECODERS.len(), samples().len());
    }

    #[test]
    fn unknown_event_is_rejected() {
        let envelope = Envelope::new("set_repository_on_fire", vec![]);
        let err = Call::decode(&envelope).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownEvent {
                name: "set_repository_on_fire".into()
            }
        );
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let encoded = Call::NewIssue {
            issue: issue(),
            mentions: vec![],
        }
        .encode()
        .unwrap();

        let mut truncated = encoded.clone();
        truncated.args.pop();
        assert_eq!(
            Call::decode(&truncated).unwrap_err(),
            DecodeError::Arity {
                name: names::NEW_ISSUE,
                expected: 2,
                actual: 1,
            }
        );

        let mut oversized = encoded;
        oversized.args.push(vec![0]);
        assert_eq!(
            Call::decode(&oversized).unwrap_err(),
            DecodeError::Arity {
                name: names::NEW_ISSUE,
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn garbled_argument_reports_index() {
        let mut envelope = Call::NewIssue {
            issue: issue(),
            mentions: vec![UserId(7)],
        }
        .encode()
        .unwrap();
        envelope.args[1] = vec![0xff, 0x00, 0xff];
        match Call::decode(&envelope) {
            Err(DecodeError::Argument { name, index, .. }) => {
                assert_eq!(name, names::NEW_ISSUE);
                assert_eq!(index, 1);
            }
            other => panic!("expected argument decode failure, got {:?}", other),
        }
    }

    #[test]
    fn apply_reinvokes_the_matching_operation() {
        use std::sync::Mutex;

        #[derive(Default)]
        struct Spy {
            seen: Mutex<Vec<String>>,
        }

        impl Notifier for Spy {
            fn new_issue(&self, issue: &IssueRef, mentions: &[UserId]) {
                self.seen
                    .lock()
                    .unwrap()
                    .push(format!("new_issue #{} mentions={}", issue.index, mentions.len()));
            }
        }

        let spy = Spy::default();
        Call::NewIssue {
            issue: issue(),
            mentions: vec![UserId(7), UserId(9)],
        }
        .apply(&spy);
        assert_eq!(
            spy.seen.lock().unwrap().as_slice(),
            ["new_issue #42 mentions=2"]
        );
    }
}
