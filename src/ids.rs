//! Newtype wrappers for domain entity identifiers.
//!
//! Events carry opaque ids rather than full entity graphs so payloads stay
//! small and serializable. Subscribers re-load whatever they need from the
//! id; the referenced entity may have changed or vanished by the time an
//! envelope is delivered, and subscribers must tolerate that.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

id_type!(
    /// A repository id.
    RepoId
);
id_type!(
    /// A user id.
    UserId
);
id_type!(
    /// An issue or pull request id (pull requests share the issue table).
    IssueId
);
id_type!(
    /// An issue comment id.
    CommentId
);
id_type!(
    /// A release id.
    ReleaseId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_do_not_mix() {
        let repo = RepoId(1);
        let user = UserId(1);
        assert_eq!(repo.0, user.0);
        assert_eq!(repo, RepoId::from(1));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(IssueId(42).to_string(), "42");
    }
}
