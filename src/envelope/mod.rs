//! Envelope codec - the wire form of event calls.
//!
//! The sending side turns a typed call into an [`Envelope`] (operation
//! name + one binary blob per argument); the receiving side turns an
//! envelope back into a [`Call`] and re-invokes it. Both directions live
//! in [`Call`] so the name table, the arity table and the contract cannot
//! drift apart.

mod call;
mod envelope;
mod error;

pub use call::{names, Call};
pub use envelope::Envelope;
pub use error::{DecodeError, EncodeError};
