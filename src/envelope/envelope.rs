//! The serialized wire form of one event call.

use serde::{Deserialize, Serialize};

/// One event call on the wire: the operation name plus one opaque binary
/// blob per argument, in declaration order.
///
/// An envelope is immutable once built. Its `args.len()` always equals
/// the arity of the operation it names at encode time; decoding verifies
/// this before touching any blob. The struct itself derives serde so a
/// durable queue backend can persist envelopes in whatever format it
/// likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    pub args: Vec<Vec<u8>>,
}

impl Envelope {
    pub fn new(name: impl Into<String>, args: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Number of argument blobs carried.
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_through_serde() {
        let envelope = Envelope::new("new_issue", vec![vec![1, 2, 3], vec![]]);
        let bytes = bitcode::serialize(&envelope).unwrap();
        let back: Envelope = bitcode::deserialize(&bytes).unwrap();
        assert_eq!(back, envelope);
        assert_eq!(back.arity(), 2);
    }
}
