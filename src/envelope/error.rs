use std::fmt;

/// An argument could not be serialized while building an envelope.
///
/// The contract's parameter types are plain serializable data, so in
/// practice this is unreachable; it is still propagated rather than
/// panicked so a misbehaving codec degrades to a lost event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError {
    pub name: &'static str,
    pub index: usize,
    pub cause: String,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to encode argument {} of {}: {}",
            self.index, self.name, self.cause
        )
    }
}

impl std::error::Error for EncodeError {}

/// An envelope could not be turned back into a typed call.
///
/// All variants mean the same thing to the worker loop: log, drop the
/// envelope, continue with the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The envelope names an operation this binary does not know — a
    /// consumer older than its producer after a deploy that added events.
    UnknownEvent { name: String },
    /// The envelope carries the wrong number of argument blobs for the
    /// operation it names.
    Arity {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    /// One argument blob failed to parse into its expected type. One bad
    /// argument makes the whole call uninvokable, so the envelope is
    /// dropped.
    Argument {
        name: &'static str,
        index: usize,
        cause: String,
    },
}

impl DecodeError {
    /// The event name the failing envelope carried.
    pub fn event_name(&self) -> &str {
        match self {
            DecodeError::UnknownEvent { name } => name,
            DecodeError::Arity { name, .. } => name,
            DecodeError::Argument { name, .. } => name,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownEvent { name } => {
                write!(f, "unknown event {:?}", name)
            }
            DecodeError::Arity {
                name,
                expected,
                actual,
            } => write!(
                f,
                "event {} expects {} arguments, envelope carries {}",
                name, expected, actual
            ),
            DecodeError::Argument { name, index, cause } => {
                write!(
                    f,
                    "failed to decode argument {} of {}: {}",
                    index, name, cause
                )
            }
        }
    }
}

impl std::error::Error for DecodeError {}
