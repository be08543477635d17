//! Queue abstraction and the in-process implementation.
//!
//! The bus owns its queue handle by constructor injection (never a
//! process-wide global), so tests and single-binary deployments use
//! [`InMemoryQueue`] while production can bring a durable backend that
//! implements [`EnvelopeQueue`].

mod in_memory;
mod queue;

pub use in_memory::InMemoryQueue;
pub use queue::{EnvelopeQueue, PushError};
