//! The queue-backed fan-out dispatcher.
//!
//! ```text
//! producer thread                     worker thread(s)
//! ───────────────                     ────────────────
//! sender.new_issue(..)                loop {
//!   └─ Call → Envelope → queue.push     queue.poll → Envelope → Call
//!                                        └─ for s in subscribers:
//!                                             call.apply(s)
//!                                      }
//! ```
//!
//! The sending side never waits on subscriber work; the receiving side
//! never lets one bad envelope or one bad subscriber stop the loop.

mod bus;
mod sender;
mod worker;

pub use bus::{BusHandle, DeliveryStats, NotifyBus};
pub use sender::{NotifyError, QueueNotifier};
pub use worker::{DeliveryWorker, WorkerStats};
