//! Lifecycle event bus for Keel.
//!
//! Dataset history mutations (creates, renames, deletes, version commits)
//! are announced on a process-wide bus. Subscribers register a filter and
//! receive matching events over a `tokio::sync::broadcast` channel. The bus
//! is fire-and-forget: publishing never blocks on slow subscribers.

pub mod bus;
pub mod event;

pub use bus::{Bus, EventFilter, EventStream};
pub use event::{EventKind, LifecycleEvent};
