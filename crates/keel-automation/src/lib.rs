//! Workflow automation primitives for Keel.
//!
//! Workflows keep datasets up to date by re-running on a schedule or when
//! an upstream dataset changes. This crate defines the [`Source`] boundary
//! the orchestration layer consumes and the resolution-backed helpers
//! trigger evaluation uses; it deliberately knows nothing about executing
//! workflow bodies.

pub mod source;
pub mod trigger;
pub mod version;

pub use source::{Source, Workflow};
pub use trigger::{Trigger, TriggerKind};
pub use version::{latest_version, AutomationError, AutomationResult};
