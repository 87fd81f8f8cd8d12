//! Domain models for the goal tracker.
//!
//! - [`Goal`]: The only persisted entity, a short- or long-term objective.
//! - [`GoalForm`]: Raw form submission, turned into a [`GoalInput`] by validation.
//! - [`ValidationErrors`]: Per-field messages shown when a submission is rejected.

mod form;
mod goal;

pub use form::*;
pub use goal::*;
