//! Errors returned by wizard transitions.
//!
//! Validation and quota problems are not errors in this sense: they are
//! recorded as tags and messages in the session (see [`crate::errors`])
//! and only block navigation. A `WizardError` means the caller asked
//! for a transition the current state does not permit.

use crate::gate::StepId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// `advance` was requested while the gate for the step is closed.
    #[error("cannot leave step {step}: {reason}")]
    AdvanceBlocked { step: StepId, reason: String },
    /// `retreat` was requested on the first step.
    #[error("already at the first step")]
    AtFirstStep,
    /// `advance` was requested on the terminal step; use `finish`.
    #[error("step {0} is terminal; finish the wizard instead")]
    AtLastStep(StepId),
    /// Jump target has not been reached yet.
    #[error("step {target} has not been reached (highest reached: {highest})")]
    StepNotReached { target: StepId, highest: StepId },
    /// A submission contained a key the step does not own.
    #[error("step {step} does not own parameter '{key}'")]
    UnownedKey { step: StepId, key: String },
    /// A submission needs the product to be chosen first.
    #[error("no product selected")]
    NoProductSelected,
    /// The selected product id is not in the catalog.
    #[error("unknown product {0}")]
    UnknownProduct(u64),
    /// `finish` was requested with outstanding error tags.
    #[error("cannot finish with {count} outstanding error(s)")]
    FinishBlocked { count: usize },
    /// `finish` was requested away from the review step.
    #[error("finish is only possible from the review step (current: {0})")]
    NotOnReview(StepId),
    /// A value needed for the cluster request is missing or unusable.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    /// Configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
