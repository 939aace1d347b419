//! QuickCluster wizard engine -- accumulates step values, evaluates
//! parameter conditions, projects resource usage against region quota,
//! and gates navigation between steps.
//!
//! The engine is a library driven by a UI shell. It performs no I/O:
//! product catalogs and region data are fed in as decoded values, and
//! the finished request is handed to a [`SubmissionSink`].
//!
//! Typical flow:
//! 1. [`WizardSession::new`] with a [`WizardConfig`]
//! 2. feed collaborator data with `with_products` / `with_region`
//!    whenever it arrives
//! 3. per step: `submit` the step's values, then `advance`
//! 4. on the review step: `finish`

pub mod condition;
pub mod config;
pub mod error;
pub mod errors;
pub mod gate;
pub mod numeric;
pub mod projection;
pub mod quota;
pub mod session;
pub mod sink;
pub mod store;

pub use condition::{eval_condition, evaluate, failed_conditions, FailedCondition};
pub use config::{ExpirationUnit, MalformedConditionPolicy, WizardConfig};
pub use error::WizardError;
pub use errors::{ErrorCategory, ErrorLog, ErrorPayload, ErrorSet, ErrorTag};
pub use gate::{advance_blocker, can_advance, StepId, StepState};
pub use projection::{project, project_detailed, NodeContribution, Projection, Unresolved};
pub use quota::{exceeded, QuotaExceeded, QuotaViolation};
pub use session::{FinishRejected, WizardSession, INVALID_CONDITION_TITLE};
pub use sink::{FnSink, SubmissionSink};
pub use store::merge;
