//! Error aggregation: a set of blocking tags plus a log of messages.
//!
//! The two structures are independent. Gating consults only the
//! [`ErrorSet`]; the [`ErrorLog`] is what the UI shell displays. Both are
//! plain values: every operation consumes `self` and returns the
//! updated value.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gate::StepId;

/// Kind of blocking condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    /// Projected usage exceeds the region quota.
    Quota,
    /// A parameter condition does not hold.
    InvalidConditions,
    /// A required parameter has neither a value nor a default.
    MissingRequired,
}

/// A blocking condition, optionally scoped to one step.
///
/// Unscoped tags block every form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorTag {
    pub step: Option<StepId>,
    pub category: ErrorCategory,
}

impl ErrorTag {
    pub fn scoped(step: StepId, category: ErrorCategory) -> Self {
        ErrorTag {
            step: Some(step),
            category,
        }
    }

    /// Quota violations belong to the cluster-configuration step.
    pub fn quota() -> Self {
        ErrorTag::scoped(StepId::ClusterConfiguration, ErrorCategory::Quota)
    }

    pub fn invalid_conditions() -> Self {
        ErrorTag {
            step: None,
            category: ErrorCategory::InvalidConditions,
        }
    }

    pub fn missing_required(step: StepId) -> Self {
        ErrorTag::scoped(step, ErrorCategory::MissingRequired)
    }

    /// True when this tag prevents leaving `step`.
    pub fn blocks(&self, step: StepId) -> bool {
        match self.step {
            Some(s) => s == step,
            None => true,
        }
    }
}

impl fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = match self.category {
            ErrorCategory::Quota => "quota",
            ErrorCategory::InvalidConditions => "invalid-conditions",
            ErrorCategory::MissingRequired => "missing-required",
        };
        match self.step {
            Some(step) => write!(f, "step-{}-{}", step.number(), category),
            None => f.write_str(category),
        }
    }
}

/// Set of outstanding blocking tags. Adding is idempotent; removing an
/// absent tag is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSet(BTreeSet<ErrorTag>);

impl ErrorSet {
    pub fn new() -> Self {
        ErrorSet(BTreeSet::new())
    }

    pub fn add(mut self, tag: ErrorTag) -> Self {
        if self.0.insert(tag) {
            tracing::debug!(%tag, "error tag added");
        }
        self
    }

    pub fn remove(mut self, tag: ErrorTag) -> Self {
        if self.0.remove(&tag) {
            tracing::debug!(%tag, "error tag removed");
        }
        self
    }

    /// Adds or removes `tag` depending on `present`.
    pub fn set(self, tag: ErrorTag, present: bool) -> Self {
        if present {
            self.add(tag)
        } else {
            self.remove(tag)
        }
    }

    pub fn contains(&self, tag: &ErrorTag) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A user-facing error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorPayload {
    Text { message: String },
    Detailed { title: String, lines: Vec<String> },
}

impl ErrorPayload {
    pub fn text(message: impl Into<String>) -> Self {
        ErrorPayload::Text {
            message: message.into(),
        }
    }

    /// Title plus one line per line of `body`.
    pub fn detailed(title: impl Into<String>, body: &str) -> Self {
        ErrorPayload::Detailed {
            title: title.into(),
            lines: body.lines().map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPayload::Text { message } => f.write_str(message),
            ErrorPayload::Detailed { title, lines } => {
                f.write_str(title)?;
                for line in lines {
                    write!(f, "\n{}", line)?;
                }
                Ok(())
            }
        }
    }
}

/// Ordered messages for display. Messages are never removed one by
/// one; the log is cleared as a whole when a step is entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLog(Vec<ErrorPayload>);

impl ErrorLog {
    pub fn new() -> Self {
        ErrorLog(Vec::new())
    }

    pub fn append(mut self, payload: ErrorPayload) -> Self {
        self.0.push(payload);
        self
    }

    pub fn clear(mut self) -> Self {
        self.0.clear();
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorPayload> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&ErrorPayload> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
