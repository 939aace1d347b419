//! Step gate and navigation state.
//!
//! The wizard walks a fixed sequence of steps. [`can_advance`] decides
//! whether "Next" is permitted; [`StepState`] tracks the current step
//! and the highest step reached, which bounds non-linear jumps.

use std::fmt;

use quickcluster_core::{WizardValues, KEY_PRODUCT, KEY_REGION};
use serde::{Deserialize, Serialize};

use crate::error::WizardError;
use crate::errors::ErrorSet;

/// Wizard steps in order. The numeric value is the step number shown
/// to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StepId {
    Product = 1,
    Region = 2,
    ClusterConfiguration = 3,
    AdvancedConfiguration = 4,
    Review = 5,
}

impl StepId {
    pub const FIRST: StepId = StepId::Product;
    pub const LAST: StepId = StepId::Review;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<StepId> {
        match n {
            1 => Some(StepId::Product),
            2 => Some(StepId::Region),
            3 => Some(StepId::ClusterConfiguration),
            4 => Some(StepId::AdvancedConfiguration),
            5 => Some(StepId::Review),
            _ => None,
        }
    }

    pub fn next(self) -> Option<StepId> {
        StepId::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<StepId> {
        StepId::from_number(self.number().checked_sub(1)?)
    }

    pub fn title(self) -> &'static str {
        match self {
            StepId::Product => "Product",
            StepId::Region => "Region",
            StepId::ClusterConfiguration => "Cluster Configuration",
            StepId::AdvancedConfiguration => "Advanced Option",
            StepId::Review => "Review",
        }
    }

    /// Steps whose form is validated through error tags rather than a
    /// single selection key.
    pub fn is_form_step(self) -> bool {
        matches!(
            self,
            StepId::ClusterConfiguration | StepId::AdvancedConfiguration
        )
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Why "Next" is not permitted on `step`, or `None` when it is.
///
/// - Product: a product must be selected.
/// - Region: a region must be selected.
/// - Form steps: no tag scoped to the step and no invalid-conditions tag.
/// - Review: terminal; leaving it is `finish`, never `advance`.
pub fn advance_blocker(step: StepId, values: &WizardValues, tags: &ErrorSet) -> Option<String> {
    match step {
        StepId::Product => {
            (!values.is_set(KEY_PRODUCT)).then(|| "no product selected".to_string())
        }
        StepId::Region => (!values.is_set(KEY_REGION)).then(|| "no region selected".to_string()),
        StepId::ClusterConfiguration | StepId::AdvancedConfiguration => {
            let blocking: Vec<String> = tags
                .iter()
                .filter(|t| t.blocks(step))
                .map(|t| t.to_string())
                .collect();
            (!blocking.is_empty()).then(|| format!("outstanding errors: {}", blocking.join(", ")))
        }
        StepId::Review => Some("review is the last step".to_string()),
    }
}

/// True when "Next" is permitted on `step`.
pub fn can_advance(step: StepId, values: &WizardValues, tags: &ErrorSet) -> bool {
    advance_blocker(step, values, tags).is_none()
}

/// Current step plus the highest step reached so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepState {
    pub current: StepId,
    pub highest_reached: StepId,
}

impl Default for StepState {
    fn default() -> Self {
        StepState {
            current: StepId::FIRST,
            highest_reached: StepId::FIRST,
        }
    }
}

impl StepState {
    /// Moves forward one step. The gate must have been consulted by the
    /// caller; this only rejects moving past the last step.
    pub fn advance(self) -> Result<StepState, WizardError> {
        let next = self.current.next().ok_or(WizardError::AtLastStep(self.current))?;
        Ok(StepState {
            current: next,
            highest_reached: self.highest_reached.max(next),
        })
    }

    /// Moves back one step and lowers the highest step reached by one.
    pub fn retreat(self) -> Result<StepState, WizardError> {
        let prev = self.current.prev().ok_or(WizardError::AtFirstStep)?;
        let highest = self
            .highest_reached
            .prev()
            .unwrap_or(StepId::FIRST)
            .max(prev);
        Ok(StepState {
            current: prev,
            highest_reached: highest,
        })
    }

    pub fn can_jump_to(&self, target: StepId) -> bool {
        target <= self.highest_reached
    }

    /// Moves to any step already reached.
    pub fn jump_to(self, target: StepId) -> Result<StepState, WizardError> {
        if !self.can_jump_to(target) {
            return Err(WizardError::StepNotReached {
                target,
                highest: self.highest_reached,
            });
        }
        Ok(StepState {
            current: target,
            ..self
        })
    }
}
