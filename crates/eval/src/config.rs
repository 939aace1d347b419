//! Wizard configuration.
//!
//! Everything here has a sensible default; an embedding shell can
//! override individual settings with the `with_*` builders or load a
//! JSON document through [`WizardConfig::from_json_str`].

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// How a malformed condition node evaluates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedConditionPolicy {
    /// The node holds; schema-authoring mistakes never block users.
    #[default]
    Satisfied,
    /// The node fails; the parameter cannot be submitted until the
    /// schema is fixed.
    Violated,
}

/// Unit of a numeric `reservation_expiration` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationUnit {
    #[default]
    Days,
    Hours,
}

impl ExpirationUnit {
    /// `amount` units as a duration, or `None` when it does not fit.
    pub fn duration(self, amount: i64) -> Option<time::Duration> {
        let unit_seconds: i64 = match self {
            ExpirationUnit::Days => 86_400,
            ExpirationUnit::Hours => 3_600,
        };
        amount.checked_mul(unit_seconds).map(time::Duration::seconds)
    }
}

/// Settings for one wizard instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Prefix marking a node-count parameter (`num_` in `num_web_nodes`).
    pub node_count_prefix: String,
    /// Suffix marking a node-count parameter (`_nodes` in `num_web_nodes`).
    pub node_count_suffix: String,
    /// Suffix of the companion parameter selecting a role's flavor
    /// (`_flavor` in `web_flavor`).
    pub flavor_suffix: String,
    pub malformed_conditions: MalformedConditionPolicy,
    pub expiration_unit: ExpirationUnit,
}

impl Default for WizardConfig {
    fn default() -> Self {
        WizardConfig {
            node_count_prefix: "num_".to_string(),
            node_count_suffix: "_nodes".to_string(),
            flavor_suffix: "_flavor".to_string(),
            malformed_conditions: MalformedConditionPolicy::default(),
            expiration_unit: ExpirationUnit::default(),
        }
    }
}

impl WizardConfig {
    /// Parses a JSON configuration document; missing keys keep their
    /// defaults.
    pub fn from_json_str(src: &str) -> Result<Self, WizardError> {
        serde_json::from_str(src).map_err(|e| WizardError::Config(e.to_string()))
    }

    /// Set the policy for malformed condition nodes.
    pub fn with_malformed_conditions(mut self, policy: MalformedConditionPolicy) -> Self {
        self.malformed_conditions = policy;
        self
    }

    /// Set the unit of numeric reservation lengths.
    pub fn with_expiration_unit(mut self, unit: ExpirationUnit) -> Self {
        self.expiration_unit = unit;
        self
    }

    /// Set the prefix and suffix that mark node-count parameters.
    pub fn with_node_count_affixes(
        mut self,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        self.node_count_prefix = prefix.into();
        self.node_count_suffix = suffix.into();
        self
    }

    /// Set the suffix of companion flavor parameters.
    pub fn with_flavor_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.flavor_suffix = suffix.into();
        self
    }

    /// Node role of a node-count parameter, or `None` when `variable` is
    /// not one. `num_web_nodes` yields `web`.
    pub fn node_role<'a>(&self, variable: &'a str) -> Option<&'a str> {
        let role = variable
            .strip_prefix(self.node_count_prefix.as_str())?
            .strip_suffix(self.node_count_suffix.as_str())?;
        if role.is_empty() {
            None
        } else {
            Some(role)
        }
    }

    /// Companion flavor parameter of `role`.
    pub fn flavor_variable(&self, role: &str) -> String {
        format!("{}{}", role, self.flavor_suffix)
    }
}
