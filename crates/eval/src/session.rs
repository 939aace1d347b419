//! The wizard session: one value holding all per-wizard state.
//!
//! Every transition consumes the session and returns the updated one.
//! There is no ambient state; the UI shell keeps the latest session
//! and feeds it back into the next transition.
//!
//! Reactive rule: whenever the values, the product catalog or the
//! selected region's quota/usage change, the usage projection and the
//! quota comparison are recomputed from scratch. Collaborator data may
//! arrive at any time, including after the user has moved past the
//! configuration step.

use std::collections::BTreeMap;

use quickcluster_core::{
    is_reserved_key, ParameterSchema, Product, ProductCatalog, RegionQuota, Value, WizardValues,
    KEY_EXPIRATION, KEY_NAME, KEY_PRODUCT, KEY_REGION,
};
use quickcluster_interchange::ClusterRequest;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::condition::{failed_conditions, FailedCondition};
use crate::config::WizardConfig;
use crate::error::WizardError;
use crate::errors::{ErrorLog, ErrorPayload, ErrorSet, ErrorTag};
use crate::gate::{advance_blocker, StepId, StepState};
use crate::projection::{project_detailed, Projection};
use crate::quota::{exceeded, QuotaExceeded};
use crate::sink::SubmissionSink;
use crate::store::merge;

/// Title of the message shown for each failed parameter condition.
pub const INVALID_CONDITION_TITLE: &str =
    "Invalid parameter input detected in the previous step(s)";

const FORM_STEPS: [StepId; 2] = [StepId::ClusterConfiguration, StepId::AdvancedConfiguration];

/// A rejected `finish`. The session is handed back unchanged.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct FinishRejected {
    pub session: Box<WizardSession>,
    pub error: WizardError,
}

/// All state of one wizard instance.
#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    config: WizardConfig,
    products: ProductCatalog,
    regions: BTreeMap<u64, RegionQuota>,
    values: WizardValues,
    errors: ErrorSet,
    log: ErrorLog,
    steps: StepState,
    projection: Option<Projection>,
    quota_error: Option<QuotaExceeded>,
}

impl WizardSession {
    pub fn new(config: WizardConfig) -> Self {
        WizardSession {
            config,
            ..WizardSession::default()
        }
    }

    // ── Collaborator data ───────────────────────────────────────────

    /// Installs (or replaces) the product catalog.
    pub fn with_products(mut self, products: ProductCatalog) -> Self {
        tracing::debug!(count = products.0.len(), "product catalog loaded");
        self.products = products;
        self.recompute()
    }

    /// Installs (or replaces) quota and usage data for one region.
    pub fn with_region(mut self, region_id: u64, region: RegionQuota) -> Self {
        tracing::debug!(region_id, "region quota loaded");
        self.regions.insert(region_id, region);
        self.recompute()
    }

    // ── Form submission ─────────────────────────────────────────────

    /// Merges the values submitted by `step`.
    ///
    /// Every key must be owned by the step. For form steps, conditions
    /// of the selected product are re-evaluated against the merged
    /// values and required parameters are checked; the outcome drives
    /// the corresponding error tags. The projection is recomputed.
    pub fn submit(mut self, step: StepId, incoming: WizardValues) -> Result<Self, WizardError> {
        for key in incoming.keys() {
            if !self.owns(step, key)? {
                return Err(WizardError::UnownedKey {
                    step,
                    key: key.to_string(),
                });
            }
        }
        if let Some(raw) = incoming.get(KEY_PRODUCT) {
            let id = id_value(KEY_PRODUCT, raw)?;
            if self.products.get(id).is_none() {
                return Err(WizardError::UnknownProduct(id));
            }
            if self.values.get(KEY_PRODUCT).and_then(Value::as_u64) != Some(id) {
                self = self.forget_form_checks();
            }
        }
        if let Some(raw) = incoming.get(KEY_REGION) {
            id_value(KEY_REGION, raw)?;
        }

        tracing::debug!(%step, keys = incoming.len(), "step submitted");
        self.values = merge(&self.values, &incoming);

        if step.is_form_step() {
            self = self.validate_conditions().check_required(step);
        }
        Ok(self.recompute())
    }

    /// Evaluates every answered parameter condition. Any failure sets
    /// the invalid-conditions tag and logs one message per failure; no
    /// failure clears it.
    fn validate_conditions(mut self) -> Self {
        let failed = self.failed_conditions();
        for failure in &failed {
            tracing::info!(variable = %failure.variable, "parameter condition failed");
            self.log = self
                .log
                .append(ErrorPayload::detailed(INVALID_CONDITION_TITLE, &failure.message));
        }
        self.errors = self
            .errors
            .set(ErrorTag::invalid_conditions(), !failed.is_empty());
        self
    }

    /// Required parameters of `step` that have neither a value nor a
    /// default set the step's missing-required tag.
    fn check_required(mut self, step: StepId) -> Self {
        let missing = self.missing_required(step);
        if !missing.is_empty() {
            self.log = self.log.append(ErrorPayload::text(format!(
                "Missing required parameter(s): {}",
                missing.join(", ")
            )));
        }
        self.errors = self
            .errors
            .set(ErrorTag::missing_required(step), !missing.is_empty());
        self
    }

    fn failed_conditions(&self) -> Vec<FailedCondition> {
        match self.selected_product() {
            Some(product) => {
                failed_conditions(product, &self.values, self.config.malformed_conditions)
            }
            None => Vec::new(),
        }
    }

    fn missing_required(&self, step: StepId) -> Vec<String> {
        self.parameters_for(step)
            .into_iter()
            .filter(|p| p.required && p.default.is_none() && !self.values.is_set(&p.variable))
            .map(|p| p.name.clone())
            .collect()
    }

    /// The error set with the condition and required-parameter checks
    /// of both form steps re-run against the current values.
    fn checked_errors(&self) -> ErrorSet {
        let mut errors = self.errors.clone().set(
            ErrorTag::invalid_conditions(),
            !self.failed_conditions().is_empty(),
        );
        for step in FORM_STEPS {
            errors = errors.set(
                ErrorTag::missing_required(step),
                !self.missing_required(step).is_empty(),
            );
        }
        errors
    }

    /// Clears tags raised by the form steps of a previously selected
    /// product.
    fn forget_form_checks(mut self) -> Self {
        self.errors = self.errors.remove(ErrorTag::invalid_conditions());
        for step in FORM_STEPS {
            self.errors = self.errors.remove(ErrorTag::missing_required(step));
        }
        self
    }

    // ── Projection ──────────────────────────────────────────────────

    /// Recomputes the projection and the quota comparison. The quota tag
    /// is set or cleared as a whole; a message is logged whenever the
    /// set of violations changes to a new non-empty one.
    pub fn recompute(mut self) -> Self {
        let inputs = self
            .selected_product()
            .zip(self.selected_region_quota())
            .map(|(product, region)| {
                (
                    project_detailed(product, region.usage_baseline, &self.values, &self.config),
                    region.quota,
                )
            });

        let Some((projection, limit)) = inputs else {
            self.projection = None;
            self.quota_error = None;
            self.errors = self.errors.remove(ErrorTag::quota());
            return self;
        };

        let violation = exceeded(&projection.total, &limit);
        if let Some(err) = &violation {
            if self.quota_error.as_ref() != Some(err) {
                tracing::info!(%err, "projected usage exceeds quota");
                self.log = self.log.append(ErrorPayload::text(err.to_string()));
            }
        }
        self.errors = self.errors.set(ErrorTag::quota(), violation.is_some());
        self.quota_error = violation;
        self.projection = Some(projection);
        self
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Moves to the next step if the gate for the current step is open.
    /// Leaving a form step re-runs its checks against the stored values.
    pub fn advance(mut self) -> Result<Self, WizardError> {
        let step = self.steps.current;
        if step.is_form_step() {
            self = self.validate_conditions().check_required(step);
        }
        if let Some(reason) = advance_blocker(step, &self.values, &self.errors) {
            return Err(WizardError::AdvanceBlocked { step, reason });
        }
        self.steps = self.steps.advance()?;
        Ok(self.enter())
    }

    /// Moves back one step. The highest step reached drops by one and
    /// the invalid-conditions tag is cleared.
    pub fn retreat(mut self) -> Result<Self, WizardError> {
        self.steps = self.steps.retreat()?;
        self.errors = self.errors.remove(ErrorTag::invalid_conditions());
        Ok(self.enter())
    }

    /// Moves to any step already reached.
    pub fn jump_to(mut self, target: StepId) -> Result<Self, WizardError> {
        self.steps = self.steps.jump_to(target)?;
        Ok(self.enter())
    }

    /// Entering a step clears the message log. An outstanding quota
    /// violation is shown again on the steps it concerns.
    fn enter(mut self) -> Self {
        tracing::debug!(step = %self.steps.current, highest = %self.steps.highest_reached, "entered step");
        self.log = self.log.clear();
        if matches!(
            self.steps.current,
            StepId::ClusterConfiguration | StepId::Review
        ) {
            if let Some(err) = &self.quota_error {
                self.log = self.log.append(ErrorPayload::text(err.to_string()));
            }
        }
        self
    }

    // ── Finish ──────────────────────────────────────────────────────

    /// Builds the cluster request from the current state.
    ///
    /// Requires the review step, an empty error set once the form checks
    /// are re-run, and usable values for the four reserved keys. A numeric expiration is a length
    /// counted from `now` in the configured unit; a text expiration must
    /// be an RFC 3339 timestamp.
    pub fn build_request(&self, now: OffsetDateTime) -> Result<ClusterRequest, WizardError> {
        if self.steps.current != StepId::Review {
            return Err(WizardError::NotOnReview(self.steps.current));
        }
        let errors = self.checked_errors();
        if !errors.is_empty() {
            return Err(WizardError::FinishBlocked {
                count: errors.len(),
            });
        }

        let name = match self.values.get(KEY_NAME) {
            Some(Value::Text(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err(invalid(KEY_NAME, "a non-empty name is required")),
        };
        let region_id = id_value(KEY_REGION, self.required(KEY_REGION)?)?;
        let product_id = id_value(KEY_PRODUCT, self.required(KEY_PRODUCT)?)?;
        let expiration = self.expiration(now)?;

        Ok(ClusterRequest::new(
            name,
            region_id,
            product_id,
            expiration,
            &self.values,
        ))
    }

    /// Terminal transition: hands the request to `sink` exactly once and
    /// consumes the session. On rejection the session is returned inside
    /// the error, with the error tags that blocked it.
    pub fn finish<S: SubmissionSink>(
        self,
        now: OffsetDateTime,
        sink: &mut S,
    ) -> Result<(), FinishRejected> {
        match self.build_request(now) {
            Ok(request) => {
                tracing::info!(
                    name = %request.name,
                    product_id = request.product_id,
                    region_id = request.region_id,
                    "submitting cluster request"
                );
                sink.submit(request);
                Ok(())
            }
            Err(error) => {
                let session = if matches!(error, WizardError::FinishBlocked { .. }) {
                    FORM_STEPS
                        .into_iter()
                        .fold(self.validate_conditions(), WizardSession::check_required)
                } else {
                    self
                };
                Err(FinishRejected {
                    session: Box::new(session),
                    error,
                })
            }
        }
    }

    fn required(&self, key: &str) -> Result<&Value, WizardError> {
        self.values
            .get(key)
            .ok_or_else(|| invalid(key, "value is required"))
    }

    fn expiration(&self, now: OffsetDateTime) -> Result<String, WizardError> {
        let raw = self.required(KEY_EXPIRATION)?;
        let at = match raw {
            Value::Text(s) if raw.as_decimal().is_none() => {
                OffsetDateTime::parse(s.trim(), &Rfc3339)
                    .map_err(|e| invalid(KEY_EXPIRATION, &e.to_string()))?
            }
            other => {
                let amount = other
                    .as_u64()
                    .filter(|n| *n > 0)
                    .and_then(|n| i64::try_from(n).ok())
                    .ok_or_else(|| invalid(KEY_EXPIRATION, "expected a positive whole number"))?;
                self.config
                    .expiration_unit
                    .duration(amount)
                    .and_then(|d| now.checked_add(d))
                    .ok_or_else(|| invalid(KEY_EXPIRATION, "expiration out of range"))?
            }
        };
        at.format(&Rfc3339)
            .map_err(|e| invalid(KEY_EXPIRATION, &e.to_string()))
    }

    // ── Ownership ───────────────────────────────────────────────────

    /// True when `key` may be submitted by `step`.
    fn owns(&self, step: StepId, key: &str) -> Result<bool, WizardError> {
        Ok(match step {
            StepId::Product => key == KEY_PRODUCT,
            StepId::Region => key == KEY_REGION,
            StepId::ClusterConfiguration => {
                key == KEY_NAME
                    || key == KEY_EXPIRATION
                    || self.product_parameter(key)?.is_some_and(|p| !p.advanced)
            }
            StepId::AdvancedConfiguration => {
                !is_reserved_key(key) && self.product_parameter(key)?.is_some_and(|p| p.advanced)
            }
            StepId::Review => false,
        })
    }

    fn product_parameter(&self, key: &str) -> Result<Option<&ParameterSchema>, WizardError> {
        let product = self.require_product()?;
        Ok(product.parameter(key))
    }

    fn require_product(&self) -> Result<&Product, WizardError> {
        let raw = self
            .values
            .get(KEY_PRODUCT)
            .ok_or(WizardError::NoProductSelected)?;
        let id = id_value(KEY_PRODUCT, raw)?;
        self.products.get(id).ok_or(WizardError::UnknownProduct(id))
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn values(&self) -> &WizardValues {
        &self.values
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    pub fn steps(&self) -> StepState {
        self.steps
    }

    pub fn current_step(&self) -> StepId {
        self.steps.current
    }

    /// Latest projection, once product, region and region data are all
    /// available.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn quota_error(&self) -> Option<&QuotaExceeded> {
        self.quota_error.as_ref()
    }

    /// The selected product, when it is in the catalog.
    pub fn selected_product(&self) -> Option<&Product> {
        self.require_product().ok()
    }

    /// Quota and usage of the selected region, once loaded.
    pub fn selected_region_quota(&self) -> Option<&RegionQuota> {
        let id = self.values.get(KEY_REGION)?.as_u64()?;
        self.regions.get(&id)
    }

    /// Parameters edited on `step` for the selected product.
    pub fn parameters_for(&self, step: StepId) -> Vec<&ParameterSchema> {
        let advanced = match step {
            StepId::ClusterConfiguration => false,
            StepId::AdvancedConfiguration => true,
            _ => return Vec::new(),
        };
        self.selected_product()
            .map(|p| p.parameters_where(advanced).collect())
            .unwrap_or_default()
    }

    pub fn can_advance(&self) -> bool {
        advance_blocker(self.steps.current, &self.values, &self.errors).is_none()
    }

    pub fn can_jump_to(&self, target: StepId) -> bool {
        self.steps.can_jump_to(target)
    }

    pub fn can_finish(&self) -> bool {
        self.steps.current == StepId::Review && self.checked_errors().is_empty()
    }
}

fn id_value(key: &str, raw: &Value) -> Result<u64, WizardError> {
    raw.as_u64()
        .ok_or_else(|| invalid(key, &format!("expected an id, got {}", raw.type_name())))
}

fn invalid(key: &str, message: &str) -> WizardError {
    WizardError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
