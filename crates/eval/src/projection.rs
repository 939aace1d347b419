//! Resource usage projection.
//!
//! Projects what a region's usage would become if the cluster described
//! by the current wizard values were created:
//!
//! ```text
//! total = baseline + Σ count(param) × unit(flavor(param))
//! ```
//!
//! over every basic node-count parameter of the product, the ones edited
//! on the configuration step. The projection is
//! always recomputed from scratch; it is never patched incrementally.

use quickcluster_core::{ParameterSchema, Product, Quota, Value, WizardValues};
use serde::Serialize;

use crate::config::WizardConfig;

/// Usage added by one node-count parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeContribution {
    pub variable: String,
    pub role: String,
    pub flavor: String,
    pub count: u64,
    pub usage: Quota,
}

/// Why a node-count parameter contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unresolved {
    /// The count is not a non-negative whole number.
    InvalidCount { variable: String, value: String },
    /// The selected or fixed flavor is not in the product's catalog.
    UnknownFlavor { variable: String, flavor: String },
    /// Neither a companion parameter nor the product names a flavor.
    NoFlavor { variable: String },
}

/// Detailed projection result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub baseline: Quota,
    pub total: Quota,
    pub contributions: Vec<NodeContribution>,
    pub unresolved: Vec<Unresolved>,
}

impl Projection {
    /// Usage requested by the cluster itself, without the baseline.
    pub fn requested(&self) -> Quota {
        self.contributions.iter().map(|c| c.usage).sum()
    }
}

/// Projected total usage of `product` configured with `values`, on top
/// of `baseline`.
pub fn project(
    product: &Product,
    baseline: Quota,
    values: &WizardValues,
    config: &WizardConfig,
) -> Quota {
    project_detailed(product, baseline, values, config).total
}

/// Like [`project`], with a per-parameter breakdown.
pub fn project_detailed(
    product: &Product,
    baseline: Quota,
    values: &WizardValues,
    config: &WizardConfig,
) -> Projection {
    let mut contributions = Vec::new();
    let mut unresolved = Vec::new();

    for param in product.parameters_where(false) {
        let Some(role) = config.node_role(&param.variable) else {
            continue;
        };

        let count = match effective_value(param, values) {
            None => continue,
            Some(raw) => match raw.as_u64() {
                Some(n) => n,
                None => {
                    tracing::warn!(variable = %param.variable, value = %raw, "node count is not a whole number");
                    unresolved.push(Unresolved::InvalidCount {
                        variable: param.variable.clone(),
                        value: raw.to_string(),
                    });
                    continue;
                }
            },
        };

        let Some(flavor) = resolve_flavor(product, role, values, config) else {
            tracing::warn!(variable = %param.variable, role, "no flavor for node role");
            unresolved.push(Unresolved::NoFlavor {
                variable: param.variable.clone(),
            });
            continue;
        };

        let Some(unit) = product.flavors.get(&flavor) else {
            tracing::warn!(variable = %param.variable, %flavor, "flavor not in catalog");
            unresolved.push(Unresolved::UnknownFlavor {
                variable: param.variable.clone(),
                flavor,
            });
            continue;
        };

        contributions.push(NodeContribution {
            variable: param.variable.clone(),
            role: role.to_string(),
            usage: unit.scaled(count),
            flavor,
            count,
        });
    }

    let total = contributions
        .iter()
        .map(|c| c.usage)
        .fold(baseline, Quota::saturating_add);

    Projection {
        baseline,
        total,
        contributions,
        unresolved,
    }
}

/// Submitted value, falling back to the schema default.
fn effective_value<'a>(param: &'a ParameterSchema, values: &'a WizardValues) -> Option<&'a Value> {
    values.get(&param.variable).or(param.default.as_ref())
}

/// Flavor of `role`: the companion parameter's submitted value, then
/// its default, then the product's fixed flavor for the role.
fn resolve_flavor(
    product: &Product,
    role: &str,
    values: &WizardValues,
    config: &WizardConfig,
) -> Option<String> {
    let companion = config.flavor_variable(role);
    let chosen = values.get(&companion).or_else(|| {
        product
            .parameter(&companion)
            .and_then(|p| p.default.as_ref())
    });
    if let Some(name) = chosen.and_then(Value::as_text) {
        return Some(name.to_string());
    }
    product.default_flavors.get(role).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Quota {
        Quota::new(2, 4096, 0, 0)
    }

    fn product() -> Product {
        Product::new(1, "OpenShift")
            .with_parameter(ParameterSchema::new("num_web_nodes").with_default(2))
            .with_parameter(ParameterSchema::new("num_db_nodes").with_default(1))
            .with_parameter(ParameterSchema::new("db_flavor").with_default("large"))
            .with_parameter(ParameterSchema::new("cluster_label").with_default("x"))
            .with_flavor("small", small())
            .with_flavor("large", Quota::new(8, 16384, 100, 1))
            .with_default_flavor("web", "small")
    }

    #[test]
    fn defaults_and_fixed_flavors() {
        let cfg = WizardConfig::default();
        let p = project_detailed(&product(), Quota::new(10, 0, 0, 0), &WizardValues::new(), &cfg);
        assert_eq!(p.total, Quota::new(10 + 4 + 8, 8192 + 16384, 100, 1));
        assert_eq!(p.contributions.len(), 2);
        assert_eq!(p.contributions[0].flavor, "small");
        assert_eq!(p.contributions[1].flavor, "large");
        assert_eq!(p.requested(), Quota::new(12, 24576, 100, 1));
        assert!(p.unresolved.is_empty());
    }

    #[test]
    fn submitted_values_override_defaults() {
        let cfg = WizardConfig::default();
        let values = WizardValues::new()
            .with("num_web_nodes", "5")
            .with("num_db_nodes", 0)
            .with("db_flavor", "small");
        let total = project(&product(), Quota::ZERO, &values, &cfg);
        assert_eq!(total, Quota::new(10, 20480, 0, 0));
    }

    #[test]
    fn unresolvable_parameters_are_reported() {
        let cfg = WizardConfig::default();
        let product = product()
            .with_parameter(ParameterSchema::new("num_cache_nodes").with_default(1));
        let values = WizardValues::new()
            .with("num_web_nodes", -1)
            .with("db_flavor", "huge");
        let p = project_detailed(&product, Quota::ZERO, &values, &cfg);
        assert_eq!(p.total, Quota::ZERO);
        assert_eq!(
            p.unresolved,
            vec![
                Unresolved::InvalidCount {
                    variable: "num_web_nodes".into(),
                    value: "-1".into(),
                },
                Unresolved::UnknownFlavor {
                    variable: "num_db_nodes".into(),
                    flavor: "huge".into(),
                },
                Unresolved::NoFlavor {
                    variable: "num_cache_nodes".into(),
                },
            ]
        );
    }

    #[test]
    fn unanswered_count_without_default_adds_nothing() {
        let cfg = WizardConfig::default();
        let product = Product::new(1, "p")
            .with_parameter(ParameterSchema::new("num_web_nodes"))
            .with_flavor("small", small())
            .with_default_flavor("web", "small");
        let p = project_detailed(&product, Quota::new(1, 1, 1, 1), &WizardValues::new(), &cfg);
        assert_eq!(p.total, Quota::new(1, 1, 1, 1));
        assert!(p.unresolved.is_empty());
    }

    #[test]
    fn advanced_node_counts_are_not_projected() {
        let cfg = WizardConfig::default();
        let product = Product::new(1, "p")
            .with_parameter(ParameterSchema::new("num_web_nodes").with_default(2))
            .with_parameter(
                ParameterSchema::new("num_db_nodes")
                    .with_default(10)
                    .advanced(),
            )
            .with_flavor("small", small())
            .with_default_flavor("web", "small")
            .with_default_flavor("db", "small");
        let p = project_detailed(&product, Quota::new(10, 0, 0, 0), &WizardValues::new(), &cfg);
        assert_eq!(p.total.vcpu_count, 14);
        assert_eq!(p.contributions.len(), 1);
        assert_eq!(p.contributions[0].variable, "num_web_nodes");
    }

    #[test]
    fn projection_is_deterministic() {
        let cfg = WizardConfig::default();
        let values = WizardValues::new().with("num_web_nodes", 3);
        let a = project_detailed(&product(), Quota::new(1, 2, 3, 4), &values, &cfg);
        let b = project_detailed(&product(), Quota::new(1, 2, 3, 4), &values, &cfg);
        assert_eq!(a, b);
    }
}
