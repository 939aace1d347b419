//! Condition evaluation.
//!
//! Evaluates a [`Condition`] tree against the accumulated wizard
//! values. Pure: no allocation beyond recursion, no side effects other
//! than a warning log line for malformed nodes.

use quickcluster_core::{Condition, Product, WizardValues};

use crate::config::MalformedConditionPolicy;
use crate::numeric::compare_values;

/// Evaluates `cond` with the default policy for malformed nodes.
pub fn evaluate(cond: &Condition, values: &WizardValues) -> bool {
    eval_condition(cond, values, MalformedConditionPolicy::default())
}

/// Evaluates `cond` against `values`.
///
/// A leaf whose variable is unanswered does not hold. `And` holds when
/// every child holds, `Or` when some child holds, `Not` negates.
pub fn eval_condition(
    cond: &Condition,
    values: &WizardValues,
    policy: MalformedConditionPolicy,
) -> bool {
    match cond {
        Condition::Leaf {
            variable,
            op,
            literal,
        } => match values.get(variable) {
            Some(actual) => compare_values(actual, *op, literal),
            None => false,
        },
        Condition::And(children) => children
            .iter()
            .all(|c| eval_condition(c, values, policy)),
        Condition::Or(children) => children
            .iter()
            .any(|c| eval_condition(c, values, policy)),
        Condition::Not(inner) => !eval_condition(inner, values, policy),
        Condition::Malformed { reason } => {
            tracing::warn!(%reason, ?policy, "evaluating malformed condition");
            policy == MalformedConditionPolicy::Satisfied
        }
    }
}

/// A parameter whose condition does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCondition {
    pub variable: String,
    pub message: String,
}

/// Checks every condition of `product` whose parameter has been
/// answered in `values`, returning the failures in parameter order.
pub fn failed_conditions(
    product: &Product,
    values: &WizardValues,
    policy: MalformedConditionPolicy,
) -> Vec<FailedCondition> {
    product
        .parameters
        .iter()
        .filter(|p| values.contains(&p.variable))
        .filter_map(|p| p.condition.as_ref().map(|c| (p, c)))
        .filter(|(_, c)| !eval_condition(&c.expression, values, policy))
        .map(|(p, c)| FailedCondition {
            variable: p.variable.clone(),
            message: c.message.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcluster_core::{Operator, ParameterCondition, ParameterSchema};

    fn sample_tree() -> Condition {
        Condition::And(vec![
            Condition::eq("a", 1),
            Condition::Or(vec![Condition::eq("b", 2), Condition::eq("b", 3)]),
        ])
    }

    #[test]
    fn truth_table() {
        let tree = sample_tree();
        let cases = [
            (WizardValues::new().with("a", 1).with("b", 2), true),
            (WizardValues::new().with("a", 1).with("b", 4), false),
            (WizardValues::new().with("a", 2).with("b", 2), false),
            (WizardValues::new(), false),
        ];
        for (values, expected) in cases {
            assert_eq!(evaluate(&tree, &values), expected, "{:?}", values);
        }
    }

    #[test]
    fn unanswered_leaf_does_not_hold_even_negated_compare() {
        let ne = Condition::leaf("a", Operator::Ne, 1);
        assert!(!evaluate(&ne, &WizardValues::new()));
        // but negating a failed leaf holds
        assert!(evaluate(
            &Condition::negate(Condition::eq("a", 1)),
            &WizardValues::new()
        ));
    }

    #[test]
    fn empty_connectives() {
        let values = WizardValues::new();
        assert!(evaluate(&Condition::And(vec![]), &values));
        assert!(!evaluate(&Condition::Or(vec![]), &values));
    }

    #[test]
    fn malformed_follows_policy() {
        let tree = Condition::And(vec![
            Condition::eq("a", 1),
            Condition::Malformed {
                reason: "leaf on 'b' missing 'op'".into(),
            },
        ]);
        let values = WizardValues::new().with("a", 1);
        assert!(eval_condition(
            &tree,
            &values,
            MalformedConditionPolicy::Satisfied
        ));
        assert!(!eval_condition(
            &tree,
            &values,
            MalformedConditionPolicy::Violated
        ));
    }

    #[test]
    fn only_answered_parameters_are_checked() {
        let product = Product::new(1, "p")
            .with_parameter(ParameterSchema::new("workers").with_condition(ParameterCondition {
                expression: Condition::leaf("workers", Operator::Ge, 3),
                message: "Need at least 3 workers".into(),
            }))
            .with_parameter(ParameterSchema::new("storage").with_condition(ParameterCondition {
                expression: Condition::leaf("storage", Operator::Le, 100),
                message: "Too much storage".into(),
            }));

        let values = WizardValues::new().with("workers", 2);
        let failed = failed_conditions(&product, &values, MalformedConditionPolicy::Satisfied);
        assert_eq!(
            failed,
            vec![FailedCondition {
                variable: "workers".into(),
                message: "Need at least 3 workers".into(),
            }]
        );

        let ok = WizardValues::new().with("workers", 3).with("storage", 50);
        assert!(failed_conditions(&product, &ok, MalformedConditionPolicy::Satisfied).is_empty());
    }
}
