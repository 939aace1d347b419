//! Declarative conditions attached to product parameters.
//!
//! A condition is a recursive boolean expression over wizard variables.
//! Leaves compare one variable against a literal; connectives combine
//! subtrees. Schema-authoring mistakes are kept in the tree as
//! [`Condition::Malformed`] nodes so that decoding a catalog never fails
//! because of one bad condition, and so they can be reported statically.

use std::fmt;

use crate::value::Value;

/// Comparison operator of a condition leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

impl Operator {
    /// Parses the wire spelling of an operator.
    pub fn parse(s: &str) -> Option<Operator> {
        match s.trim() {
            "==" | "=" | "eq" => Some(Operator::Eq),
            "!=" | "ne" => Some(Operator::Ne),
            "<" | "lt" => Some(Operator::Lt),
            "<=" | "le" => Some(Operator::Le),
            ">" | "gt" => Some(Operator::Gt),
            ">=" | "ge" => Some(Operator::Ge),
            "in" => Some(Operator::In),
            "not in" | "not_in" => Some(Operator::NotIn),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "in",
            Operator::NotIn => "not in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean expression tree over wizard variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `values[variable] <op> literal`
    Leaf {
        variable: String,
        op: Operator,
        literal: Value,
    },
    /// All children hold. An empty `And` holds.
    And(Vec<Condition>),
    /// Some child holds. An empty `Or` does not hold.
    Or(Vec<Condition>),
    Not(Box<Condition>),
    /// A node that could not be decoded, with the reason.
    Malformed { reason: String },
}

impl Condition {
    /// Convenience constructor for a leaf.
    pub fn leaf(variable: impl Into<String>, op: Operator, literal: impl Into<Value>) -> Self {
        Condition::Leaf {
            variable: variable.into(),
            op,
            literal: literal.into(),
        }
    }

    pub fn eq(variable: impl Into<String>, literal: impl Into<Value>) -> Self {
        Condition::leaf(variable, Operator::Eq, literal)
    }

    pub fn negate(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }

    /// Reasons of every malformed node in the tree, in depth-first order.
    pub fn issues(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_issues(&mut out);
        out
    }

    fn collect_issues(&self, out: &mut Vec<String>) {
        match self {
            Condition::Leaf { .. } => {}
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.collect_issues(out);
                }
            }
            Condition::Not(inner) => inner.collect_issues(out),
            Condition::Malformed { reason } => out.push(reason.clone()),
        }
    }

    /// Variables referenced by leaves of the tree.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Leaf { variable, .. } => {
                if !out.contains(&variable.as_str()) {
                    out.push(variable);
                }
            }
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.collect_variables(out);
                }
            }
            Condition::Not(inner) => inner.collect_variables(out),
            Condition::Malformed { .. } => {}
        }
    }
}

/// A parameter's condition together with the message shown when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterCondition {
    pub expression: Condition,
    /// May span several lines; each line is shown as its own paragraph.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_spellings() {
        assert_eq!(Operator::parse("=="), Some(Operator::Eq));
        assert_eq!(Operator::parse(" not in "), Some(Operator::NotIn));
        assert_eq!(Operator::parse("~"), None);
        assert_eq!(Operator::Ge.to_string(), ">=");
    }

    #[test]
    fn issues_are_collected_depth_first() {
        let tree = Condition::And(vec![
            Condition::eq("a", 1),
            Condition::Malformed {
                reason: "first".into(),
            },
            Condition::negate(Condition::Or(vec![Condition::Malformed {
                reason: "second".into(),
            }])),
        ]);
        assert_eq!(tree.issues(), vec!["first", "second"]);
    }

    #[test]
    fn variables_are_deduplicated() {
        let tree = Condition::And(vec![
            Condition::eq("a", 1),
            Condition::Or(vec![Condition::eq("b", 2), Condition::eq("b", 3)]),
        ]);
        assert_eq!(tree.variables(), vec!["a", "b"]);
    }
}
