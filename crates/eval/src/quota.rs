//! Quota comparison.

use std::fmt;

use quickcluster_core::{Quota, Resource};
use serde::Serialize;

/// One resource whose usage exceeds its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaViolation {
    pub resource: Resource,
    pub usage: u64,
    pub limit: u64,
}

/// Every violated resource of a usage/limit comparison, in display
/// order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaExceeded {
    pub violations: Vec<QuotaViolation>,
}

impl fmt::Display for QuotaExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Quota exceeded: ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} requested {} of {}", v.resource, v.usage, v.limit)?;
        }
        Ok(())
    }
}

/// Compares `usage` against `limit` field by field. Returns every
/// violation at once, or `None` when usage fits.
pub fn exceeded(usage: &Quota, limit: &Quota) -> Option<QuotaExceeded> {
    let violations: Vec<QuotaViolation> = Resource::ALL
        .iter()
        .filter(|r| usage.get(**r) > limit.get(**r))
        .map(|r| QuotaViolation {
            resource: *r,
            usage: usage.get(*r),
            limit: limit.get(*r),
        })
        .collect();
    if violations.is_empty() {
        None
    } else {
        Some(QuotaExceeded { violations })
    }
}
