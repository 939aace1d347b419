//! quickcluster-core: domain model for the cluster-provisioning wizard.
//!
//! Immutable value types shared by the decoding layer and the wizard
//! engine:
//!
//! - [`Quota`] / [`RegionQuota`] -- resource limits and usage
//! - [`Value`] / [`WizardValues`] -- submitted form values
//! - [`Condition`] -- declarative parameter constraints
//! - [`ParameterSchema`] / [`Product`] / [`ProductCatalog`] -- product schemas

pub mod condition;
pub mod quota;
pub mod schema;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use condition::{Condition, Operator, ParameterCondition};
pub use quota::{Quota, RegionQuota, Resource};
pub use schema::{FlavorCatalog, ParameterSchema, Product, ProductCatalog};
pub use value::{
    is_reserved_key, Value, WizardValues, KEY_EXPIRATION, KEY_NAME, KEY_PRODUCT, KEY_REGION,
    RESERVED_KEYS,
};
