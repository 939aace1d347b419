//! Typed structs for the payloads exchanged with external collaborators.
//!
//! Incoming catalog and region payloads are decoded straight into
//! `quickcluster-core` types by [`crate::deserialize`]; the only shape
//! owned here is the outgoing cluster-creation request.

use quickcluster_core::WizardValues;
use serde::{Deserialize, Serialize};

/// Body handed to the cluster-creation collaborator when the wizard
/// finishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterRequest {
    pub name: String,
    pub region_id: u64,
    pub product_id: u64,
    /// RFC 3339 timestamp at which the reservation ends.
    pub reservation_expiration: String,
    /// Product parameter values, keyed by parameter variable. Never
    /// contains the wizard-owned reserved keys.
    pub product_params: serde_json::Map<String, serde_json::Value>,
}

impl ClusterRequest {
    /// Builds the request body; reserved keys in `values` are dropped
    /// from `product_params`.
    pub fn new(
        name: impl Into<String>,
        region_id: u64,
        product_id: u64,
        reservation_expiration: impl Into<String>,
        values: &WizardValues,
    ) -> Self {
        let product_params = match values.product_params().to_json() {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        ClusterRequest {
            name: name.into(),
            region_id,
            product_id,
            reservation_expiration: reservation_expiration.into(),
            product_params,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "region_id": self.region_id,
            "product_id": self.product_id,
            "reservation_expiration": self.reservation_expiration,
            "product_params": self.product_params,
        })
    }
}
