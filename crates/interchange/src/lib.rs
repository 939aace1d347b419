//! quickcluster-interchange: collaborator payload shapes and decoding.
//!
//! The wizard engine never talks to the network. Product catalogs,
//! region quotas and region usage arrive as already-fetched JSON; this
//! crate turns them into `quickcluster-core` types, and defines the
//! [`ClusterRequest`] body handed to the cluster-creation collaborator.

pub mod deserialize;
pub mod types;

pub use deserialize::{
    decode_catalog, decode_product, decode_quota, decode_region, decode_values, parse_condition,
    parse_parameter_condition, InterchangeError,
};
pub use types::ClusterRequest;
