//! Validation of GKENetworkParamSets and of the Networks referencing them
//!
//! Structural checks (`validate_field_combinations`,
//! `validate_network_attachment`, `cross_validate_network_and_params`) are
//! pure. `ParamSetValidator` additionally consults the cloud API and the
//! other parameter sets in the cluster.

mod attachment;
mod fields;
mod network;
mod param_set;

pub use attachment::validate_network_attachment;
pub use fields::validate_field_combinations;
pub use network::cross_validate_network_and_params;
pub use param_set::{ParamSetValidation, ParamSetValidator, SubnetCheck};
