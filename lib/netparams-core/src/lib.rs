//! Validation engine for GKENetworkParamSets
//!
//! This library provides:
//! - Structural validation of which fields may be set together
//! - Cloud validation of the referenced VPC, subnet and secondary ranges,
//!   and of device mode subnet exclusivity across parameter sets
//! - Network to parameter set compatibility checks
//! - Projection of verdicts onto status conditions

pub mod cloud;
pub mod condition;
pub mod error;
pub mod lister;
pub mod ranges;
pub mod validation;

pub use cloud::{CloudNetworks, NetworkSnapshot, SecondaryRange, SubnetSnapshot};
pub use condition::{
    set_status_condition, ConditionStatus, NetworkParamsVerdict, ParamSetVerdict, Rejection,
    StatusCondition, Verdict,
};
pub use error::{CoreError, Result};
pub use lister::ParamSetLister;
pub use validation::{
    cross_validate_network_and_params, validate_field_combinations, validate_network_attachment,
    ParamSetValidation, ParamSetValidator, SubnetCheck,
};
