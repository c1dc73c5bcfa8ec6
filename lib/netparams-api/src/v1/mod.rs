/// API version v1 of the networking.gke.io resources

pub mod conditions;
pub mod network;
pub mod param_set;

pub use conditions::{ConditionReason, NetworkConditionReason, ParamSetConditionReason};
pub use network::{Network, NetworkParametersReference, NetworkSpec, NetworkStatus, NetworkType};
pub use param_set::{
    GKENetworkParamSet, GKENetworkParamSetSpec, GKENetworkParamSetStatus, NetworkRanges,
    SecondaryRanges,
};

/// API group for network resources
pub const API_GROUP: &str = "networking.gke.io";
/// API version for network resources
pub const API_VERSION: &str = "v1";

/// Name of the parameter set backing the cluster's default pod network
pub const DEFAULT_POD_NETWORK_NAME: &str = "default";

/// Node label carrying the pod range assigned to the node's pool
pub const NODE_POOL_POD_RANGE_LABEL: &str = "cloud.google.com/gke-np-default-pod-range";
