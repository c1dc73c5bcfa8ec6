//! Network parameter set API types and CRDs for Kubernetes integration
//!
//! This library defines the cluster-scoped custom resources the controller
//! works with:
//! - GKENetworkParamSet: maps a pod network onto a VPC, subnet and secondary
//!   ranges, or onto a network attachment
//! - Network: a pod network that references a GKENetworkParamSet

pub mod v1;

pub use v1::{
    GKENetworkParamSet, GKENetworkParamSetSpec, GKENetworkParamSetStatus, Network,
    NetworkConditionReason, NetworkSpec, NetworkStatus, NetworkType, ParamSetConditionReason,
};
