//! Condition types and closed reason vocabularies for status conditions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition type set on a GKENetworkParamSet
pub const PARAM_SET_READY_CONDITION: &str = "Ready";
/// Condition type set on a Network for its referenced parameters
pub const NETWORK_PARAMS_READY_CONDITION: &str = "ParamsReady";

/// A closed set of failure reasons belonging to one condition type.
///
/// Each implementation maps its variants to their wire tokens with an
/// exhaustive match, so a new reason cannot be added without giving it a token.
pub trait ConditionReason: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Condition type the reasons are reported under
    const CONDITION_TYPE: &'static str;
    /// Reason reported when the condition holds
    const READY_REASON: &'static str;

    /// Wire token of the reason
    fn as_str(&self) -> &'static str;
}

/// Why a GKENetworkParamSet is not ready
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamSetConditionReason {
    /// The combination of fields set is not supported
    #[serde(rename = "GNPConfigInvalid")]
    ConfigInvalid,
    /// Neither device mode nor secondary ranges are specified
    SecondaryRangeAndDeviceModeUnspecified,
    /// Device mode and secondary ranges are both specified
    DeviceModeCantBeUsedWithSecondaryRange,
    /// The referenced VPC is missing
    #[serde(rename = "VPCNotFound")]
    VpcNotFound,
    /// The referenced subnet is missing
    SubnetNotFound,
    /// A referenced secondary range is missing from the subnet
    SecondaryRangeNotFound,
    /// The network attachment name is malformed
    NetworkAttachmentInvalid,
    /// Device mode parameter sets cannot use the cluster's default VPC
    #[serde(rename = "DeviceModeCantUseDefaultVPC")]
    DeviceModeCantUseDefaultVpc,
    /// An older parameter set already uses the subnet
    DeviceModeSubnetAlreadyInUse,
}

impl ConditionReason for ParamSetConditionReason {
    const CONDITION_TYPE: &'static str = PARAM_SET_READY_CONDITION;
    const READY_REASON: &'static str = "GNPReady";

    fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigInvalid => "GNPConfigInvalid",
            Self::SecondaryRangeAndDeviceModeUnspecified => {
                "SecondaryRangeAndDeviceModeUnspecified"
            }
            Self::DeviceModeCantBeUsedWithSecondaryRange => {
                "DeviceModeCantBeUsedWithSecondaryRange"
            }
            Self::VpcNotFound => "VPCNotFound",
            Self::SubnetNotFound => "SubnetNotFound",
            Self::SecondaryRangeNotFound => "SecondaryRangeNotFound",
            Self::NetworkAttachmentInvalid => "NetworkAttachmentInvalid",
            Self::DeviceModeCantUseDefaultVpc => "DeviceModeCantUseDefaultVPC",
            Self::DeviceModeSubnetAlreadyInUse => "DeviceModeSubnetAlreadyInUse",
        }
    }
}

/// Why a Network's referenced parameters are not usable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkConditionReason {
    /// An L3 network with a VPC + subnet pair needs secondary ranges
    L3SecondaryMissing,
    /// Network attachments are only allowed for L3 networks
    NetworkAttachmentUnsupported,
    /// A Device network needs device mode in its parameters
    DeviceModeMissing,
}

impl ConditionReason for NetworkConditionReason {
    const CONDITION_TYPE: &'static str = NETWORK_PARAMS_READY_CONDITION;
    const READY_REASON: &'static str = "GNPParamsReady";

    fn as_str(&self) -> &'static str {
        match self {
            Self::L3SecondaryMissing => "L3SecondaryMissing",
            Self::NetworkAttachmentUnsupported => "NetworkAttachmentUnsupported",
            Self::DeviceModeMissing => "DeviceModeMissing",
        }
    }
}

impl fmt::Display for ParamSetConditionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NetworkConditionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
