use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// GKENetworkParamSet describes how a pod network maps onto cloud networking:
/// either a VPC + subnet pair (with device mode or secondary ranges), or a
/// network attachment
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "networking.gke.io",
    version = "v1",
    kind = "GKENetworkParamSet",
    plural = "gkenetworkparamsets",
    shortname = "gnp",
    derive = "Default",
    derive = "PartialEq",
    status = "GKENetworkParamSetStatus",
    printcolumn = r#"{"name":"VPC","type":"string","jsonPath":".spec.vpc"}"#,
    printcolumn = r#"{"name":"Subnet","type":"string","jsonPath":".spec.vpcSubnet"}"#,
    printcolumn = r#"{"name":"DeviceMode","type":"string","jsonPath":".spec.deviceMode"}"#,
)]
#[serde(rename_all = "camelCase")]
pub struct GKENetworkParamSetSpec {
    /// Name of the VPC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vpc: String,

    /// Name of the subnet within the VPC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vpc_subnet: String,

    /// Device mode ("DPDK-VFIO" or "NetDevice"); empty means unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device_mode: String,

    /// Secondary ranges of the subnet used for pod IPs
    #[serde(rename = "podIPv4Ranges", skip_serializing_if = "Option::is_none")]
    pub pod_ipv4_ranges: Option<SecondaryRanges>,

    /// Fully qualified network attachment:
    /// projects/PROJECT_ID/regions/REGION/networkAttachments/NETWORK_ATTACHMENT
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_attachment: String,
}

/// Named secondary ranges of a subnet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryRanges {
    #[serde(default)]
    pub range_names: Vec<String>,
}

/// CIDR blocks resolved from the referenced secondary ranges
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRanges {
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
}

/// Status of a GKENetworkParamSet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GKENetworkParamSetStatus {
    /// Pod CIDRs of the referenced secondary ranges
    #[serde(rename = "podCIDRs", skip_serializing_if = "Option::is_none")]
    pub pod_cidrs: Option<NetworkRanges>,

    /// Conditions describing the status
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Network currently referencing this parameter set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_name: String,
}

impl GKENetworkParamSet {
    /// Range names, if the optional range list is present
    pub fn range_names(&self) -> &[String] {
        self.spec
            .pod_ipv4_ranges
            .as_ref()
            .map(|r| r.range_names.as_slice())
            .unwrap_or(&[])
    }
}
