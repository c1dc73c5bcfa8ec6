use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Network represents a pod network whose cloud-side configuration is
/// described by a referenced GKENetworkParamSet
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "networking.gke.io",
    version = "v1",
    kind = "Network",
    plural = "networks",
    derive = "Default",
    derive = "PartialEq",
    status = "NetworkStatus",
    printcolumn = r#"{"name":"Type","type":"string","jsonPath":".spec.type"}"#,
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// Type of the network. The schema accepts any string so that types
    /// this controller does not special-case still reach it.
    #[serde(rename = "type", default)]
    #[schemars(with = "String")]
    pub network_type: NetworkType,

    /// Reference to the parameters of the network
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters_ref: Option<NetworkParametersReference>,

    /// Provider of the network implementation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Network type
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NetworkType {
    /// Layer 3 network
    #[default]
    L3,
    /// Device (passthrough) network
    Device,
    /// Any type this controller does not special-case
    #[serde(other)]
    Other,
}

/// Reference to the resource holding a Network's parameters
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParametersReference {
    /// API group of the referenced resource
    pub group: String,

    /// Kind of the referenced resource
    pub kind: String,

    /// Name of the referenced resource
    pub name: String,

    /// Namespace of the referenced resource, for namespaced kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Status of a Network
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NetworkStatus {
    /// Conditions describing the status
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Network {
    /// Name of the GKENetworkParamSet this network references, if any
    pub fn param_set_name(&self) -> Option<&str> {
        self.spec
            .parameters_ref
            .as_ref()
            .filter(|r| r.group == super::API_GROUP && r.kind == "GKENetworkParamSet")
            .map(|r| r.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_type_wire_values() {
        let l3: NetworkType = serde_json::from_value(serde_json::json!("L3")).unwrap();
        let device: NetworkType = serde_json::from_value(serde_json::json!("Device")).unwrap();
        let other: NetworkType = serde_json::from_value(serde_json::json!("Overlay")).unwrap();

        assert_eq!(l3, NetworkType::L3);
        assert_eq!(device, NetworkType::Device);
        assert_eq!(other, NetworkType::Other);
    }

    #[test]
    fn test_crd_schema_accepts_any_type() {
        use kube::CustomResourceExt;

        let crd = Network::crd();
        let schema = crd.spec.versions[0]
            .schema
            .as_ref()
            .and_then(|s| s.open_api_v3_schema.as_ref())
            .unwrap();
        let spec = &schema.properties.as_ref().unwrap()["spec"];
        let network_type = &spec.properties.as_ref().unwrap()["type"];

        assert_eq!(network_type.type_.as_deref(), Some("string"));
        assert!(network_type.enum_.is_none());
    }

    #[test]
    fn test_param_set_name() {
        let mut network = Network::new(
            "net-1",
            NetworkSpec {
                network_type: NetworkType::Device,
                parameters_ref: Some(NetworkParametersReference {
                    group: "networking.gke.io".to_string(),
                    kind: "GKENetworkParamSet".to_string(),
                    name: "gnp-1".to_string(),
                    namespace: None,
                }),
                provider: None,
            },
        );
        assert_eq!(network.param_set_name(), Some("gnp-1"));

        network.spec.parameters_ref.as_mut().unwrap().kind = "ConfigMap".to_string();
        assert_eq!(network.param_set_name(), None);
    }
}
