//! Compute API client configuration

use crate::{GceError, Result};
use serde::{Deserialize, Serialize};

/// Where the cluster's cloud resources live and how to reach the Compute API
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GceConfig {
    /// Project the cluster runs in
    #[serde(default)]
    pub project_id: String,

    /// Project owning the VPC, when it differs from `project_id` (shared VPC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_project_id: Option<String>,

    /// Region subnets are looked up in
    #[serde(default)]
    pub region: String,

    /// URL of the cluster's network; takes precedence over `network_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_url: Option<String>,

    /// Name of the cluster's network
    #[serde(default = "default_network_name")]
    pub network_name: String,

    /// Compute API base URL
    #[serde(default = "default_compute_endpoint")]
    pub compute_endpoint: String,

    /// Metadata server token URL, used when no static token is configured
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Static bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GceConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            network_project_id: None,
            region: String::new(),
            network_url: None,
            network_name: default_network_name(),
            compute_endpoint: default_compute_endpoint(),
            token_url: default_token_url(),
            access_token: None,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl GceConfig {
    /// Project that owns the VPC and its subnets
    pub fn network_project(&self) -> &str {
        self.network_project_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.project_id)
    }

    /// Whether the VPC is owned by another project
    pub fn on_xpn(&self) -> bool {
        self.network_project() != self.project_id
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.is_empty() {
            return Err(GceError::InvalidConfiguration("projectId is required".to_string()));
        }
        if self.region.is_empty() {
            return Err(GceError::InvalidConfiguration("region is required".to_string()));
        }
        if self.request_timeout_seconds == 0 {
            return Err(GceError::InvalidConfiguration(
                "requestTimeoutSeconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_network_name() -> String {
    "default".to_string()
}

fn default_compute_endpoint() -> String {
    "https://compute.googleapis.com/compute/v1".to_string()
}

fn default_token_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_yaml() {
        let config: GceConfig =
            serde_yaml::from_str("projectId: p1\nregion: us-central1\n").unwrap();

        assert_eq!(config.project_id, "p1");
        assert_eq!(config.network_name, "default");
        assert_eq!(config.compute_endpoint, "https://compute.googleapis.com/compute/v1");
        assert_eq!(config.request_timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_on_xpn() {
        let mut config = GceConfig {
            project_id: "service".to_string(),
            region: "us-central1".to_string(),
            ..Default::default()
        };
        assert!(!config.on_xpn());
        assert_eq!(config.network_project(), "service");

        config.network_project_id = Some("service".to_string());
        assert!(!config.on_xpn());

        config.network_project_id = Some(String::new());
        assert!(!config.on_xpn());

        config.network_project_id = Some("host".to_string());
        assert!(config.on_xpn());
        assert_eq!(config.network_project(), "host");
    }

    #[test]
    fn test_validate_requires_project_and_region() {
        assert!(GceConfig::default().validate().is_err());

        let config = GceConfig {
            project_id: "p1".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
