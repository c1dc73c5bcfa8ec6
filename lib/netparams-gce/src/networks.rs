//! VPC and subnet lookups backed by the Compute API

use crate::{ComputeClient, GceConfig, GceError};
use async_trait::async_trait;
use ipnetwork::IpNetwork;
use netparams_core::cloud::network_name_from_url;
use netparams_core::{CloudNetworks, NetworkSnapshot, SecondaryRange, SubnetSnapshot};
use serde::Deserialize;
use tracing::debug;

/// GceNetworks answers the validators' cloud questions from the Compute API
pub struct GceNetworks {
    client: ComputeClient,
    config: GceConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Network {
    name: String,
    #[serde(default)]
    self_link: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Subnetwork {
    name: String,
    #[serde(default)]
    network: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    ip_cidr_range: Option<String>,
    #[serde(default)]
    secondary_ip_ranges: Vec<SubnetworkSecondaryRange>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubnetworkSecondaryRange {
    range_name: String,
    ip_cidr_range: String,
}

impl GceNetworks {
    /// Create a new client from configuration
    pub fn new(config: GceConfig) -> crate::Result<Self> {
        config.validate()?;
        let client = ComputeClient::new(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GceConfig {
        &self.config
    }
}

#[async_trait]
impl CloudNetworks for GceNetworks {
    fn region(&self) -> String {
        self.config.region.clone()
    }

    fn on_xpn(&self) -> bool {
        self.config.on_xpn()
    }

    fn default_network_name(&self) -> netparams_core::Result<String> {
        match &self.config.network_url {
            Some(url) if !url.is_empty() => network_name_from_url(url),
            _ => Ok(self.config.network_name.clone()),
        }
    }

    async fn get_subnetwork(
        &self,
        region: &str,
        name: &str,
    ) -> netparams_core::Result<Option<SubnetSnapshot>> {
        let path = format!(
            "projects/{}/regions/{}/subnetworks/{}",
            self.config.network_project(),
            region,
            name
        );
        let Some(subnet) = self.client.get::<Subnetwork>(&path).await? else {
            debug!("Subnet {} not found in region {}", name, region);
            return Ok(None);
        };
        Ok(Some(subnet.into_snapshot()?))
    }

    async fn get_network(&self, name: &str) -> netparams_core::Result<Option<NetworkSnapshot>> {
        let path = format!("projects/{}/global/networks/{}", self.config.project_id, name);
        let network = self.client.get::<Network>(&path).await?;
        Ok(network.map(|n| NetworkSnapshot {
            name: n.name,
            self_link: n.self_link,
        }))
    }
}

impl Subnetwork {
    fn into_snapshot(self) -> crate::Result<SubnetSnapshot> {
        let ip_cidr_range = self
            .ip_cidr_range
            .as_deref()
            .map(|cidr| parse_cidr(&self.name, cidr))
            .transpose()?;

        let secondary_ranges = self
            .secondary_ip_ranges
            .iter()
            .map(|r| {
                Ok(SecondaryRange {
                    range_name: r.range_name.clone(),
                    ip_cidr_range: parse_cidr(&self.name, &r.ip_cidr_range)?,
                })
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(SubnetSnapshot {
            network: last_segment(&self.network).to_string(),
            region: last_segment(&self.region).to_string(),
            name: self.name,
            ip_cidr_range,
            secondary_ranges,
        })
    }
}

fn parse_cidr(subnet: &str, cidr: &str) -> crate::Result<IpNetwork> {
    cidr.parse().map_err(|e| {
        GceError::InvalidResponse(format!("subnet {} has invalid range {:?}: {}", subnet, cidr, e))
    })
}

// Compute API references other resources by URL
fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
