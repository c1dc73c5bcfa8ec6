//! Cloud collaborator interface and the snapshots it returns

use crate::Result;
use async_trait::async_trait;
use ipnetwork::IpNetwork;

#[cfg(test)]
use mockall::automock;

/// A named secondary range of a subnet
#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryRange {
    pub range_name: String,
    pub ip_cidr_range: IpNetwork,
}

/// Read-only view of a cloud subnet
#[derive(Clone, Debug, PartialEq)]
pub struct SubnetSnapshot {
    /// Subnet name
    pub name: String,
    /// Name of the owning VPC
    pub network: String,
    /// Region of the subnet
    pub region: String,
    /// Primary range
    pub ip_cidr_range: Option<IpNetwork>,
    /// Secondary ranges carved out of the subnet
    pub secondary_ranges: Vec<SecondaryRange>,
}

impl SubnetSnapshot {
    /// Look up a secondary range by name
    pub fn secondary_range(&self, range_name: &str) -> Option<&SecondaryRange> {
        self.secondary_ranges
            .iter()
            .find(|r| r.range_name == range_name)
    }

    /// Whether the subnet has a secondary range with this name
    pub fn has_secondary_range(&self, range_name: &str) -> bool {
        self.secondary_range(range_name).is_some()
    }
}

/// Read-only view of a cloud VPC
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkSnapshot {
    pub name: String,
    pub self_link: String,
}

/// Cloud networking operations the validators depend on.
///
/// `Ok(None)` means the object does not exist; `Err` is reserved for
/// transport failures, which callers propagate instead of turning into a
/// validation verdict.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CloudNetworks: Send + Sync {
    /// Region subnets are looked up in
    fn region(&self) -> String;

    /// Whether the cluster runs on a shared VPC owned by another project
    fn on_xpn(&self) -> bool;

    /// Name of the cluster's own (default) network
    fn default_network_name(&self) -> Result<String>;

    /// Fetch a subnet by region and name
    async fn get_subnetwork(&self, region: &str, name: &str) -> Result<Option<SubnetSnapshot>>;

    /// Fetch a VPC by name
    async fn get_network(&self, name: &str) -> Result<Option<NetworkSnapshot>>;
}

/// Extract the network name from a network resource URL such as
/// `https://www.googleapis.com/compute/v1/projects/p/global/networks/default`
/// or `projects/p/global/networks/default`.
pub fn network_name_from_url(url: &str) -> Result<String> {
    let (_, name) = url
        .trim_end_matches('/')
        .rsplit_once("/networks/")
        .ok_or_else(|| crate::CoreError::InvalidResourceUrl(url.to_string()))?;

    if name.is_empty() || name.contains('/') {
        return Err(crate::CoreError::InvalidResourceUrl(url.to_string()));
    }
    Ok(name.to_string())
}
