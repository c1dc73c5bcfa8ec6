use crate::cloud::{CloudNetworks, SubnetSnapshot};
use crate::condition::ParamSetVerdict;
use crate::lister::ParamSetLister;
use crate::ranges::{has_new_pod_range, has_ranges};
use crate::validation::{validate_field_combinations, validate_network_attachment};
use crate::{CoreError, Result};
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Node;
use netparams_api::v1::{DEFAULT_POD_NETWORK_NAME, NODE_POOL_POD_RANGE_LABEL};
use netparams_api::{GKENetworkParamSet, ParamSetConditionReason};
use std::sync::Arc;
use tracing::debug;

/// Result of looking up the subnet a parameter set references
#[derive(Clone, Debug, PartialEq)]
pub enum SubnetCheck {
    /// The subnet exists
    Found(SubnetSnapshot),
    /// The subnet is unspecified or missing
    Rejected(ParamSetVerdict),
}

/// Validates GKENetworkParamSets against the cloud provider and against the
/// other parameter sets in the cluster
pub struct ParamSetValidator {
    cloud: Arc<dyn CloudNetworks>,
    params: Arc<dyn ParamSetLister>,
}

/// Verdict of a full validation, with the subnet fetched along the way
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSetValidation {
    pub verdict: ParamSetVerdict,
    pub subnet: Option<SubnetSnapshot>,
}

impl ParamSetValidator {
    pub fn new(cloud: Arc<dyn CloudNetworks>, params: Arc<dyn ParamSetLister>) -> Self {
        Self { cloud, params }
    }

    /// Run every check in order, stopping at the first failure: field
    /// combinations, then either the attachment format or the subnet lookup
    /// followed by the cloud checks.
    pub async fn validate(&self, params: &GKENetworkParamSet) -> Result<ParamSetValidation> {
        let verdict = validate_field_combinations(params);
        if !verdict.is_valid() {
            return Ok(ParamSetValidation {
                verdict,
                subnet: None,
            });
        }

        if !params.spec.network_attachment.is_empty() {
            return Ok(ParamSetValidation {
                verdict: validate_network_attachment(&params.spec.network_attachment),
                subnet: None,
            });
        }

        let subnet = match self.get_and_validate_subnet(params).await? {
            SubnetCheck::Found(subnet) => subnet,
            SubnetCheck::Rejected(verdict) => {
                return Ok(ParamSetValidation {
                    verdict,
                    subnet: None,
                })
            }
        };

        let verdict = self.validate_against_cloud(params, Some(&subnet)).await?;
        Ok(ParamSetValidation {
            verdict,
            subnet: Some(subnet),
        })
    }

    /// Check that the parameter set names a subnet and that it exists in the
    /// configured region
    pub async fn get_and_validate_subnet(
        &self,
        params: &GKENetworkParamSet,
    ) -> Result<SubnetCheck> {
        let spec = &params.spec;
        if spec.vpc_subnet.is_empty() {
            return Ok(SubnetCheck::Rejected(ParamSetVerdict::invalid(
                ParamSetConditionReason::SubnetNotFound,
                "subnet not specified",
            )));
        }

        let region = self.cloud.region();
        match self.cloud.get_subnetwork(&region, &spec.vpc_subnet).await? {
            Some(subnet) => Ok(SubnetCheck::Found(subnet)),
            None => Ok(SubnetCheck::Rejected(ParamSetVerdict::invalid(
                ParamSetConditionReason::SubnetNotFound,
                format!("subnet: {} not found in VPC: {}", spec.vpc_subnet, spec.vpc),
            ))),
        }
    }

    /// Check the VPC mode references of a structurally valid parameter set.
    ///
    /// `subnet` is the snapshot fetched by `get_and_validate_subnet`; when it
    /// is absent, every referenced secondary range counts as missing. Cloud
    /// and lister failures are returned as errors, never as verdicts.
    pub async fn validate_against_cloud(
        &self,
        params: &GKENetworkParamSet,
        subnet: Option<&SubnetSnapshot>,
    ) -> Result<ParamSetVerdict> {
        let spec = &params.spec;

        if spec.vpc.is_empty() {
            return Ok(ParamSetVerdict::invalid(
                ParamSetConditionReason::VpcNotFound,
                "VPC not specified",
            ));
        }

        // On a shared VPC the network lives in the host project, which is not
        // the project queried here.
        if !self.cloud.on_xpn() && self.cloud.get_network(&spec.vpc).await?.is_none() {
            return Ok(ParamSetVerdict::invalid(
                ParamSetConditionReason::VpcNotFound,
                format!("VPC: {} not found", spec.vpc),
            ));
        }

        let has_secondary_ranges = has_ranges(params);
        let has_device_mode = !spec.device_mode.is_empty();
        if !has_secondary_ranges && !has_device_mode {
            return Ok(ParamSetVerdict::invalid(
                ParamSetConditionReason::SecondaryRangeAndDeviceModeUnspecified,
                "SecondaryRange and DeviceMode are unspecified. One must be specified.",
            ));
        }

        if has_secondary_ranges && !has_device_mode {
            let missing = params
                .range_names()
                .iter()
                .find(|name| !subnet.is_some_and(|s| s.has_secondary_range(name)));
            if let Some(range_name) = missing {
                return Ok(ParamSetVerdict::invalid(
                    ParamSetConditionReason::SecondaryRangeNotFound,
                    format!(
                        "secondary range: {} not found in subnet: {}",
                        range_name, spec.vpc_subnet
                    ),
                ));
            }
        }

        if has_secondary_ranges && has_device_mode {
            return Ok(ParamSetVerdict::invalid(
                ParamSetConditionReason::DeviceModeCantBeUsedWithSecondaryRange,
                "deviceMode and secondary range can not be specified at the same time",
            ));
        }

        if has_device_mode {
            if spec.vpc == self.cloud.default_network_name()? {
                return Ok(ParamSetVerdict::invalid(
                    ParamSetConditionReason::DeviceModeCantUseDefaultVpc,
                    "GNP with deviceMode can't reference the default VPC",
                ));
            }

            if let Some(other) = self.subnet_claimant(params)? {
                return Ok(ParamSetVerdict::invalid(
                    ParamSetConditionReason::DeviceModeSubnetAlreadyInUse,
                    format!(
                        "GNP with deviceMode can't reference a subnet already in use. \
                         Subnet '{}' is already in use by '{}'",
                        spec.vpc_subnet,
                        other.metadata.name.as_deref().unwrap_or_default()
                    ),
                ));
            }
        }

        Ok(ParamSetVerdict::Valid)
    }

    /// The parameter set that claimed this one's subnet first, if any.
    ///
    /// Only strictly older parameter sets count, so the earliest claimant
    /// keeps the subnet. Two parameter sets created at the same instant do
    /// not reject each other. The listing is an informer snapshot, so two
    /// parameter sets created concurrently can both pass until the next
    /// reconcile.
    fn subnet_claimant(
        &self,
        params: &GKENetworkParamSet,
    ) -> Result<Option<Arc<GKENetworkParamSet>>> {
        let created = creation_time(params);
        let claimant = self
            .params
            .list_params()?
            .into_iter()
            .filter(|other| {
                other.metadata.name != params.metadata.name
                    && other.spec.vpc_subnet == params.spec.vpc_subnet
                    && created > creation_time(other)
            })
            .min_by(|a, b| {
                creation_time(a)
                    .cmp(&creation_time(b))
                    .then_with(|| a.metadata.name.cmp(&b.metadata.name))
            });

        if let Some(other) = &claimant {
            debug!(
                "Subnet {} of {:?} already claimed by {:?}",
                params.spec.vpc_subnet, params.metadata.name, other.metadata.name
            );
        }
        Ok(claimant)
    }

    /// Pod range names of the named parameter set
    pub fn params_pod_ranges(&self, name: &str) -> Result<Vec<String>> {
        let params = self
            .params
            .get_params(name)?
            .ok_or_else(|| CoreError::ParamsNotFound(name.to_string()))?;

        if has_ranges(&params) {
            Ok(params.range_names().to_vec())
        } else {
            Err(CoreError::MissingPodRanges(name.to_string()))
        }
    }

    /// Whether the node's pool uses a pod range outside the default
    /// parameter set
    pub fn non_default_params_pod_ranges(&self, node: &Node) -> bool {
        let default_ranges = match self.params_pod_ranges(DEFAULT_POD_NETWORK_NAME) {
            Ok(ranges) => ranges,
            Err(e) => {
                debug!(
                    "Check new Pod range on node {:?} error: {}",
                    node.metadata.name, e
                );
                return false;
            }
        };

        let label = node
            .metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(NODE_POOL_POD_RANGE_LABEL))
            .map(String::as_str);
        has_new_pod_range(label, &default_ranges)
    }
}

/// Creation time; a missing timestamp sorts before every real one
fn creation_time(params: &GKENetworkParamSet) -> Option<DateTime<Utc>> {
    params.metadata.creation_timestamp.as_ref().map(|t| t.0)
}
