use crate::condition::NetworkParamsVerdict;
use crate::ranges::has_ranges;
use netparams_api::{GKENetworkParamSet, Network, NetworkConditionReason, NetworkType};

/// Check that a Network and the GKENetworkParamSet it references are
/// compatible.
///
/// The L3/attachment rules and the Device rule are independent; both are
/// checked on every call.
pub fn cross_validate_network_and_params(
    network: &Network,
    params: &GKENetworkParamSet,
) -> NetworkParamsVerdict {
    let spec = &params.spec;
    let has_secondary_ranges = has_ranges(params);
    let has_vpc = !spec.vpc.is_empty();
    let has_subnet = !spec.vpc_subnet.is_empty();
    let has_attachment = !spec.network_attachment.is_empty();

    if network.spec.network_type == NetworkType::L3 {
        if has_vpc && has_subnet && !has_secondary_ranges {
            return NetworkParamsVerdict::invalid(
                NetworkConditionReason::L3SecondaryMissing,
                "L3 type network referring to params with (VPC + VPCSubnet) pair requires \
                 secondary range to be specified in params",
            );
        }
    } else if has_attachment {
        return NetworkParamsVerdict::invalid(
            NetworkConditionReason::NetworkAttachmentUnsupported,
            "NetworkAttachment is only allowed for L3 type networks",
        );
    }

    if network.spec.network_type == NetworkType::Device && spec.device_mode.is_empty() {
        return NetworkParamsVerdict::invalid(
            NetworkConditionReason::DeviceModeMissing,
            "Device type network requires device mode to be specified in params",
        );
    }

    NetworkParamsVerdict::Valid
}
