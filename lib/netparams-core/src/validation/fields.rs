use crate::condition::ParamSetVerdict;
use crate::ranges::has_ranges;
use netparams_api::{GKENetworkParamSet, ParamSetConditionReason};

/// Check that the fields set on the parameter set may be specified together.
///
/// Requires either a network attachment or a VPC + subnet pair. Attachment
/// mode excludes every other field and skips the remaining checks; VPC mode
/// requires exactly one of device mode or secondary ranges.
pub fn validate_field_combinations(params: &GKENetworkParamSet) -> ParamSetVerdict {
    let spec = &params.spec;
    let has_attachment = !spec.network_attachment.is_empty();
    let has_vpc = !spec.vpc.is_empty();
    let has_subnet = !spec.vpc_subnet.is_empty();
    let has_device_mode = !spec.device_mode.is_empty();
    let has_secondary_ranges = has_ranges(params);

    if !has_attachment && (!has_vpc || !has_subnet) {
        return ParamSetVerdict::invalid(
            ParamSetConditionReason::ConfigInvalid,
            "NetworkAttachment or (VPC + VPCSubnet) must be specified",
        );
    }

    if has_attachment {
        if has_vpc || has_subnet || has_device_mode || has_secondary_ranges {
            return ParamSetVerdict::invalid(
                ParamSetConditionReason::ConfigInvalid,
                "When NetworkAttachment is specified, none of the following can be specified: \
                 (VPC, VPCSubnet, DeviceMode, PodIPv4Ranges)",
            );
        }
        return ParamSetVerdict::Valid;
    }

    if !has_secondary_ranges && !has_device_mode {
        return ParamSetVerdict::invalid(
            ParamSetConditionReason::SecondaryRangeAndDeviceModeUnspecified,
            "One of PodIPv4Ranges or DeviceMode must be specified",
        );
    }

    if has_secondary_ranges && has_device_mode {
        return ParamSetVerdict::invalid(
            ParamSetConditionReason::DeviceModeCantBeUsedWithSecondaryRange,
            "PodIPv4Ranges and DeviceMode can not be specified at the same time",
        );
    }

    ParamSetVerdict::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use netparams_api::v1::SecondaryRanges;
    use netparams_api::GKENetworkParamSetSpec;

    const ATTACHMENT: &str = "projects/p1/regions/us-central1/networkAttachments/na1";

    fn params(spec: GKENetworkParamSetSpec) -> GKENetworkParamSet {
        GKENetworkParamSet::new("gnp", spec)
    }

    fn ranges(names: &[&str]) -> Option<SecondaryRanges> {
        Some(SecondaryRanges {
            range_names: names.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn vpc_spec() -> GKENetworkParamSetSpec {
        GKENetworkParamSetSpec {
            vpc: "vpc-1".to_string(),
            vpc_subnet: "subnet-1".to_string(),
            ..Default::default()
        }
    }

    fn reason(verdict: &ParamSetVerdict) -> Option<ParamSetConditionReason> {
        verdict.reason()
    }

    #[test]
    fn test_no_fields_is_config_invalid() {
        let verdict = validate_field_combinations(&params(GKENetworkParamSetSpec::default()));
        assert_eq!(reason(&verdict), Some(ParamSetConditionReason::ConfigInvalid));
    }

    #[test]
    fn test_vpc_without_subnet_is_config_invalid() {
        let only_vpc = GKENetworkParamSetSpec {
            vpc: "vpc-1".to_string(),
            device_mode: "NetDevice".to_string(),
            ..Default::default()
        };
        let only_subnet = GKENetworkParamSetSpec {
            vpc_subnet: "subnet-1".to_string(),
            pod_ipv4_ranges: ranges(&["pods"]),
            ..Default::default()
        };

        for spec in [only_vpc, only_subnet] {
            let verdict = validate_field_combinations(&params(spec));
            assert_eq!(reason(&verdict), Some(ParamSetConditionReason::ConfigInvalid));
        }
    }

    #[test]
    fn test_attachment_alone_is_valid() {
        let spec = GKENetworkParamSetSpec {
            network_attachment: ATTACHMENT.to_string(),
            ..Default::default()
        };
        assert!(validate_field_combinations(&params(spec)).is_valid());
    }

    #[test]
    fn test_attachment_with_other_fields_is_config_invalid() {
        let with = |f: fn(&mut GKENetworkParamSetSpec)| {
            let mut spec = GKENetworkParamSetSpec {
                network_attachment: ATTACHMENT.to_string(),
                ..Default::default()
            };
            f(&mut spec);
            spec
        };
        let specs = [
            with(|s| s.vpc = "vpc-1".to_string()),
            with(|s| s.vpc_subnet = "subnet-1".to_string()),
            with(|s| s.device_mode = "NetDevice".to_string()),
            with(|s| s.pod_ipv4_ranges = ranges(&["pods"])),
            with(|s| {
                s.vpc = "vpc-1".to_string();
                s.vpc_subnet = "subnet-1".to_string();
                s.device_mode = "NetDevice".to_string();
            }),
        ];

        for spec in specs {
            let verdict = validate_field_combinations(&params(spec));
            assert_eq!(reason(&verdict), Some(ParamSetConditionReason::ConfigInvalid));
        }
    }

    #[test]
    fn test_attachment_with_empty_ranges_is_valid() {
        let spec = GKENetworkParamSetSpec {
            network_attachment: ATTACHMENT.to_string(),
            pod_ipv4_ranges: ranges(&[]),
            ..Default::default()
        };
        assert!(validate_field_combinations(&params(spec)).is_valid());
    }

    #[test]
    fn test_vpc_without_device_mode_or_ranges() {
        let verdict = validate_field_combinations(&params(vpc_spec()));
        assert_eq!(
            reason(&verdict),
            Some(ParamSetConditionReason::SecondaryRangeAndDeviceModeUnspecified)
        );

        let spec = GKENetworkParamSetSpec {
            pod_ipv4_ranges: ranges(&[]),
            ..vpc_spec()
        };
        let verdict = validate_field_combinations(&params(spec));
        assert_eq!(
            reason(&verdict),
            Some(ParamSetConditionReason::SecondaryRangeAndDeviceModeUnspecified)
        );
    }

    #[test]
    fn test_vpc_with_device_mode_and_ranges() {
        let spec = GKENetworkParamSetSpec {
            device_mode: "NetDevice".to_string(),
            pod_ipv4_ranges: ranges(&["pods"]),
            ..vpc_spec()
        };
        let verdict = validate_field_combinations(&params(spec));
        assert_eq!(
            reason(&verdict),
            Some(ParamSetConditionReason::DeviceModeCantBeUsedWithSecondaryRange)
        );
    }

    #[test]
    fn test_vpc_with_exactly_one_mode_is_valid() {
        let device = GKENetworkParamSetSpec {
            device_mode: "DPDK-VFIO".to_string(),
            ..vpc_spec()
        };
        let secondary = GKENetworkParamSetSpec {
            pod_ipv4_ranges: ranges(&["pods-a", "pods-b"]),
            ..vpc_spec()
        };

        assert!(validate_field_combinations(&params(device)).is_valid());
        assert!(validate_field_combinations(&params(secondary)).is_valid());
    }
}
