//! Pod range helpers shared by the validators and the controller

use crate::cloud::SubnetSnapshot;
use netparams_api::GKENetworkParamSet;
use std::collections::HashMap;

/// Whether the parameter set names at least one secondary range.
/// A present but empty range list counts as no ranges.
pub fn has_ranges(params: &GKENetworkParamSet) -> bool {
    !params.range_names().is_empty()
}

/// Whether two parameter sets reference the same secondary ranges,
/// regardless of order. Two sets without ranges are the same.
pub fn same_ranges(params: &GKENetworkParamSet, original: &GKENetworkParamSet) -> bool {
    match (has_ranges(params), has_ranges(original)) {
        (false, false) => true,
        (true, true) => same_string_slice(params.range_names(), original.range_names()),
        _ => false,
    }
}

/// Multiset comparison: same elements with the same multiplicities
fn same_string_slice(x: &[String], y: &[String]) -> bool {
    if x.len() != y.len() {
        return false;
    }

    let mut diff: HashMap<&str, usize> = HashMap::with_capacity(x.len());
    for a in x {
        *diff.entry(a.as_str()).or_default() += 1;
    }
    for b in y {
        match diff.get_mut(b.as_str()) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    diff.remove(b.as_str());
                }
            }
            None => return false,
        }
    }
    diff.is_empty()
}

/// Whether a node's pod range label names a range outside the default
/// parameter set.
///
/// Node pools cannot be created with overlapping pod ranges, so plain
/// membership is enough here.
pub fn has_new_pod_range(label_value: Option<&str>, default_ranges: &[String]) -> bool {
    match label_value {
        Some(value) if !value.is_empty() => !default_ranges.iter().any(|r| r == value),
        _ => false,
    }
}

/// CIDR blocks of the secondary ranges the parameter set references, in the
/// order the parameter set names them. Ranges missing from the subnet are
/// skipped.
pub fn pod_cidrs(params: &GKENetworkParamSet, subnet: &SubnetSnapshot) -> Vec<String> {
    params
        .range_names()
        .iter()
        .filter_map(|name| subnet.secondary_range(name))
        .map(|range| range.ip_cidr_range.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::SecondaryRange;
    use netparams_api::v1::SecondaryRanges;
    use netparams_api::GKENetworkParamSetSpec;

    fn params_with_ranges(ranges: Option<&[&str]>) -> GKENetworkParamSet {
        GKENetworkParamSet::new(
            "gnp",
            GKENetworkParamSetSpec {
                pod_ipv4_ranges: ranges.map(|r| SecondaryRanges {
                    range_names: r.iter().map(|s| s.to_string()).collect(),
                }),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_has_ranges() {
        assert!(!has_ranges(&params_with_ranges(None)));
        assert!(!has_ranges(&params_with_ranges(Some(&[]))));
        assert!(has_ranges(&params_with_ranges(Some(&["pods"]))));
    }

    #[test]
    fn test_same_ranges_order_independent() {
        let a = params_with_ranges(Some(&["a", "b"]));
        let b = params_with_ranges(Some(&["b", "a"]));
        assert!(same_ranges(&a, &b));
        assert!(same_ranges(&b, &a));
    }

    #[test]
    fn test_same_ranges_reflexive() {
        let a = params_with_ranges(Some(&["a", "b", "c"]));
        assert!(same_ranges(&a, &a));
        let none = params_with_ranges(None);
        assert!(same_ranges(&none, &none));
    }

    #[test]
    fn test_same_ranges_differs() {
        let ab = params_with_ranges(Some(&["a", "b"]));
        let a = params_with_ranges(Some(&["a"]));
        assert!(!same_ranges(&ab, &a));
        assert!(!same_ranges(&a, &ab));

        let ac = params_with_ranges(Some(&["a", "c"]));
        assert!(!same_ranges(&ab, &ac));
    }

    #[test]
    fn test_same_ranges_multiplicity() {
        let aab = params_with_ranges(Some(&["a", "a", "b"]));
        let abb = params_with_ranges(Some(&["a", "b", "b"]));
        assert!(!same_ranges(&aab, &abb));
    }

    #[test]
    fn test_same_ranges_empty_list_equals_absent() {
        let empty = params_with_ranges(Some(&[]));
        let none = params_with_ranges(None);
        assert!(same_ranges(&empty, &none));

        let a = params_with_ranges(Some(&["a"]));
        assert!(!same_ranges(&a, &none));
    }

    #[test]
    fn test_has_new_pod_range() {
        let defaults = vec!["pods-default".to_string(), "pods-extra".to_string()];

        assert!(has_new_pod_range(Some("pods-pool-2"), &defaults));
        assert!(!has_new_pod_range(Some("pods-extra"), &defaults));
        assert!(!has_new_pod_range(Some(""), &defaults));
        assert!(!has_new_pod_range(None, &defaults));
        assert!(has_new_pod_range(Some("pods-default"), &[]));
    }

    #[test]
    fn test_pod_cidrs_follow_params_order() {
        let subnet = SubnetSnapshot {
            name: "subnet-1".to_string(),
            network: "vpc-1".to_string(),
            region: "us-central1".to_string(),
            ip_cidr_range: Some("10.0.0.0/24".parse().unwrap()),
            secondary_ranges: vec![
                SecondaryRange {
                    range_name: "a".to_string(),
                    ip_cidr_range: "10.1.0.0/16".parse().unwrap(),
                },
                SecondaryRange {
                    range_name: "b".to_string(),
                    ip_cidr_range: "10.2.0.0/16".parse().unwrap(),
                },
            ],
        };
        let params = params_with_ranges(Some(&["b", "a", "missing"]));

        assert_eq!(
            pod_cidrs(&params, &subnet),
            vec!["10.2.0.0/16".to_string(), "10.1.0.0/16".to_string()]
        );
    }
}
