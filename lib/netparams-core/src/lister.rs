//! Read access to the cluster's GKENetworkParamSets

use crate::Result;
use kube_runtime::reflector::{ObjectRef, Store};
use netparams_api::GKENetworkParamSet;
use std::sync::Arc;

/// Point-in-time read access to all GKENetworkParamSets in the cluster.
///
/// Backed by an informer cache in production, so results may lag behind the
/// API server.
pub trait ParamSetLister: Send + Sync {
    /// All parameter sets, in no particular order
    fn list_params(&self) -> Result<Vec<Arc<GKENetworkParamSet>>>;

    /// A parameter set by name
    fn get_params(&self, name: &str) -> Result<Option<Arc<GKENetworkParamSet>>>;
}

impl ParamSetLister for Store<GKENetworkParamSet> {
    fn list_params(&self) -> Result<Vec<Arc<GKENetworkParamSet>>> {
        Ok(self.state())
    }

    fn get_params(&self, name: &str) -> Result<Option<Arc<GKENetworkParamSet>>> {
        Ok(self.get(&ObjectRef::new(name)))
    }
}

impl ParamSetLister for Vec<Arc<GKENetworkParamSet>> {
    fn list_params(&self) -> Result<Vec<Arc<GKENetworkParamSet>>> {
        Ok(self.clone())
    }

    fn get_params(&self, name: &str) -> Result<Option<Arc<GKENetworkParamSet>>> {
        Ok(self
            .iter()
            .find(|p| p.metadata.name.as_deref() == Some(name))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube_runtime::watcher;
    use netparams_api::GKENetworkParamSetSpec;

    #[test]
    fn test_vec_lister() {
        let lister: Vec<Arc<GKENetworkParamSet>> = vec![
            Arc::new(GKENetworkParamSet::new("a", GKENetworkParamSetSpec::default())),
            Arc::new(GKENetworkParamSet::new("b", GKENetworkParamSetSpec::default())),
        ];

        assert_eq!(lister.list_params().unwrap().len(), 2);
        assert!(lister.get_params("b").unwrap().is_some());
        assert!(lister.get_params("c").unwrap().is_none());
    }

    #[test]
    fn test_empty_store_lister() {
        let (reader, _writer) = kube_runtime::reflector::store::<GKENetworkParamSet>();

        assert!(reader.list_params().unwrap().is_empty());
        assert!(reader.get_params("a").unwrap().is_none());
    }

    #[test]
    fn test_store_lister_by_name() {
        let (reader, mut writer) = kube_runtime::reflector::store::<GKENetworkParamSet>();
        for name in ["gnp-a", "gnp-b"] {
            let params = GKENetworkParamSet::new(name, GKENetworkParamSetSpec::default());
            writer.apply_watcher_event(&watcher::Event::Apply(params));
        }

        let mut names: Vec<String> = reader
            .list_params()
            .unwrap()
            .iter()
            .filter_map(|p| p.metadata.name.clone())
            .collect();
        names.sort();
        assert_eq!(names, vec!["gnp-a", "gnp-b"]);

        let found = reader.get_params("gnp-b").unwrap().unwrap();
        assert_eq!(found.metadata.name.as_deref(), Some("gnp-b"));
        assert!(reader.get_params("gnp-c").unwrap().is_none());
    }
}
