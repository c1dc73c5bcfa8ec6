//! GKENetworkParamSet controller: validates parameter sets and the Networks
//! referencing them, and records the verdicts as status conditions

use crate::config::ControllerConfig;
use crate::metrics::ControllerMetrics;
use chrono::Utc;
use futures::StreamExt;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use kube_runtime::reflector::{self, ObjectRef, Store};
use kube_runtime::{controller::Action, watcher, Controller, WatchStreamExt};
use netparams_api::v1::NetworkRanges;
use netparams_api::{GKENetworkParamSet, GKENetworkParamSetStatus, Network};
use netparams_core::ranges::{has_ranges, pod_cidrs};
use netparams_core::{
    cross_validate_network_and_params, set_status_condition, CloudNetworks, CoreError,
    ParamSetValidator,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Validation error: {0}")]
    Validation(#[from] CoreError),

    #[error("Kubernetes error: {0}")]
    KubernetesError(#[from] kube::Error),
}

/// State shared by all reconciles
pub struct Context {
    client: Client,
    validator: ParamSetValidator,
    networks: Store<Network>,
    metrics: Arc<ControllerMetrics>,
    requeue: Duration,
    error_requeue: Duration,
}

pub struct ParamSetController {
    client: Client,
    cloud: Arc<dyn CloudNetworks>,
    metrics: Arc<ControllerMetrics>,
    requeue: Duration,
    error_requeue: Duration,
}

impl ParamSetController {
    pub fn new(
        client: Client,
        cloud: Arc<dyn CloudNetworks>,
        metrics: Arc<ControllerMetrics>,
        config: &ControllerConfig,
    ) -> Self {
        Self {
            client,
            cloud,
            metrics,
            requeue: config.requeue(),
            error_requeue: config.error_requeue(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting GKENetworkParamSet reconciliation");

        let params: Api<GKENetworkParamSet> = Api::all(self.client.clone());
        let networks: Api<Network> = Api::all(self.client.clone());

        // Network changes re-validate the parameter set they reference. The
        // same watch feeds the cache reconciles read referencing networks from.
        let (network_store, network_writer) = reflector::store::<Network>();
        let network_events = watcher(networks, watcher::Config::default())
            .default_backoff()
            .reflect(network_writer)
            .touched_objects();
        let controller = Controller::new(params, watcher::Config::default()).watches_stream(
            network_events,
            |network: Network| network.param_set_name().map(ObjectRef::new),
        );

        // The controller's own cache doubles as the sibling lister for the
        // device mode subnet check
        let store = controller.store();
        let ctx = Arc::new(Context {
            client: self.client,
            validator: ParamSetValidator::new(self.cloud, Arc::new(store)),
            networks: network_store,
            metrics: self.metrics,
            requeue: self.requeue,
            error_requeue: self.error_requeue,
        });

        controller
            .run(reconcile, error_policy, ctx)
            .for_each(|item| async move {
                match item {
                    Ok((obj, _)) => debug!("Reconciled GKENetworkParamSet {}", obj.name),
                    Err(e) => error!("Error in reconciliation stream: {}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(
    params: Arc<GKENetworkParamSet>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let name = params.name_any();
    if params.metadata.deletion_timestamp.is_some() {
        debug!("GKENetworkParamSet {} is being deleted", name);
        return Ok(Action::await_change());
    }
    info!("Reconciling GKENetworkParamSet: {}", name);

    let validation = ctx.validator.validate(&params).await?;
    ctx.metrics.record_verdict(&validation.verdict);
    if let Some(reason) = validation.verdict.reason() {
        info!("GKENetworkParamSet {} is invalid: {}", name, reason);
    }

    let networks = networks_referencing(&ctx.networks, &name);

    let mut status = params.status.clone().unwrap_or_default();
    let condition = validation
        .verdict
        .to_condition()
        .into_k8s(params.metadata.generation, Utc::now());
    let mut changed = set_status_condition(&mut status.conditions, condition);

    let cidrs = match &validation.subnet {
        Some(subnet) if validation.verdict.is_valid() && has_ranges(&params) => {
            Some(NetworkRanges {
                cidr_blocks: pod_cidrs(&params, subnet),
            })
        }
        _ => None,
    };
    if status.pod_cidrs != cidrs {
        status.pod_cidrs = cidrs;
        changed = true;
    }

    let network_name = networks.first().map(|n| n.name_any()).unwrap_or_default();
    if status.network_name != network_name {
        status.network_name = network_name;
        changed = true;
    }

    if changed {
        patch_params_status(&ctx.client, &name, &status).await?;
    }

    for network in &networks {
        cross_validate(&ctx, network, &params).await?;
    }

    Ok(Action::requeue(ctx.requeue))
}

fn error_policy(
    params: Arc<GKENetworkParamSet>,
    error: &ReconcileError,
    ctx: Arc<Context>,
) -> Action {
    warn!(
        "Error reconciling GKENetworkParamSet {}: {}",
        params.name_any(),
        error
    );
    ctx.metrics.reconcile_errors_total.inc();
    Action::requeue(ctx.error_requeue)
}

/// Cached Networks referencing the named parameter set, sorted by name
fn networks_referencing(networks: &Store<Network>, params_name: &str) -> Vec<Arc<Network>> {
    let mut matching: Vec<Arc<Network>> = networks
        .state()
        .into_iter()
        .filter(|n| n.param_set_name() == Some(params_name))
        .collect();
    matching.sort_by_key(|n| n.name_any());
    matching
}

async fn cross_validate(
    ctx: &Context,
    network: &Network,
    params: &GKENetworkParamSet,
) -> Result<(), ReconcileError> {
    let verdict = cross_validate_network_and_params(network, params);
    ctx.metrics.record_verdict(&verdict);

    let mut conditions: Vec<Condition> = network
        .status
        .as_ref()
        .map(|s| s.conditions.clone())
        .unwrap_or_default();
    let condition = verdict
        .to_condition()
        .into_k8s(network.metadata.generation, Utc::now());
    if !set_status_condition(&mut conditions, condition) {
        return Ok(());
    }

    let name = network.name_any();
    debug!("Updating ParamsReady condition of Network {}", name);
    let networks: Api<Network> = Api::all(ctx.client.clone());
    let patch = json!({ "status": { "conditions": conditions } });
    networks
        .patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}

async fn patch_params_status(
    client: &Client,
    name: &str,
    status: &GKENetworkParamSetStatus,
) -> Result<(), ReconcileError> {
    debug!("Updating status of GKENetworkParamSet {}", name);
    let params: Api<GKENetworkParamSet> = Api::all(client.clone());

    // podCIDRs is written as null when absent so a merge patch clears it
    let patch = json!({
        "status": {
            "conditions": status.conditions,
            "podCIDRs": status.pod_cidrs,
            "networkName": status.network_name,
        }
    });
    params
        .patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;
    Ok(())
}
