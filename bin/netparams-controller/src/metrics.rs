//! Prometheus metrics for validation outcomes

use anyhow::Result;
use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming},
    server::conn::http1,
    service::service_fn,
    Request, Response, StatusCode,
};
use hyper_util::rt::tokio::TokioIo;
use netparams_api::v1::ConditionReason;
use netparams_core::Verdict;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Metrics collector for reconciles and their verdicts
#[derive(Clone)]
pub struct ControllerMetrics {
    /// Verdicts by condition type and reason
    pub verdicts_total: CounterVec,
    /// Reconciles that failed before a status could be written
    pub reconcile_errors_total: Counter,
    /// Prometheus registry for metrics
    pub registry: Arc<Registry>,
}

impl ControllerMetrics {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let verdicts_total = CounterVec::new(
            Opts::new("netparams_verdicts_total", "Validation verdicts by condition and reason"),
            &["condition", "reason"],
        )?;
        let reconcile_errors_total = Counter::new(
            "netparams_reconcile_errors_total",
            "Reconciles that failed with a transport error",
        )?;

        registry.register(Box::new(verdicts_total.clone()))?;
        registry.register(Box::new(reconcile_errors_total.clone()))?;

        Ok(Self {
            verdicts_total,
            reconcile_errors_total,
            registry,
        })
    }

    pub fn record_verdict<R: ConditionReason>(&self, verdict: &Verdict<R>) {
        let reason = verdict.reason().map_or(R::READY_REASON, |r| r.as_str());
        self.verdicts_total
            .with_label_values(&[R::CONDITION_TYPE, reason])
            .inc();
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Serve `/metrics` and `/healthz` until the listener fails
pub async fn serve(addr: SocketAddr, metrics: Arc<ControllerMetrics>) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("Metrics server listening on {}", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let metrics = metrics.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let metrics = metrics.clone();
                async move { Ok::<_, Infallible>(handle_request(req, &metrics)) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Error serving metrics connection from {}: {}", peer_addr, e);
            }
        });
    }
}

fn handle_request<B>(req: Request<B>, metrics: &ControllerMetrics) -> Response<Full<Bytes>> {
    let (status, body) = match req.uri().path() {
        "/metrics" => match metrics.gather() {
            Ok(text) => (StatusCode::OK, text),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        },
        "/healthz" => (StatusCode::OK, "ok".to_string()),
        _ => (StatusCode::NOT_FOUND, "not found".to_string()),
    };

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
}
