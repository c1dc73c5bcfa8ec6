//! Controller configuration

use anyhow::{Context, Result};
use netparams_gce::GceConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Environment variable naming the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "NETPARAMS_CONFIG";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Compute API settings
    #[serde(default)]
    pub cloud: GceConfig,

    /// Address the metrics endpoint listens on
    #[serde(default = "default_metrics_addr")]
    pub metrics_addr: SocketAddr,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Periodic resync of each parameter set (seconds)
    #[serde(default = "default_requeue")]
    pub requeue_seconds: u64,

    /// Retry delay after a failed reconcile (seconds)
    #[serde(default = "default_error_requeue")]
    pub error_requeue_seconds: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            cloud: GceConfig::default(),
            metrics_addr: default_metrics_addr(),
            log_format: LogFormat::default(),
            requeue_seconds: default_requeue(),
            error_requeue_seconds: default_error_requeue(),
        }
    }
}

impl ControllerConfig {
    /// Load from the file named by `NETPARAMS_CONFIG` (defaults otherwise),
    /// then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.cloud.validate()?;
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(project) = var("GCE_PROJECT_ID") {
            self.cloud.project_id = project;
        }
        if let Some(region) = var("GCE_REGION") {
            self.cloud.region = region;
        }
        if let Some(token) = var("GCE_ACCESS_TOKEN") {
            self.cloud.access_token = Some(token);
        }
    }

    pub fn requeue(&self) -> Duration {
        Duration::from_secs(self.requeue_seconds)
    }

    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_seconds)
    }
}

fn default_metrics_addr() -> SocketAddr {
    ([0, 0, 0, 0], 9090).into()
}

fn default_requeue() -> u64 {
    300
}

fn default_error_requeue() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_yaml() {
        let config = ControllerConfig::from_yaml(
            r#"
cloud:
  projectId: service-project
  networkProjectId: host-project
  region: europe-west1
  networkUrl: projects/host-project/global/networks/shared
metricsAddr: 127.0.0.1:9100
logFormat: json
requeueSeconds: 120
"#,
        )
        .unwrap();

        assert_eq!(config.cloud.project_id, "service-project");
        assert!(config.cloud.on_xpn());
        assert_eq!(config.metrics_addr, "127.0.0.1:9100".parse().unwrap());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.requeue(), Duration::from_secs(120));
        assert_eq!(config.error_requeue(), Duration::from_secs(60));
    }

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::from_yaml("{}").unwrap();

        assert_eq!(config.metrics_addr, default_metrics_addr());
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.requeue_seconds, 300);
        assert_eq!(config.cloud.network_name, "default");
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            ("GCE_PROJECT_ID", "p1"),
            ("GCE_REGION", "us-central1"),
        ]);
        let mut config = ControllerConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.cloud.project_id, "p1");
        assert_eq!(config.cloud.region, "us-central1");
        assert_eq!(config.cloud.access_token, None);
        assert!(config.cloud.validate().is_ok());
    }
}
