//! HTTP client for the Compute API

use crate::{GceConfig, GceError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

// Refresh tokens this long before the metadata server says they expire
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(60);

/// ComputeClient wraps a reqwest client with Compute API authentication
pub struct ComputeClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: TokenSource,
}

enum TokenSource {
    Static(String),
    Metadata {
        url: String,
        cached: RwLock<Option<CachedToken>>,
    },
}

struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl ComputeClient {
    /// Create a new Compute API client
    pub fn new(config: &GceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        let tokens = match &config.access_token {
            Some(token) => TokenSource::Static(token.clone()),
            None => TokenSource::Metadata {
                url: config.token_url.clone(),
                cached: RwLock::new(None),
            },
        };

        Ok(Self {
            http,
            endpoint: config.compute_endpoint.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Full URL of a Compute API resource path
    pub fn resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// GET a resource. A 404 is `Ok(None)`; any other non-success status is
    /// an error.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.resource_url(path);
        let token = self.token().await?;

        debug!("GET {}", url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GceError::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }

        Ok(Some(response.json::<T>().await?))
    }

    async fn token(&self) -> Result<String> {
        let (url, cached) = match &self.tokens {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::Metadata { url, cached } => (url, cached),
        };

        if let Some(token) = cached.read().await.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let mut cached = cached.write().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Fetching access token from metadata server");
        let response = self
            .http
            .get(url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GceError::Status {
                status: response.status().as_u16(),
                url: url.clone(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_SLACK);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }
}
