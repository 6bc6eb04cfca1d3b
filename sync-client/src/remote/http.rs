//! HTTP remote backed by reqwest.
//!
//! Issues `GET {base_url}{users_path}` and decodes a JSON array of user
//! records. A request that exceeds the configured timeout fails with
//! [`RemoteError::Timeout`] instead of hanging.

use super::{RemoteDataSource, RemoteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use userlist_sync_types::{Snapshot, UserRecord};

/// Configuration for [`HttpRemote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRemoteConfig {
    /// Base URL of the API (default: `https://jsonplaceholder.typicode.com`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the "list users" resource (default: `/users`).
    #[serde(default = "default_users_path")]
    pub users_path: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_users_path() -> String {
    "/users".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpRemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            users_path: default_users_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpRemoteConfig {
    /// Full URL of the users resource.
    pub fn users_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.users_path.trim_start_matches('/')
        )
    }
}

/// Remote data source speaking plain HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    url: String,
}

impl HttpRemote {
    /// Build a remote with its own HTTP client.
    pub fn new(config: &HttpRemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: config.users_url(),
        })
    }

    /// The URL fetched by this remote.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn classify(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else if e.is_decode() {
        RemoteError::Decode(e.to_string())
    } else {
        RemoteError::Transport(e.to_string())
    }
}

#[async_trait]
impl RemoteDataSource for HttpRemote {
    async fn fetch(&self) -> Result<Snapshot, RemoteError> {
        tracing::debug!(url = %self.url, "fetching user list");

        let response = self.client.get(&self.url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                code: status.as_u16(),
            });
        }

        let records: Vec<UserRecord> = response.json().await.map_err(classify)?;
        Ok(Snapshot::capture(records))
    }
}
