//! Async client for the public random-user directory API.
//!
//! One GET per call, no retries, no auth. Non-2xx responses and transport
//! faults come back as a typed [`FetchError`] so the screen can absorb them.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::domain::UserRecord;
use tracing::debug;
use url::Url;

pub mod error;

pub use error::FetchError;

/// Default public endpoint; returns `size` random profiles per GET.
pub const DEFAULT_ENDPOINT: &str = "https://random-data-api.com/api/users/random_user";

/// Some deployments answer `size=1` with a bare object instead of a
/// one-element array; accept both shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchPayload {
    Many(Vec<UserRecord>),
    One(Box<UserRecord>),
}

impl From<BatchPayload> for Vec<UserRecord> {
    fn from(payload: BatchPayload) -> Self {
        match payload {
            BatchPayload::Many(users) => users,
            BatchPayload::One(user) => vec![*user],
        }
    }
}

pub struct DirectoryClient {
    http: Client,
    endpoint: Url,
}

impl DirectoryClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// Fetches one batch of `count` profiles with a `size={count}` query.
    pub async fn fetch_batch(&self, count: usize) -> Result<Vec<UserRecord>, FetchError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("size", count)])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let payload: BatchPayload = response.json().await.map_err(FetchError::Decode)?;
        let users = Vec::from(payload);
        debug!(requested = count, received = users.len(), "fetched user batch");
        Ok(users)
    }

    /// Fetches a single profile for the add-one action.
    pub async fn fetch_one(&self) -> Result<UserRecord, FetchError> {
        let mut batch = self.fetch_batch(1).await?;
        if batch.is_empty() {
            return Err(FetchError::EmptyBatch);
        }
        Ok(batch.remove(0))
    }

    /// Raw bytes of a remote avatar image, for the image avatar renderer.
    pub async fn fetch_image_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::Transport)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
