//! HTTP client for the pairing and sync endpoints
//!
//! The remote surface is a trait so orchestration code depends on the seam
//! rather than on the transport; tests substitute in-memory implementations.

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::config::Config;

use super::error::{self, ApiError};
use super::models::{JobId, PairRequest, Pairing, SyncJobStatus};

/// Remote surface consumed by the orchestration layer
#[async_trait]
pub trait BridgeApi: Send + Sync {
    /// List all pairings known to the remote system
    async fn list_pairings(&self) -> Result<Vec<Pairing>, ApiError>;

    /// Create a target project and pair it with the source project
    ///
    /// Fails with [`ApiError::Conflict`] when a target project with that
    /// identity already exists.
    async fn create_project(&self, request: &PairRequest) -> Result<(), ApiError>;

    /// Pair the source project onto an existing target project
    async fn pair_project(&self, request: &PairRequest) -> Result<(), ApiError>;

    /// Remove the pairing of a target project
    async fn unpair_project(&self, target_name: &str) -> Result<(), ApiError>;

    /// Trigger a sync job for a paired target project
    ///
    /// The response body is the opaque job id.
    async fn launch_sync(&self, target_name: &str) -> Result<JobId, ApiError>;

    /// Fetch the current status of a sync job
    async fn fetch_job(&self, id: &JobId) -> Result<SyncJobStatus, ApiError>;
}

/// reqwest-backed implementation of [`BridgeApi`]
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl BridgeClient {
    /// Create a client for the configured remote
    pub fn new(config: &Config) -> Self {
        BridgeClient {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with the bearer credential and a correlation id
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let correlation_id = Uuid::new_v4();
        let response = request
            .bearer_auth(&self.token)
            .header("x-correlation-id", correlation_id.to_string())
            .send()
            .await?;

        debug!(
            "[{}] {} -> {}",
            correlation_id,
            response.url(),
            response.status()
        );
        Ok(response)
    }

    /// Convert a non-success response into the error taxonomy
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error::error_from_response(status, &body))
    }
}

#[async_trait]
impl BridgeApi for BridgeClient {
    async fn list_pairings(&self) -> Result<Vec<Pairing>, ApiError> {
        let response = self
            .send(self.http.get(self.url("/projects/pair")))
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn create_project(&self, request: &PairRequest) -> Result<(), ApiError> {
        let response = self
            .send(self.http.post(self.url("/projects")).json(request))
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn pair_project(&self, request: &PairRequest) -> Result<(), ApiError> {
        let response = self
            .send(self.http.post(self.url("/projects/pair")).json(request))
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn unpair_project(&self, target_name: &str) -> Result<(), ApiError> {
        let path = format!("/projects/{}/pair", urlencoding::encode(target_name));
        let response = self.send(self.http.delete(self.url(&path))).await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn launch_sync(&self, target_name: &str) -> Result<JobId, ApiError> {
        let path = format!("/projects/{}/sync", urlencoding::encode(target_name));
        let response = self.send(self.http.post(self.url(&path))).await?;
        let response = Self::check(response).await?;

        // The launch endpoint returns the job id as a bare JSON string
        let id: String = response.json().await?;
        Ok(JobId::new(id))
    }

    async fn fetch_job(&self, id: &JobId) -> Result<SyncJobStatus, ApiError> {
        let path = format!("/events/{}", urlencoding::encode(id.as_str()));
        let response = self.send(self.http.get(self.url(&path))).await?;

        // A missing event means the id is stale or never existed
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::UnknownJob(id.clone()));
        }

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> BridgeClient {
        BridgeClient::new(&Config {
            base_url: base_url.to_string(),
            token: "secret".to_string(),
        })
    }

    #[test]
    fn test_url_building_strips_trailing_slash() {
        let client = test_client("http://localhost:5000/api/addon/");
        assert_eq!(
            client.url("/projects/pair"),
            "http://localhost:5000/api/addon/projects/pair"
        );
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let encoded = format!("/projects/{}/sync", urlencoding::encode("My Show/2"));
        assert_eq!(encoded, "/projects/My%20Show%2F2/sync");
    }
}
