//! Scraping-service job API and its Apify actor-run client.
//!
//! The core relies only on the three-operation shape of [`ScrapeService`]:
//! start a job, check its status, fetch its results.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ScraperConfig;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Handle to a remote job, returned on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
    /// Where the job's result set can be fetched from (a dataset id).
    pub result_location: String,
}

/// Remote job lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Succeeded,
    Failed,
    Aborted,
    TimedOut,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
            Self::TimedOut => "TIMED_OUT",
        }
    }

    /// Map a remote status string. Transitional and unknown states count as running.
    pub fn from_remote(status: &str) -> Self {
        match status.to_ascii_uppercase().replace('-', "_").as_str() {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "ABORTED" => Self::Aborted,
            "TIMED_OUT" => Self::TimedOut,
            _ => Self::Running,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal job API of an external scraping service.
#[async_trait]
pub trait ScrapeService: Send + Sync {
    async fn start_job(&self, target_reference: &str) -> Result<JobHandle, ScrapeError>;

    async fn get_status(&self, job_id: &str) -> Result<JobStatus, ScrapeError>;

    async fn fetch_results(
        &self,
        result_location: &str,
    ) -> Result<Vec<serde_json::Value>, ScrapeError>;
}

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    data: RunData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunData {
    id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    default_dataset_id: String,
}

/// Apify actor-run client (`POST /acts/{actor}/runs`, `GET /actor-runs/{id}`,
/// `GET /datasets/{id}/items`).
pub struct ApifyClient {
    http_client: reqwest::Client,
    base_url: String,
    actor_id: String,
    api_token: String,
}

impl ApifyClient {
    pub fn new(config: &ScraperConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build scraper HTTP client")?;

        if config.api_token.is_empty() {
            tracing::warn!("no scraper API token configured (set APIFY_API_TOKEN)");
        }

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            actor_id: config.actor_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header(header::AUTHORIZATION, format!("Bearer {}", self.api_token))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ScrapeError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(ScrapeError::Api(status.as_u16(), body));
        }
        serde_json::from_str(&body).map_err(|e| ScrapeError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ScrapeService for ApifyClient {
    async fn start_job(&self, target_reference: &str) -> Result<JobHandle, ScrapeError> {
        let url = format!("{}/acts/{}/runs", self.base_url, self.actor_id);
        let input = serde_json::json!({ "profileUrls": [target_reference] });

        let response = self
            .authorized(self.http_client.post(url))
            .json(&input)
            .send()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        let run: RunEnvelope = Self::read_json(response).await?;
        Ok(JobHandle {
            job_id: run.data.id,
            result_location: run.data.default_dataset_id,
        })
    }

    async fn get_status(&self, job_id: &str) -> Result<JobStatus, ScrapeError> {
        let url = format!("{}/actor-runs/{}", self.base_url, job_id);
        let response = self
            .authorized(self.http_client.get(url))
            .send()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        let run: RunEnvelope = Self::read_json(response).await?;
        Ok(JobStatus::from_remote(&run.data.status))
    }

    async fn fetch_results(
        &self,
        result_location: &str,
    ) -> Result<Vec<serde_json::Value>, ScrapeError> {
        let url = format!("{}/datasets/{}/items", self.base_url, result_location);
        let response = self
            .authorized(self.http_client.get(url))
            .send()
            .await
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        Self::read_json(response).await
    }
}
