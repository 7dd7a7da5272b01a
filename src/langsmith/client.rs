use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::types::{
    Dataset, DatasetCreate, Example, ExampleCreate, Experiment, ExperimentCreate,
    ExperimentUpdate, RunBatch, RunCreate,
};
use crate::config::{LangSmithConfig, RequestConfig};
use crate::error::{LangSmithError, LangSmithResult};

/// Client for interacting with the LangSmith API
#[derive(Clone)]
pub struct LangSmithClient {
    client: Client,
    endpoint: String,
    api_key: String,
    request_config: RequestConfig,
}

impl LangSmithClient {
    /// Create a new LangSmith client
    pub fn new(config: &LangSmithConfig, request_config: RequestConfig) -> LangSmithResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(LangSmithError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(LangSmithError::Http)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            request_config,
        })
    }

    /// Create a dataset
    pub async fn create_dataset(&self, request: DatasetCreate) -> LangSmithResult<Dataset> {
        info!(dataset = %request.name, "Creating LangSmith dataset");
        let dataset: Dataset = self
            .request(Method::POST, "/api/v1/datasets", &[], Some(&request))
            .await?;
        info!(dataset = %dataset.name, id = %dataset.id, "Dataset created");
        Ok(dataset)
    }

    /// Look up a dataset by exact name
    pub async fn find_dataset(&self, name: &str) -> LangSmithResult<Option<Dataset>> {
        let datasets: Vec<Dataset> = self
            .request::<(), _>(Method::GET, "/api/v1/datasets", &[("name", name)], None)
            .await?;
        Ok(datasets.into_iter().find(|d| d.name == name))
    }

    /// Create the dataset, reusing an existing one with the same name
    pub async fn ensure_dataset(&self, request: DatasetCreate) -> LangSmithResult<Dataset> {
        let name = request.name.clone();
        match self.create_dataset(request).await {
            Ok(dataset) => Ok(dataset),
            Err(LangSmithError::Api { status: 409, .. }) => {
                info!(dataset = %name, "Dataset already exists");
                self.find_dataset(&name)
                    .await?
                    .ok_or_else(|| LangSmithError::InvalidResponse {
                        message: format!("dataset '{}' reported as existing but not found", name),
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Upload examples into a dataset
    pub async fn create_examples(
        &self,
        examples: Vec<ExampleCreate>,
    ) -> LangSmithResult<Vec<Example>> {
        info!(count = examples.len(), "Uploading examples");
        self.request(Method::POST, "/api/v1/examples/bulk", &[], Some(&examples))
            .await
    }

    /// Open an experiment session against a dataset
    pub async fn create_experiment(
        &self,
        request: ExperimentCreate,
    ) -> LangSmithResult<Experiment> {
        info!(experiment = %request.name, "Creating LangSmith experiment");
        self.request(Method::POST, "/api/v1/sessions", &[], Some(&request))
            .await
    }

    /// Record completed runs
    pub async fn post_runs(&self, runs: Vec<RunCreate>) -> LangSmithResult<()> {
        if runs.is_empty() {
            return Ok(());
        }
        let count = runs.len();
        let batch = RunBatch { post: runs };
        let _: serde_json::Value = self
            .request(Method::POST, "/api/v1/runs/batch", &[], Some(&batch))
            .await?;
        info!(count, "Runs recorded");
        Ok(())
    }

    /// Mark an experiment as finished
    pub async fn close_experiment(
        &self,
        experiment_id: Uuid,
        update: ExperimentUpdate,
    ) -> LangSmithResult<()> {
        let path = format!("/api/v1/sessions/{}", experiment_id);
        let _: serde_json::Value = self
            .request(Method::PATCH, &path, &[], Some(&update))
            .await?;
        info!(experiment_id = %experiment_id, "Experiment closed");
        Ok(())
    }

    /// Send a request, retrying transient failures with exponential backoff
    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> LangSmithResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.request_config.max_retries {
            if retries > 0 {
                let delay = backoff_delay(self.request_config.retry_delay_ms, retries);
                warn!(
                    path = %path,
                    retry = retries,
                    delay_ms = delay.as_millis(),
                    "Retrying LangSmith request"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();

            match self.execute_request(method.clone(), &url, query, body).await {
                Ok(response) => {
                    debug!(
                        path = %path,
                        latency_ms = start.elapsed().as_millis(),
                        "LangSmith request succeeded"
                    );
                    return Ok(response);
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    error!(
                        path = %path,
                        error = %e,
                        latency_ms = start.elapsed().as_millis(),
                        retry = retries,
                        "LangSmith request failed"
                    );
                    last_error = Some(e);
                    retries += 1;
                }
            }
        }

        Err(LangSmithError::Unavailable {
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
            retries,
        })
    }

    /// Execute a single request (internal)
    async fn execute_request<B, T>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> LangSmithResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method = %method, url = %url, "Calling LangSmith");

        let mut builder = self
            .client
            .request(method, url)
            .header("x-api-key", &self.api_key)
            .query(query);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LangSmithError::Timeout {
                    timeout_ms: self.request_config.timeout_ms,
                }
            } else {
                LangSmithError::Http(e)
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LangSmithError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let text = response.text().await.map_err(LangSmithError::Http)?;
        // Some endpoints answer with an empty body
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };

        serde_json::from_str(text).map_err(|e| LangSmithError::InvalidResponse {
            message: format!("Failed to parse response: {}", e),
        })
    }
}

/// Delay before retry number `retry` (1-based): `retry_delay_ms * 2^(retry - 1)`, saturating.
fn backoff_delay(retry_delay_ms: u64, retry: u32) -> Duration {
    let factor = 2_u64
        .checked_pow(retry.saturating_sub(1))
        .unwrap_or(u64::MAX);
    Duration::from_millis(retry_delay_ms.saturating_mul(factor))
}
