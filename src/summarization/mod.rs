//! Clients for the pretrained summarization model.
//!
//! The model runs out of process and is reached over HTTP. Two runtimes are supported: a
//! Hugging Face style inference endpoint serving a `summarization` pipeline (the default,
//! which accepts length bounds natively) and a local Ollama runtime driven through a prompt.
//! Both are built once at startup and shared read-only across requests.

use crate::config::{Config, SummarizationProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const OLLAMA_SEED: u64 = 42;

/// Errors surfaced while generating a summary.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider was unreachable or the model is not being served.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the summarization provider for a single chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Chunk text to summarize.
    pub text: String,
    /// Upper bound on the generated length.
    pub max_length: usize,
    /// Lower bound on the generated length.
    pub min_length: usize,
    /// Whether the provider may sample; `false` requests deterministic decoding.
    pub do_sample: bool,
}

/// Interface implemented by summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Produce exactly one summary for the request text.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the summarization client selected by configuration.
pub fn get_summarization_client(
    config: &Config,
) -> Result<Arc<dyn SummarizationClient>, SummarizationClientError> {
    match config.summarization_provider {
        SummarizationProvider::HuggingFace => {
            let base_url = config
                .summarization_url
                .clone()
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_URL.to_string());
            Ok(Arc::new(HuggingFaceSummarizationClient::new(
                base_url,
                config.summarization_api_token.clone(),
            )?))
        }
        SummarizationProvider::Ollama => {
            let base_url = config
                .summarization_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Ok(Arc::new(OllamaSummarizationClient::new(base_url)?))
        }
    }
}

fn build_http_client(user_agent: &str) -> Result<Client, SummarizationClientError> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|error| {
            SummarizationClientError::ProviderUnavailable(format!(
                "failed to construct HTTP client: {error}"
            ))
        })
}

/// Client for endpoints that serve a Hugging Face `summarization` pipeline.
pub struct HuggingFaceSummarizationClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HuggingFaceSummarizationClient {
    /// Create a client for the given base URL and optional bearer token.
    pub fn new(
        base_url: String,
        api_token: Option<String>,
    ) -> Result<Self, SummarizationClientError> {
        Ok(Self {
            http: build_http_client("rusty-digest/summary")?,
            base_url,
            api_token,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            model.trim_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct PipelineSummary {
    summary_text: String,
}

#[async_trait]
impl SummarizationClient for HuggingFaceSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let endpoint = self.endpoint(&request.model);
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "max_length": request.max_length,
                "min_length": request.min_length,
                "do_sample": request.do_sample,
            },
            "options": {
                "wait_for_model": true,
            }
        });

        let mut builder = self.http.post(&endpoint).json(&payload);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|error| {
            SummarizationClientError::ProviderUnavailable(format!(
                "failed to reach summarization endpoint {endpoint}: {error}"
            ))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "{endpoint} returned {status}: {body}"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "{endpoint} returned {status}: {body}"
            )));
        }

        let summaries: Vec<PipelineSummary> = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode summarization response: {error}"
            ))
        })?;

        summaries
            .into_iter()
            .next()
            .map(|summary| summary.summary_text.trim().to_string())
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse(
                    "summarization response contained no summaries".into(),
                )
            })
    }
}

/// Client for a local Ollama runtime.
pub struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
}

impl OllamaSummarizationClient {
    /// Create a client for the given Ollama base URL.
    pub fn new(base_url: String) -> Result<Self, SummarizationClientError> {
        Ok(Self {
            http: build_http_client("rusty-digest/summary")?,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

fn build_prompt(request: &SummarizationRequest) -> String {
    format!(
        "Summarize the following text in a single paragraph of between {} and {} words. \
         Return only the summary.\n\n{}",
        request.min_length, request.max_length, request.text
    )
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let mut options = json!({ "num_predict": request.max_length });
        if !request.do_sample {
            options["temperature"] = json!(0.0);
            options["seed"] = json!(OLLAMA_SEED);
        }
        let payload = json!({
            "model": request.model,
            "prompt": build_prompt(&request),
            "stream": false,
            "options": options,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}
