//! Local tip generation through an Ollama daemon.
//!
//! Availability is probed via `/api/tags`; tips come from a single
//! non-streaming `/api/generate` call.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::advisory::prompts;
use crate::advisory::provider::{tidy_tip, ModelInfo, TipContext, TipError, TipProvider};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.1:8b";
const REQUEST_TIMEOUT_SECS: u64 = 30;

// Sampling settings tuned for short, repeatable one-liners.
const TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;
const NUM_PREDICT: i32 = 120;

/// Client for a local Ollama daemon.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// `None` arguments fall back to the local daemon URL and the default
    /// model.
    pub fn new(base_url: Option<String>, model: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// True when the daemon answers and reports the configured model.
    pub async fn health_check(&self) -> Result<bool, TipError> {
        let response = match self.client.get(self.endpoint("tags")).send().await {
            Ok(r) if r.status().is_success() => r,
            _ => return Ok(false), // daemon offline or unhappy
        };
        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| TipError::ParseError(e.to_string()))?;
        let known = tags.models.iter().any(|m| {
            // Tag names may carry a ":latest" suffix either side lacks.
            m.name.starts_with(&self.model) || self.model.starts_with(&m.name)
        });
        Ok(known)
    }

    /// Model names the daemon reports via `/api/tags`.
    pub async fn list_models(&self) -> Result<Vec<String>, TipError> {
        let response = self.client.get(self.endpoint("tags")).send().await?;
        if !response.status().is_success() {
            return Err(TipError::ApiError {
                status: response.status().as_u16(),
                message: "Failed to list models".to_string(),
            });
        }
        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| TipError::ParseError(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// One non-streaming completion via `/api/generate`.
    pub async fn generate(&self, prompt: &str) -> Result<String, TipError> {
        tracing::debug!("Requesting Ollama completion from {}", self.model);

        let response = self
            .client
            .post(self.endpoint("generate"))
            .json(&GenerateRequest {
                model: &self.model,
                system: prompts::SYSTEM_INSTRUCTION,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature: TEMPERATURE,
                    num_predict: NUM_PREDICT,
                    top_p: TOP_P,
                },
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TipError::ApiError { status, message });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TipError::ParseError(e.to_string()))?;
        Ok(reply.response)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
impl TipProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    async fn circuit_tip(&self, context: &TipContext) -> Result<String, TipError> {
        let prompt = prompts::build_tip_prompt(context);
        let raw = self.generate(&prompt).await?;
        tidy_tip(&raw).ok_or(TipError::EmptyReply)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "ollama".to_string(),
            model_name: self.model.clone(),
            is_local: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: i32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<TaggedModel>,
}

#[derive(Debug, Deserialize)]
struct TaggedModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Topology;

    #[test]
    fn request_carries_the_system_instruction() {
        let prompt = prompts::build_tip_prompt(&TipContext {
            topology: Topology::Series,
            element_count: 2,
            total_resistance: 30.0,
        });
        let request = GenerateRequest {
            model: DEFAULT_MODEL,
            system: prompts::SYSTEM_INSTRUCTION,
            prompt: &prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
                num_predict: NUM_PREDICT,
                top_p: TOP_P,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"system\""));
        assert!(json.contains("series"));
        assert!(json.contains("\"stream\":false"));
    }

    #[test]
    fn response_parses_from_api_shape() {
        let json = r#"{"model":"llama3.1:8b","response":"Series resistance always adds.\n","done":true}"#;
        let reply: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tidy_tip(&reply.response).unwrap(), "Series resistance always adds.");
    }

    #[test]
    fn tags_tolerate_extra_fields() {
        let json = r#"{"models":[{"name":"llama3.1:8b","size":4661224676},{"name":"qwen2:7b"}]}"#;
        let tags: TagsResponse = serde_json::from_str(json).unwrap();
        let names: Vec<_> = tags.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["llama3.1:8b", "qwen2:7b"]);
    }

    #[test]
    fn defaults_point_at_local_ollama() {
        let client = OllamaClient::default();
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.endpoint("tags"), "http://localhost:11434/api/tags");
    }
}
