use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::advisory::prompts;
use crate::advisory::provider::{tidy_tip, ModelInfo, TipContext, TipError, TipProvider};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const MAX_OUTPUT_TOKENS: u32 = 256;
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Client for the Google Generative Language API.
///
/// One attempt per request inside a bounded timeout; there is no retry
/// loop because the caller substitutes a fallback tip on any failure.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    async fn send_request(&self, prompt: &str) -> Result<String, TipError> {
        if self.api_key.is_empty() {
            return Err(TipError::MissingApiKey);
        }

        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);
        let request_body = GeminiRequest {
            system_instruction: Instruction {
                parts: vec![Part {
                    text: prompts::SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TipError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GeminiResponse = response
            .json()
            .await
            .map_err(|e| TipError::ParseError(format!("Failed to parse JSON: {}", e)))?;

        extract_reply_text(&reply).ok_or(TipError::EmptyReply)
    }
}

#[async_trait]
impl TipProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn circuit_tip(&self, context: &TipContext) -> Result<String, TipError> {
        let prompt = prompts::build_tip_prompt(context);
        let response_text = self.send_request(&prompt).await?;
        tidy_tip(&response_text).ok_or(TipError::EmptyReply)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "gemini".to_string(),
            model_name: self.model.clone(),
            is_local: false,
        }
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_reply_text(response: &GeminiResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let text: String = candidate
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Instruction,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Instruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
