//! Tip provider trait.
//!
//! Defines a common interface for study-tip providers (Gemini, Ollama, etc.)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::circuit::Topology;

/// Snapshot of the circuit state handed to a provider.
///
/// This is the entire coupling between the calculation path and the advisory
/// boundary: topology, element count, and the computed total resistance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipContext {
    pub topology: Topology,
    pub element_count: usize,
    pub total_resistance: f64,
}

impl TipContext {
    /// The pair of fields whose change triggers a fresh tip request.
    pub fn refresh_key(&self) -> (Topology, usize) {
        (self.topology, self.element_count)
    }
}

/// Information about a tip provider's model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider name (e.g., "gemini", "ollama")
    pub provider: String,

    /// Model name (e.g., "gemini-3-flash-preview", "llama3.1:8b")
    pub model_name: String,

    /// True for models served from the local machine
    pub is_local: bool,
}

#[derive(Debug, Error)]
pub enum TipError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Missing API key or no provider available")]
    MissingApiKey,
    #[error("Provider returned an empty reply")]
    EmptyReply,
}

/// Common trait for all tip providers
#[async_trait]
pub trait TipProvider: Send + Sync {
    /// Short provider name, used in logs and in [`TipSource`].
    ///
    /// [`TipSource`]: crate::advisory::router::TipSource
    fn name(&self) -> &str;

    /// Whether the provider is configured and reachable right now.
    async fn is_available(&self) -> bool;

    /// Produce one short study tip for the given circuit state
    async fn circuit_tip(&self, context: &TipContext) -> Result<String, TipError>;

    /// Describes the model backing this provider.
    fn model_info(&self) -> ModelInfo;
}

/// Status of tip providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub gemini_configured: bool,
    pub ollama_available: bool,
    pub ollama_models: Vec<String>,
    pub preferred: String,
    pub active_provider: Option<String>,
}

impl Default for ProviderStatus {
    fn default() -> Self {
        Self {
            gemini_configured: false,
            ollama_available: false,
            ollama_models: vec![],
            preferred: "gemini".to_string(),
            active_provider: None,
        }
    }
}

/// Reduce a raw model reply to a single presentable line: first non-empty
/// line, stripped of surrounding whitespace and quote marks.
pub(crate) fn tidy_tip(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tidy_takes_the_first_meaningful_line() {
        let raw = "\n\n  \"Current is the same everywhere in a series loop.\"  \nExtra line";
        assert_eq!(
            tidy_tip(raw).unwrap(),
            "Current is the same everywhere in a series loop."
        );
    }

    #[test]
    fn tidy_rejects_blank_replies() {
        assert!(tidy_tip("").is_none());
        assert!(tidy_tip("   \n \t\n").is_none());
        assert!(tidy_tip("\"\"").is_none());
    }

    #[test]
    fn refresh_key_ignores_total_resistance() {
        let a = TipContext {
            topology: Topology::Series,
            element_count: 3,
            total_resistance: 30.0,
        };
        let b = TipContext {
            total_resistance: 60.0,
            ..a.clone()
        };
        assert_eq!(a.refresh_key(), b.refresh_key());
    }
}
