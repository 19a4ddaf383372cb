//! Tip router.
//!
//! Routes tip requests to the preferred available provider and absorbs every
//! failure at this boundary: callers always get a tip string back, falling
//! back to a fixed sentence when no provider can answer.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::advisory::gemini::GeminiClient;
use crate::advisory::ollama::OllamaClient;
use crate::advisory::provider::{ModelInfo, ProviderStatus, TipContext, TipError, TipProvider};

/// Deterministic substitute used whenever no provider can produce a tip.
pub const FALLBACK_TIP: &str = "Remember: adding a resistor to a parallel circuit \
always lowers the total resistance.";

/// Where a tip came from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TipSource {
    /// A provider answered; carries the provider name.
    Provider(String),
    /// The fixed fallback sentence was substituted.
    Fallback,
}

/// A resolved tip. Resolution never fails; `source` records whether a
/// provider answered or the fallback was substituted.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TipReply {
    pub text: String,
    pub source: TipSource,
}

impl TipReply {
    pub fn is_fallback(&self) -> bool {
        self.source == TipSource::Fallback
    }

    fn fallback() -> Self {
        Self {
            text: FALLBACK_TIP.to_string(),
            source: TipSource::Fallback,
        }
    }
}

/// Router that manages the configured tip providers
pub struct TipRouter {
    gemini_client: Option<Arc<GeminiClient>>,
    ollama_client: Option<Arc<OllamaClient>>,
    preferred_provider: RwLock<String>,
}

impl TipRouter {
    /// An empty router. Until a provider is configured every resolution
    /// returns the fallback tip.
    pub fn new() -> Self {
        Self {
            gemini_client: None,
            ollama_client: None,
            preferred_provider: RwLock::new("gemini".to_string()),
        }
    }

    /// Build a router from the environment: `GEMINI_API_KEY` enables the
    /// Gemini client, and a default Ollama client is always registered.
    pub fn from_env() -> Self {
        let mut router = Self::new();
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            router.set_gemini_api_key(key);
        }
        router.set_ollama_config(None, None);
        router
    }

    /// Configure the Gemini client with an API key
    pub fn set_gemini_api_key(&mut self, key: String) {
        if !key.is_empty() {
            self.gemini_client = Some(Arc::new(GeminiClient::new(key)));
        } else {
            self.gemini_client = None;
        }
    }

    /// Register an Ollama client, replacing any previous configuration.
    pub fn set_ollama_config(&mut self, url: Option<String>, model: Option<String>) {
        self.ollama_client = Some(Arc::new(OllamaClient::new(url, model)));
    }

    /// Name the provider to try first; the other remains as a fallback.
    pub async fn set_preferred_provider(&self, provider: &str) {
        let mut pref = self.preferred_provider.write().await;
        *pref = provider.to_string();
    }

    pub async fn get_preferred_provider(&self) -> String {
        self.preferred_provider.read().await.clone()
    }

    /// Pick a provider, honoring the preference when that provider can
    /// actually answer.
    pub async fn get_provider(&self) -> Option<Arc<dyn TipProvider>> {
        let preferred = self.preferred_provider.read().await.clone();

        match preferred.as_str() {
            "ollama" => {
                if let Some(ref client) = self.ollama_client {
                    if client.is_available().await {
                        return Some(client.clone() as Arc<dyn TipProvider>);
                    }
                }
                if let Some(ref client) = self.gemini_client {
                    return Some(client.clone() as Arc<dyn TipProvider>);
                }
            }
            _ => {
                if let Some(ref client) = self.gemini_client {
                    return Some(client.clone() as Arc<dyn TipProvider>);
                }
                if let Some(ref client) = self.ollama_client {
                    if client.is_available().await {
                        return Some(client.clone() as Arc<dyn TipProvider>);
                    }
                }
            }
        }

        None
    }

    /// Fetch a tip, propagating provider errors. Used internally and by
    /// callers that want to distinguish failure modes.
    pub async fn try_circuit_tip(&self, context: &TipContext) -> Result<TipReply, TipError> {
        let provider = self.get_provider().await.ok_or(TipError::MissingApiKey)?;

        tracing::info!("Using tip provider: {}", provider.name());
        let text = provider.circuit_tip(context).await?;
        Ok(TipReply {
            text,
            source: TipSource::Provider(provider.name().to_string()),
        })
    }

    /// Fetch a tip, absorbing every failure. The calculation path and the
    /// renderer never see an error from this call.
    pub async fn resolve_tip(&self, context: &TipContext) -> TipReply {
        match self.try_circuit_tip(context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Tip request failed, substituting fallback: {}", e);
                TipReply::fallback()
            }
        }
    }

    /// Snapshot of provider configuration and reachability.
    pub async fn get_status(&self) -> ProviderStatus {
        let preferred = self.preferred_provider.read().await.clone();

        let gemini_configured = self.gemini_client.is_some();

        let ollama_available = if let Some(ref client) = self.ollama_client {
            client.is_available().await
        } else {
            false
        };

        let ollama_models = if let Some(ref client) = self.ollama_client {
            client.list_models().await.unwrap_or_default()
        } else {
            vec![]
        };

        let active_provider = self.get_provider().await.map(|p| p.name().to_string());

        ProviderStatus {
            gemini_configured,
            ollama_available,
            ollama_models,
            preferred,
            active_provider,
        }
    }

    /// Model info for whichever provider would answer the next request.
    pub async fn get_model_info(&self) -> Option<ModelInfo> {
        self.get_provider().await.map(|p| p.model_info())
    }

    /// True when some provider would answer (the fallback is still possible
    /// if that provider then errors).
    pub async fn has_provider(&self) -> bool {
        self.get_provider().await.is_some()
    }
}

impl Default for TipRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Topology;

    fn context() -> TipContext {
        TipContext {
            topology: Topology::Series,
            element_count: 2,
            total_resistance: 30.0,
        }
    }

    #[tokio::test]
    async fn test_router_no_providers() {
        let router = TipRouter::new();
        assert!(router.get_provider().await.is_none());
        assert!(!router.has_provider().await);
    }

    #[tokio::test]
    async fn test_router_with_gemini() {
        let mut router = TipRouter::new();
        router.set_gemini_api_key("test-key".to_string());

        let provider = router.get_provider().await;
        assert!(provider.is_some());
        assert_eq!(provider.unwrap().name(), "gemini");
    }

    #[tokio::test]
    async fn test_preferred_provider() {
        let router = TipRouter::new();

        router.set_preferred_provider("ollama").await;
        assert_eq!(router.get_preferred_provider().await, "ollama");

        router.set_preferred_provider("gemini").await;
        assert_eq!(router.get_preferred_provider().await, "gemini");
    }

    #[tokio::test]
    async fn no_provider_resolves_to_the_fallback() {
        let router = TipRouter::new();
        let reply = router.resolve_tip(&context()).await;
        assert!(reply.is_fallback());
        assert_eq!(reply.text, FALLBACK_TIP);
    }

    #[tokio::test]
    async fn resolution_is_deterministic_without_providers() {
        let router = TipRouter::new();
        let a = router.resolve_tip(&context()).await;
        let b = router.resolve_tip(&context()).await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_status() {
        let mut router = TipRouter::new();
        router.set_gemini_api_key("test-key".to_string());

        let status = router.get_status().await;
        assert!(status.gemini_configured);
        assert_eq!(status.active_provider.as_deref(), Some("gemini"));
    }
}
