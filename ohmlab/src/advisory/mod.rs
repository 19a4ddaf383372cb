pub mod gemini;
pub mod ollama;
pub mod prompts;
pub mod provider;
pub mod router;

// Re-export for convenience
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use prompts::{build_tip_prompt, SYSTEM_INSTRUCTION};
pub use provider::{ModelInfo, ProviderStatus, TipContext, TipError, TipProvider};
pub use router::{TipReply, TipRouter, TipSource, FALLBACK_TIP};
