//! Shared LLM client library for the cli-programs workspace
//!
//! Provides a unified completion interface over several providers:
//! - Google Gemini (generateContent API)
//! - Anthropic API (direct)
//! - OpenRouter (OpenAI-compatible chat completions)
//! - A scriptable mock for tests

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::{Config, ModelPreset, ProviderConfig};
pub use error::{LlmError, Result};
pub use provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};
pub use providers::mock::MockReply;
pub use providers::{MockProvider, ProviderKind, get_provider};
