//! Provider selection for exam-gen on top of the shared llm-client config.

use anyhow::{Context, Result};
use llm_client::{Config, LlmProvider, get_provider};

pub const PROGRAM_NAME: &str = "exam-gen";

/// Build the provider for `preset_name`, or the configured default
pub fn connect(preset_name: Option<&str>) -> Result<Box<dyn LlmProvider>> {
    let config = Config::load().context("Failed to load LLM configuration")?;

    let preset_name = preset_name.unwrap_or_else(|| config.get_default_for_program(PROGRAM_NAME));
    let preset = config
        .get_preset(preset_name)
        .with_context(|| format!("Unknown preset: {}", preset_name))?;

    let provider_config = config.get_provider_config(&preset.provider);
    let provider = get_provider(preset, provider_config).with_context(|| {
        format!(
            "Failed to initialize provider '{}' for preset '{}'",
            preset.provider, preset_name
        )
    })?;

    log::info!(
        "Using LLM provider: {} (model: {})",
        provider.name(),
        preset.model
    );
    Ok(provider)
}
