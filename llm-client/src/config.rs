use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{LlmError, Result};

const DEFAULT_PRESET: &str = "gemini-flash";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use when neither --model nor a program default is given
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Per-program default presets (program name -> preset name)
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,

    /// Named model presets for quick access
    #[serde(default = "default_presets")]
    pub presets: BTreeMap<String, ModelPreset>,

    /// Provider-specific configuration
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}

fn default_presets() -> BTreeMap<String, ModelPreset> {
    let mut presets = BTreeMap::new();
    presets.insert(
        DEFAULT_PRESET.to_string(),
        ModelPreset {
            provider: "gemini".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
        },
    );
    presets.insert(
        "anthropic-sonnet".to_string(),
        ModelPreset {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-5".to_string(),
        },
    );
    presets
}

/// A named model configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPreset {
    /// Provider identifier (gemini, anthropic, openrouter)
    pub provider: String,

    /// Model name/identifier for the provider
    pub model: String,
}

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home =
            std::env::var("HOME").map_err(|_| LlmError::ConfigError("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/cli-programs/llm.toml"))
    }

    /// Get a preset by name
    pub fn get_preset(&self, name: &str) -> Result<&ModelPreset> {
        self.presets
            .get(name)
            .ok_or_else(|| LlmError::InvalidPreset(name.to_string()))
    }

    /// Get the default preset name for a specific program
    ///
    /// Falls back to `default_preset` if no program-specific default is set.
    pub fn get_default_for_program(&self, program: &str) -> &str {
        self.defaults
            .get(program)
            .map(String::as_str)
            .unwrap_or(&self.default_preset)
    }

    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            defaults: BTreeMap::new(),
            presets: default_presets(),
            providers: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_preset, "gemini-flash");

        let preset = config.get_preset("gemini-flash").unwrap();
        assert_eq!(preset.provider, "gemini");
        assert_eq!(preset.model, "gemini-1.5-flash-latest");
    }

    #[test]
    fn test_invalid_preset() {
        let config = Config::default();
        assert!(matches!(
            config.get_preset("nonexistent"),
            Err(LlmError::InvalidPreset(_))
        ));
    }

    #[test]
    fn test_empty_file_gets_default_presets() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.default_preset, "gemini-flash");
        assert!(config.presets.contains_key("gemini-flash"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/llm.toml");

        let mut config = Config::default();
        config
            .defaults
            .insert("exam-gen".to_string(), "anthropic-sonnet".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.get_default_for_program("exam-gen"), "anthropic-sonnet");
        assert_eq!(loaded.get_default_for_program("other"), "gemini-flash");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_preset, "gemini-flash");
    }
}
