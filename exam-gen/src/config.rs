//! exam-gen configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::quiz::prompt::DEFAULT_MAX_SOURCE_CHARS;
use crate::quiz::{Difficulty, QuestionType};
use crate::store::FileStore;

const DEFAULT_QUESTION_COUNT: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamGenConfig {
    /// Question type used when --type is not given
    #[serde(default = "default_question_type")]
    pub question_type: QuestionType,

    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,

    /// Questions per selected chapter
    #[serde(default = "default_count")]
    pub count: usize,

    /// Source characters sent to the model per request
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,

    /// Where the published quiz and submissions live. None means the
    /// platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Examiner password; EXAM_GEN_PASSWORD takes precedence
    #[serde(default)]
    pub examiner_password: Option<String>,
}

fn default_question_type() -> QuestionType {
    QuestionType::Mcq
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

fn default_count() -> usize {
    DEFAULT_QUESTION_COUNT
}

fn default_max_source_chars() -> usize {
    DEFAULT_MAX_SOURCE_CHARS
}

impl Default for ExamGenConfig {
    fn default() -> Self {
        Self {
            question_type: default_question_type(),
            difficulty: default_difficulty(),
            count: default_count(),
            max_source_chars: default_max_source_chars(),
            data_dir: None,
            examiner_password: None,
        }
    }
}

impl ExamGenConfig {
    /// Get the config file path: ~/.config/cli-programs/exam-gen.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("exam-gen.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ExamGenConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Configured data directory, or the platform default
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        self.data_dir
            .clone()
            .or_else(FileStore::default_dir)
            .context("Could not determine a data directory; set data_dir in the config")
    }
}
