use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error(
        "API key not found for {provider}. Set {env_var} environment variable or add to config."
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error("Rate limit exceeded{}", .retry_after.map(|s| format!(". Retry after {} seconds", s)).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("Server overloaded (HTTP 503): {message}")]
    ServerOverloaded { message: String },

    #[error("API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("{provider} returned no content")]
    EmptyResponse { provider: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid model preset: {0}")]
    InvalidPreset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl LlmError {
    /// Whether the provider asked us to slow down (quota or rate limit)
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
            || matches!(self, Self::ApiError { status_code: Some(429), .. })
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_display() {
        let err = LlmError::RateLimited {
            retry_after: Some(30),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded. Retry after 30 seconds");

        let err = LlmError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_is_rate_limit() {
        assert!(LlmError::RateLimited { retry_after: None }.is_rate_limit());
        assert!(
            LlmError::ApiError {
                message: "quota".into(),
                status_code: Some(429),
            }
            .is_rate_limit()
        );
        assert!(
            !LlmError::ServerOverloaded {
                message: "busy".into(),
            }
            .is_rate_limit()
        );
    }
}
