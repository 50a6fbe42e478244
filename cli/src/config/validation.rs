use super::app::AppConfig;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid content_root: {configured} (expected an http(s) URL)")]
    ContentRoot { configured: String },
    #[error("Invalid cache_ttl_seconds: {configured} (min: {min_limit}, max: {max_limit})")]
    CacheTtl {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("Invalid max_concurrent_fetches: {configured} (min: {min_limit}, max: {max_limit})")]
    ConcurrentFetches {
        configured: usize,
        min_limit: usize,
        max_limit: usize,
    },
    #[error("Invalid request_timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    RequestTimeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
}

impl ConfigValidationError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::ContentRoot { configured } => {
                format!(
                    "Content root is not a web address!\n\n\
                    Your configured value: {configured}\n\n\
                    Please update content_root in config.toml to an http:// or https:// URL."
                )
            }
            ConfigValidationError::CacheTtl {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Cache TTL out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update cache_ttl_seconds in config.toml to a value between {min_limit} and {max_limit}."
                )
            }
            ConfigValidationError::ConcurrentFetches {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Concurrent fetch limit out of range!\n\n\
                    Your configured value: {configured}\n\
                    Valid range: {min_limit} - {max_limit}\n\n\
                    Please update max_concurrent_fetches in config.toml."
                )
            }
            ConfigValidationError::RequestTimeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Request timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update request_timeout_secs in config.toml."
                )
            }
        }
    }
}

/// Configuration loading result
#[derive(Debug)]
pub enum ConfigLoadResult {
    Success(Box<AppConfig>),
    LoadError(String),
    DeserializeError(String),
    ValidationError(Vec<ConfigValidationError>),
}

impl ConfigLoadResult {
    /// A single message suitable for the terminal, or the configuration.
    pub fn into_result(self) -> Result<AppConfig, String> {
        match self {
            ConfigLoadResult::Success(config) => Ok(*config),
            ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => Err(msg),
            ConfigLoadResult::ValidationError(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
                Err(format!(
                    "Configuration validation failed:\n{}",
                    messages.join("\n\n")
                ))
            }
        }
    }
}
