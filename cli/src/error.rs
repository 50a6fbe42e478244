use engine::ThemeError;
use thiserror::Error;

/// Errors surfaced by the `wakfu-theme` command line.
///
/// Engine failures are wrapped unchanged; everything else describes a
/// problem with what the user asked for or with the local setup.
///
/// # Error Categories
///
/// ## Setup Errors
/// - [`Config`] - Configuration could not be loaded or is invalid
///
/// ## Engine Errors
/// - [`Theme`] - Loading or resolving the theme failed
///
/// ## Request Errors
/// - [`InvalidColor`] - A color argument is not `#RRGGBB` or `#RRGGBBAA`
/// - [`NotFound`] - The theme has no record with the requested id
/// - [`Output`] - Writing the command result failed
///
/// [`Config`]: AppError::Config
/// [`Theme`]: AppError::Theme
/// [`InvalidColor`]: AppError::InvalidColor
/// [`NotFound`]: AppError::NotFound
/// [`Output`]: AppError::Output
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("Invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Hint printed below the error, when there is something to suggest.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            AppError::Theme(e) if e.is_retryable() => {
                Some("Check your network connection and try again.")
            }
            AppError::Theme(ThemeError::MalformedPath { .. }) => {
                Some("The theme descriptor has an unexpected layout; check content_root.")
            }
            AppError::Config(_) => Some("Please check your config.toml file."),
            _ => None,
        }
    }
}

/// Result type alias for command operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use engine::FetchError;

    #[test]
    fn test_theme_errors_are_transparent() {
        let error = AppError::from(ThemeError::Fetch(FetchError::Status {
            url: "https://cdn.test/theme/theme.json".to_string(),
            status: 503,
        }));
        assert_eq!(
            error.to_string(),
            ThemeError::Fetch(FetchError::Status {
                url: "https://cdn.test/theme/theme.json".to_string(),
                status: 503,
            })
            .to_string()
        );
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_missing_descriptor_gets_no_retry_hint() {
        let error = AppError::from(ThemeError::Fetch(FetchError::Status {
            url: "https://cdn.test/theme/theme.json".to_string(),
            status: 404,
        }));
        assert!(error.suggestion().is_none());
    }

    #[test]
    fn test_not_found_message() {
        let error = AppError::NotFound {
            kind: "color",
            id: "c9".to_string(),
        };
        assert_eq!(error.to_string(), "No color with id 'c9'");
        assert!(error.suggestion().is_none());
    }
}
