//! Error types for the Sitecoord client

use thiserror::Error;

/// How a failure is surfaced to the person driving the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport or HTTP failure; shown as a transient notification, never retried
    Network,
    /// Caught before submission; the request is never sent
    Validation,
    /// Scheduling overlap that blocks the action
    Conflict,
    Internal,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Http(_) | AppError::Api { .. } | AppError::NotFound(_) => ErrorCategory::Network,
            AppError::Validation(_) | AppError::InvalidState(_) => ErrorCategory::Validation,
            AppError::Conflict(_) => ErrorCategory::Conflict,
            AppError::Config(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Short message suitable for a notification toast
    pub fn user_message(&self) -> String {
        match self {
            AppError::Http(_) => "Could not reach the server".to_string(),
            AppError::Api { message, .. } => message.clone(),
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::InvalidState(msg) => msg.clone(),
            AppError::Config(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                "Something went wrong".to_string()
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    struct CountEvents(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CountEvents {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_categories() {
        let api = AppError::Api { status: 500, message: "boom".into() };
        assert_eq!(api.category(), ErrorCategory::Network);
        assert_eq!(AppError::Validation("x".into()).category(), ErrorCategory::Validation);
        assert_eq!(AppError::Conflict("x".into()).category(), ErrorCategory::Conflict);
        assert_eq!(AppError::Internal("x".into()).category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_api_message_is_passed_through() {
        let err = AppError::Api { status: 409, message: "Equipment already moving".into() };
        assert_eq!(err.user_message(), "Equipment already moving");
        assert_eq!(err.to_string(), "API error (409): Equipment already moving");
    }

    #[test]
    fn test_user_message_does_not_log() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountEvents(count.clone()));
        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(AppError::Internal("db".into()).user_message(), "Something went wrong");
            assert_eq!(AppError::Conflict("taken".into()).user_message(), "taken");
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
