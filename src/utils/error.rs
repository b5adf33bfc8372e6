use crate::domain::model::FailureCause;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Request to {url} failed ({cause}): {message}")]
    TransportError {
        url: String,
        cause: FailureCause,
        message: String,
    },

    #[error("Failed after {attempts} attempts. Last error: {last_error}")]
    RetriesExhaustedError {
        attempts: u32,
        last_error: String,
        cause: Option<FailureCause>,
    },

    #[error("Malformed {resource} response: {message}")]
    MalformedResponseError { resource: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WatchError::TransportError { .. }
            | WatchError::RetriesExhaustedError { .. }
            | WatchError::HttpClientError(_) => ErrorCategory::Network,
            WatchError::MalformedResponseError { .. }
            | WatchError::SerializationError(_) => ErrorCategory::Data,
            WatchError::MissingConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            WatchError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 最後一次傳輸失敗的原因 (若有)
    pub fn failure_cause(&self) -> Option<FailureCause> {
        match self {
            WatchError::TransportError { cause, .. } => Some(*cause),
            WatchError::RetriesExhaustedError { cause, .. } => *cause,
            _ => None,
        }
    }

    /// 重試是否可能有幫助
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WatchError::TransportError { .. } | WatchError::HttpClientError(_) => {
                "Check network connectivity and that the endpoint is reachable"
            }
            WatchError::RetriesExhaustedError { .. } => {
                "The endpoint and every relay failed; try again later or configure other relays"
            }
            WatchError::MalformedResponseError { .. } | WatchError::SerializationError(_) => {
                "Verify that the source returns the expected JSON document"
            }
            WatchError::MissingConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::ConfigValidationError { .. } => {
                "Fix the configuration file or command-line flags and rerun"
            }
            WatchError::IoError(_) => "Check that the output directory is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WatchError::RetriesExhaustedError { attempts, .. } => {
                format!("Could not reach the data source after {} attempts", attempts)
            }
            WatchError::MalformedResponseError { resource, .. } => {
                format!("The {} data could not be read", resource)
            }
            WatchError::IoError(e) => format!("File system error: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_exhausted_message_names_last_error() {
        let err = WatchError::RetriesExhaustedError {
            attempts: 3,
            last_error: "connection refused".to_string(),
            cause: Some(FailureCause::Connect),
        };
        assert_eq!(
            err.to_string(),
            "Failed after 3 attempts. Last error: connection refused"
        );
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_retryable());
        assert_eq!(err.failure_cause(), Some(FailureCause::Connect));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = WatchError::MissingConfigError {
            field: "sources.directory".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = WatchError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("denied"));
    }
}
