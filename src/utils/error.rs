use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecomposeError {
    #[error("Docker daemon request failed: {0}")]
    DockerError(#[from] bollard::errors::Error),

    #[error("Docker API returned {status} for {endpoint}: {message}")]
    DockerApiError {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
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
    DataSource,
    Configuration,
    Serialization,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RecomposeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RecomposeError::DockerError(_) => ErrorCategory::Network,
            RecomposeError::DockerApiError { .. } => ErrorCategory::DataSource,
            RecomposeError::IoError(_) => ErrorCategory::Storage,
            RecomposeError::JsonError(_) | RecomposeError::YamlError(_) => {
                ErrorCategory::Serialization
            }
            RecomposeError::ConfigError { .. }
            | RecomposeError::MissingConfigError { .. }
            | RecomposeError::InvalidConfigValueError { .. }
            | RecomposeError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // The daemon may simply be restarting; re-running is safe.
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::DataSource => match self {
                RecomposeError::DockerApiError { status, .. } if *status >= 500 => {
                    ErrorSeverity::Medium
                }
                _ => ErrorSeverity::High,
            },
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Serialization | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RecomposeError::DockerError(bollard::errors::Error::RequestTimeoutError) => {
                "Timed out waiting for the Docker daemon".to_string()
            }
            RecomposeError::DockerError(e) => format!("Could not talk to the Docker daemon: {}", e),
            RecomposeError::DockerApiError {
                status, message, ..
            } => format!("Docker daemon rejected the request ({}): {}", status, message),
            RecomposeError::IoError(e) => format!("Could not write the compose file: {}", e),
            RecomposeError::JsonError(_) | RecomposeError::YamlError(_) => {
                "Could not serialize the compose document".to_string()
            }
            RecomposeError::MissingConfigError { field } => {
                format!("{} is required, try: swarm-recompose -n portainer", field)
            }
            RecomposeError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            RecomposeError::ConfigError { message }
            | RecomposeError::ConfigValidationError { message, .. } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                "Check that DOCKER_HOST points at a reachable Swarm manager and re-run".to_string()
            }
            ErrorCategory::DataSource => {
                "Make sure the target node is a Swarm manager and the API version is supported"
                    .to_string()
            }
            ErrorCategory::Configuration => {
                "Review the command-line flags and the config file, see --help".to_string()
            }
            ErrorCategory::Serialization => {
                "Report the stack contents that triggered this failure".to_string()
            }
            ErrorCategory::Storage => {
                "Check that the output directory exists and is writable".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RecomposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_high_severity() {
        let err = RecomposeError::MissingConfigError {
            field: "namespace".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("namespace"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_daemon_server_errors_are_retryable() {
        let err = RecomposeError::DockerApiError {
            status: 503,
            endpoint: "/services".to_string(),
            message: "This node is not a swarm manager".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::DataSource);
        assert!(err.is_retryable());

        let err = RecomposeError::DockerApiError {
            status: 404,
            endpoint: "/services".to_string(),
            message: "page not found".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_daemon_timeouts_are_retryable() {
        let err = RecomposeError::from(bollard::errors::Error::RequestTimeoutError);
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.is_retryable());
        assert!(err.user_friendly_message().contains("Timed out"));
    }

    #[test]
    fn test_storage_errors_are_critical() {
        let err = RecomposeError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
