use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Cannot read '{value}' as {kind} for preference '{id}'")]
    InvalidValueError {
        id: String,
        kind: String,
        value: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Malformed preferences file {path}: {message}")]
    StoreFormatError { path: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FixerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FixerError::IoError(_) | FixerError::StoreFormatError { .. } => ErrorCategory::Storage,
            FixerError::ConfigError { .. }
            | FixerError::InvalidConfigValueError { .. }
            | FixerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FixerError::SerializationError(_)
            | FixerError::InvalidValueError { .. }
            | FixerError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FixerError::IoError(_) => {
                "Check that the preferences file exists and is readable/writable, and that Ninjabrain Bot is closed"
            }
            FixerError::SerializationError(_) => {
                "Make sure the adjustments argument is valid JSON: {\"breaking\": [...], \"recommend\": [...]}"
            }
            FixerError::ConfigError { .. }
            | FixerError::InvalidConfigValueError { .. }
            | FixerError::MissingConfigError { .. } => {
                "Review the config file and command line options"
            }
            FixerError::InvalidValueError { .. } => {
                "Make sure every adjustment value matches its declared type"
            }
            FixerError::ValidationError { .. } => {
                "Every adjuster needs a non-empty id and a non-negative allowedError"
            }
            FixerError::StoreFormatError { .. } => {
                "Restore the preferences file from a backup or let Ninjabrain Bot recreate it"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FixerError::IoError(e) => format!("Could not access the preferences store: {}", e),
            FixerError::SerializationError(e) => format!("Could not parse JSON input: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FixerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_category() {
        let io = FixerError::IoError(std::io::Error::other("disk"));
        assert_eq!(io.category(), ErrorCategory::Storage);
        assert_eq!(io.exit_code(), 3);

        let invalid = FixerError::ValidationError {
            message: "empty id".to_string(),
        };
        assert_eq!(invalid.category(), ErrorCategory::Input);
        assert_eq!(invalid.exit_code(), 1);
    }

    #[test]
    fn test_user_friendly_message_for_json_error() {
        let err: FixerError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.user_friendly_message().starts_with("Could not parse JSON input"));
    }
}
