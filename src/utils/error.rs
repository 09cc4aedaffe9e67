use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed TCX file: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        EtlError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InvalidInput { .. } => ErrorCategory::Input,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::RegexError(_) => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::CsvError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_)
            | EtlError::XmlError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InvalidInput { message } => format!("Invalid activity data: {}", message),
            EtlError::IoError(e) => format!("Could not access a file: {}", e),
            EtlError::CsvError(e) => format!("Could not write CSV output: {}", e),
            EtlError::SerializationError(e) => format!("Malformed activity file: {}", e),
            EtlError::XmlError(e) => format!("Malformed lap file: {}", e),
            EtlError::RegexError(e) => format!("Invalid name pattern: {}", e),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Option '{}' is invalid: {}", field, reason)
            }
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration '{}' is invalid: {}", field, message)
            }
            EtlError::ProcessingError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the lap data of the reported activity file",
            ErrorCategory::Configuration => {
                "Check command line flags and the TOML config (paces use MM:SS, dates use YYYY-MM-DD)"
            }
            ErrorCategory::Io => "Check that the activity directory exists and the output path is writable",
            ErrorCategory::Processing => "Re-export the activity or run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_medium_severity() {
        let err = EtlError::invalid_input("negative distance");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Invalid input: negative distance");
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: EtlError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("gone"));
    }

    #[test]
    fn test_config_error_message_names_field() {
        let err = EtlError::InvalidConfigValueError {
            field: "interval_pace".to_string(),
            value: "00:00".to_string(),
            reason: "pace must be positive".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().contains("interval_pace"));
    }

    #[test]
    fn test_xml_error_is_processing() {
        let err: EtlError = roxmltree::Document::parse("<Lap>").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Processing);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().starts_with("Malformed lap file"));
    }
}
