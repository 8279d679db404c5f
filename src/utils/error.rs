use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid requirement rule (country {country_id}, illness {illness_id}): {reason}")]
    InvalidRule {
        country_id: i64,
        illness_id: i64,
        reason: String,
    },

    #[error("Reference data error: {message}")]
    ReferenceDataError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrackerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackerError::ApiError(_) => ErrorCategory::Network,
            TrackerError::ZipError(_) | TrackerError::IoError(_) => ErrorCategory::Storage,
            TrackerError::CsvError(_)
            | TrackerError::SerializationError(_)
            | TrackerError::InvalidRule { .. }
            | TrackerError::ReferenceDataError { .. }
            | TrackerError::ProcessingError { .. }
            | TrackerError::ValidationError { .. } => ErrorCategory::Data,
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            TrackerError::ApiError(_) => ErrorSeverity::Medium,
            TrackerError::CsvError(_)
            | TrackerError::SerializationError(_)
            | TrackerError::InvalidRule { .. }
            | TrackerError::ReferenceDataError { .. }
            | TrackerError::ProcessingError { .. }
            | TrackerError::ValidationError { .. } => ErrorSeverity::High,
            TrackerError::ZipError(_) | TrackerError::IoError(_) => ErrorSeverity::Critical,
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::ApiError(_) => {
                "Check the reference endpoint URL and your network connection, then retry"
            }
            TrackerError::ZipError(_) | TrackerError::IoError(_) => {
                "Make sure the data directory exists and the output path is writable"
            }
            TrackerError::CsvError(_) => {
                "Check that the CSV files have the expected headers and column types"
            }
            TrackerError::SerializationError(_) => {
                "Check that the reference endpoint returns valid reference JSON"
            }
            TrackerError::InvalidRule { .. } => {
                "Fix required_doses / validity_period_months in the requirements data and re-import it"
            }
            TrackerError::ReferenceDataError { .. } => {
                "Re-run the crawler to regenerate the reference tables"
            }
            TrackerError::ProcessingError { .. } => "Re-run with --verbose to see which step failed",
            TrackerError::ValidationError { .. } => "Correct the input value and try again",
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. } => {
                "Review the configuration file or command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::ApiError(_) => "Could not download the reference data".to_string(),
            TrackerError::IoError(e) => format!("Could not read or write a file: {}", e),
            TrackerError::InvalidRule { .. } => {
                format!("The requirements data is inconsistent: {}", self)
            }
            TrackerError::ValidationError { message } => message.clone(),
            _ => self.to_string(),
        }
    }

    pub(crate) fn invalid_rule(country_id: i64, illness_id: i64, reason: impl Into<String>) -> Self {
        TrackerError::InvalidRule {
            country_id,
            illness_id,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
