use thiserror::Error;

#[derive(Error, Debug)]
pub enum FigCopyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{provider} API error ({status}): {body}")]
    ApiStatusError {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an empty response")]
    EmptyResponseError { provider: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Processing,
    System,
}

impl FigCopyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::ApiStatusError { .. } | Self::EmptyResponseError { .. } => {
                ErrorCategory::Network
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_)
            | Self::ProcessingError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Processing,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::HttpError(_) => "Check your network connection and retry".to_string(),
            Self::ApiStatusError {
                provider, status, ..
            } => match status {
                401 | 403 => format!("Check the {} API key in your settings file", provider),
                429 => format!("{} rate limit hit, wait a moment and retry", provider),
                _ => format!("{} returned an error, retry later", provider),
            },
            Self::EmptyResponseError { provider } => {
                format!("{} returned no content, retry the request", provider)
            }
            Self::MissingConfigError { field } => {
                format!("Set `{}` in the settings file or environment", field)
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            Self::ProcessingError { .. } | Self::SerializationError(_) => {
                "The model output could not be processed, retry the run".to_string()
            }
            Self::ValidationError { .. } => {
                "Check the extraction scope (URL, node id, snapshot file)".to_string()
            }
            Self::IoError(_) => "Check file permissions and disk space".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiStatusError {
                provider, status, ..
            } => format!("{} request failed with HTTP {}", provider, status),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FigCopyError>;
