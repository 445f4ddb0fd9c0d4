use crate::domain::model::Element;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdviceError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned non-success status: {status}")]
    StatusError { status: u16 },

    #[error("Malformed advice response: {message}")]
    MalformedResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Missing view elements: {elements}")]
    MissingElements { elements: String },

    #[error("View update failed: {message}")]
    ViewError { message: String },
}

/// 錯誤分類，用於日誌與結束碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    View,
    System,
}

impl AdviceError {
    pub fn missing_elements(elements: &[Element]) -> Self {
        let names: Vec<String> = elements.iter().map(ToString::to_string).collect();
        AdviceError::MissingElements {
            elements: names.join(", "),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AdviceError::ApiError(_) | AdviceError::StatusError { .. } => ErrorCategory::Network,
            AdviceError::MalformedResponse { .. } | AdviceError::SerializationError(_) => {
                ErrorCategory::Data
            }
            AdviceError::ConfigError { .. }
            | AdviceError::InvalidConfigValueError { .. }
            | AdviceError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AdviceError::MissingElements { .. } | AdviceError::ViewError { .. } => {
                ErrorCategory::View
            }
            AdviceError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => "Could not reach the advice service".to_string(),
            ErrorCategory::Data => "The advice service sent an unexpected response".to_string(),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::View => format!("Display problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection or the --api-endpoint value",
            ErrorCategory::Data => "Verify that the endpoint serves Advice Slip JSON",
            ErrorCategory::Configuration => "Fix the config file or command line flags and retry",
            ErrorCategory::View => "Make sure the terminal is writable",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, AdviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = AdviceError::StatusError { status: 503 };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.to_string().contains("503"));

        let err = AdviceError::MissingConfigError {
            field: "source.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().contains("source.endpoint"));
    }

    #[test]
    fn test_missing_elements_lists_names() {
        let err = AdviceError::missing_elements(&[Element::AdviceLabel, Element::GenerateButton]);
        assert_eq!(err.category(), ErrorCategory::View);
        assert_eq!(
            err.to_string(),
            "Missing view elements: advice-no, generate-btn"
        );
    }
}
