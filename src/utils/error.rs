use thiserror::Error;

#[derive(Error, Debug)]
pub enum DicciotipsError {
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

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request rejected by backend"))]
    HttpStatus { status: u16, message: Option<String> },

    #[error("Invalid response from backend: {message}")]
    InvalidResponse { message: String },

    #[error("Access denied to {path}")]
    AccessDenied { path: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A message meant for the person at the keyboard, with the failure behind it.
    #[error("{message}")]
    Page {
        message: String,
        #[source]
        cause: Option<Box<DicciotipsError>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Configuration,
    Input,
    Authorization,
    Storage,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DicciotipsError {
    pub fn http(status: u16, message: Option<String>) -> Self {
        DicciotipsError::HttpStatus { status, message }
    }

    pub fn page(message: impl Into<String>, cause: DicciotipsError) -> Self {
        DicciotipsError::Page {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        DicciotipsError::Page {
            message: message.into(),
            cause: None,
        }
    }

    /// Status code of a rejected request, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            DicciotipsError::HttpStatus { status, .. } => Some(*status),
            DicciotipsError::ApiError(e) => e.status().map(|s| s.as_u16()),
            DicciotipsError::Page {
                cause: Some(cause), ..
            } => cause.status(),
            _ => None,
        }
    }

    /// The `message` field the backend put in an error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DicciotipsError::HttpStatus {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DicciotipsError::ApiError(_) => ErrorCategory::Network,
            DicciotipsError::HttpStatus { status, .. } if matches!(status, 401 | 403) => {
                ErrorCategory::Authorization
            }
            DicciotipsError::HttpStatus { .. }
            | DicciotipsError::InvalidResponse { .. } => ErrorCategory::Backend,
            DicciotipsError::NotFound { .. } => ErrorCategory::Empty,
            DicciotipsError::ConfigError { .. }
            | DicciotipsError::ConfigValidationError { .. }
            | DicciotipsError::InvalidConfigValueError { .. }
            | DicciotipsError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DicciotipsError::Page { cause, .. } => cause
                .as_deref()
                .map(DicciotipsError::category)
                .unwrap_or(ErrorCategory::Input),
            DicciotipsError::AccessDenied { .. } => ErrorCategory::Authorization,
            DicciotipsError::CsvError(_)
            | DicciotipsError::IoError(_)
            | DicciotipsError::SerializationError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Empty => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Input
            | ErrorCategory::Authorization
            | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DicciotipsError::ApiError(_) => {
                "No se pudo conectar con el servidor de Dicciotips".to_string()
            }
            DicciotipsError::HttpStatus { status, message } => match message {
                Some(message) if !message.trim().is_empty() => message.clone(),
                _ => format!("Error HTTP: {}", status),
            },
            DicciotipsError::InvalidResponse { .. } => "Formato de datos inválido".to_string(),
            DicciotipsError::AccessDenied { path } => format!("Acceso denegado a {}", path),
            DicciotipsError::NotFound { message } => message.clone(),
            DicciotipsError::Page { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the backend is running and --api-url is correct",
            ErrorCategory::Backend => "Inspect the backend logs for the rejected request",
            ErrorCategory::Authorization => "Log in again with an account that has the required role",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::Input => "Correct the highlighted fields and try again",
            ErrorCategory::Storage => "Check file permissions for the session and export paths",
            ErrorCategory::Empty => "Try a different search term",
        }
    }
}

pub type Result<T> = std::result::Result<T, DicciotipsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_ignores_blank_bodies() {
        let err = DicciotipsError::http(400, Some("  ".to_string()));
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_friendly_message(), "Error HTTP: 400");

        let err = DicciotipsError::http(409, Some("El usuario ya existe".to_string()));
        assert_eq!(err.server_message(), Some("El usuario ya existe"));
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_unauthorized_status_is_authorization_category() {
        let err = DicciotipsError::http(401, None);
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = DicciotipsError::http(500, None);
        assert_eq!(err.category(), ErrorCategory::Backend);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_input_errors_block_with_high_severity() {
        let err = DicciotipsError::invalid_input("El usuario no puede estar vacío");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.user_friendly_message(), "El usuario no puede estar vacío");
    }

    #[test]
    fn test_page_error_takes_category_from_cause() {
        let err = DicciotipsError::page(
            "Error al obtener los usuarios",
            DicciotipsError::http(403, None),
        );
        assert_eq!(err.to_string(), "Error al obtener los usuarios");
        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_not_found_is_low_severity() {
        let err = DicciotipsError::NotFound {
            message: "No se encontró el significado".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }
}
