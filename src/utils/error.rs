use crate::domain::contact::FormErrors;
use crate::domain::rut::RutError;
use thiserror::Error;

/// Generic text shown to the user for any network or response-parsing failure.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Error de conexión. Por favor, inténtelo nuevamente en unos minutos.";

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Invalid RUT: {0}")]
    RutError(#[from] RutError),

    #[error("Form validation failed: {0}")]
    ValidationError(FormErrors),

    #[error("Webhook connection failed: {message}")]
    ConnectionError { message: String },

    #[error("Webhook rejected the record with status '{status}'")]
    WebhookRejected {
        status: String,
        message: Option<String>,
    },

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {reason} (got '{value}')")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Remote,
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

impl IntakeError {
    pub fn connection(message: impl Into<String>) -> Self {
        IntakeError::ConnectionError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            IntakeError::RutError(_)
            | IntakeError::ValidationError(_)
            | IntakeError::SubmissionInProgress => ErrorCategory::Input,
            IntakeError::ConnectionError { .. } => ErrorCategory::Network,
            IntakeError::WebhookRejected { .. } => ErrorCategory::Remote,
            IntakeError::ConfigError { .. }
            | IntakeError::InvalidConfigValueError { .. }
            | IntakeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            IntakeError::IoError(_) | IntakeError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Text suitable for showing next to the form.
    pub fn user_friendly_message(&self) -> String {
        match self {
            IntakeError::RutError(e) => e.to_string(),
            IntakeError::ValidationError(errors) => {
                format!("Revise los campos marcados: {}", errors.fields().join(", "))
            }
            IntakeError::ConnectionError { .. } => CONNECTION_ERROR_MESSAGE.to_string(),
            IntakeError::WebhookRejected { message, .. } => message
                .clone()
                .unwrap_or_else(|| "No fue posible registrar sus datos.".to_string()),
            IntakeError::SubmissionInProgress => {
                "Su solicitud ya está siendo enviada, espere un momento.".to_string()
            }
            IntakeError::ConfigError { message } => format!("Configuración inválida: {}", message),
            IntakeError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuración inválida en '{}': {}", field, reason)
            }
            IntakeError::MissingConfigError { field } => {
                format!("Falta la configuración requerida '{}'", field)
            }
            IntakeError::IoError(e) => format!("Error de archivo: {}", e),
            IntakeError::SerializationError(e) => format!("Datos con formato inválido: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Correct the highlighted fields and submit again",
            ErrorCategory::Network => "Check network access to the webhook URL and try again",
            ErrorCategory::Remote => "Check the reply message from the CRM webhook",
            ErrorCategory::Configuration => {
                "Check the TOML config file and the command line flags"
            }
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_share_generic_message() {
        let a = IntakeError::connection("timed out");
        let b = IntakeError::connection("invalid JSON body");
        assert_eq!(a.user_friendly_message(), CONNECTION_ERROR_MESSAGE);
        assert_eq!(a.user_friendly_message(), b.user_friendly_message());
        assert_eq!(a.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_rejection_prefers_remote_message() {
        let err = IntakeError::WebhookRejected {
            status: "error".to_string(),
            message: Some("RUT ya registrado".to_string()),
        };
        assert_eq!(err.user_friendly_message(), "RUT ya registrado");
        assert_eq!(err.category(), ErrorCategory::Remote);

        let bare = IntakeError::WebhookRejected {
            status: "duplicate".to_string(),
            message: None,
        };
        assert!(bare.user_friendly_message().contains("No fue posible"));
    }

    #[test]
    fn test_severity_ordering() {
        let io = IntakeError::IoError(std::io::Error::other("disk"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(io.severity() > IntakeError::SubmissionInProgress.severity());
    }
}
