use crate::response::StatusCode;
use thiserror::Error;

/// Boxed error raised by business logic.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// **HANDLER ERROR TAXONOMY**
///
/// Every failure a handler can observe. Request-side variants collapse to a
/// 400 response and `BusinessLogicFailure` to a 500. `InvalidPattern` is raised
/// while building a validator, never while serving a request; it is a server
/// misconfiguration and classifies as 500.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("INVALID FIELD: {}{message}", field_prefix(.field))]
    InvalidField {
        field: Option<String>,
        message: String,
    },

    #[error("EXTRANEOUS FIELD: '{field}'")]
    ExtraneousField { field: String },

    #[error("MISSING FIELD: '{field}'")]
    MissingField { field: String },

    #[error("INCORRECT METHOD: expected {expected}, got {actual}")]
    MethodMismatch { expected: String, actual: String },

    #[error("PARSE ERROR: {message}")]
    ParseFailure { message: String },

    #[error("BUSINESS LOGIC ERROR: {source}")]
    BusinessLogicFailure {
        #[source]
        source: BoxError,
    },

    #[error("INVALID PATTERN: '{pattern}' - {message}")]
    InvalidPattern { pattern: String, message: String },
}

fn field_prefix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!("'{}' - ", name),
        None => String::new(),
    }
}

/// **ERROR CODES**
///
/// Stable identifiers for diagnostic output.
pub mod error_codes {
    pub const INVALID_FIELD: &str = "SCHEMA_HANDLER_INVALID_FIELD";
    pub const EXTRANEOUS_FIELD: &str = "SCHEMA_HANDLER_EXTRANEOUS_FIELD";
    pub const MISSING_FIELD: &str = "SCHEMA_HANDLER_MISSING_FIELD";
    pub const METHOD_MISMATCH: &str = "SCHEMA_HANDLER_METHOD_MISMATCH";
    pub const PARSE_FAILURE: &str = "SCHEMA_HANDLER_PARSE_FAILURE";
    pub const BUSINESS_LOGIC_FAILURE: &str = "SCHEMA_HANDLER_BUSINESS_LOGIC_FAILURE";
    pub const INVALID_PATTERN: &str = "SCHEMA_HANDLER_INVALID_PATTERN";
}

impl HandlerError {
    /// Field-level failure not yet attributed to a record key.
    pub fn invalid(message: impl Into<String>) -> Self {
        HandlerError::InvalidField {
            field: None,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        HandlerError::ParseFailure {
            message: message.into(),
        }
    }

    pub fn business(source: impl Into<BoxError>) -> Self {
        HandlerError::BusinessLogicFailure {
            source: source.into(),
        }
    }

    /// Attach the record key to an `InvalidField` raised by a field validator.
    /// Other variants pass through untouched.
    pub fn for_field(self, name: &str) -> Self {
        match self {
            HandlerError::InvalidField { field: None, message } => HandlerError::InvalidField {
                field: Some(name.to_string()),
                message,
            },
            other => other,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            HandlerError::InvalidField { .. } => error_codes::INVALID_FIELD,
            HandlerError::ExtraneousField { .. } => error_codes::EXTRANEOUS_FIELD,
            HandlerError::MissingField { .. } => error_codes::MISSING_FIELD,
            HandlerError::MethodMismatch { .. } => error_codes::METHOD_MISMATCH,
            HandlerError::ParseFailure { .. } => error_codes::PARSE_FAILURE,
            HandlerError::BusinessLogicFailure { .. } => error_codes::BUSINESS_LOGIC_FAILURE,
            HandlerError::InvalidPattern { .. } => error_codes::INVALID_PATTERN,
        }
    }

    /// Status code this error is reported as.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BusinessLogicFailure { .. } | HandlerError::InvalidPattern { .. } => {
                StatusCode::InternalServerError
            }
            _ => StatusCode::BadRequest,
        }
    }
}
