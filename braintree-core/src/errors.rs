//! Error types shared by every stage of a payment flow.

use serde::Deserialize;

/// Boxed error from an underlying transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for Braintree client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The merchant configuration does not allow the operation, or the
    /// authorization string is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The gateway rejected the request.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// Network-level failure while talking to the gateway.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The gateway answered with a non-success status other than 422.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// JSON serialization/deserialization errors.
    #[error("Serde JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Base64 encoding/decoding errors.
    #[error("Base64 decode error: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    /// UTF-8 decoding errors.
    #[error("UTF-8 decode error: {0}")]
    Utf8DecodeError(#[from] std::string::FromUtf8Error),

    /// URL parsing errors.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// The external user agent could not be started, or its return was unusable.
    #[error("Browser switch error: {0}")]
    BrowserSwitch(String),

    /// The gateway returned a state the client does not know how to handle.
    #[error("{0}")]
    Unexpected(String),
}

/// Coarse classification of an [`Error`], used to decide what the caller can do about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fatal; the feature is disabled or the client is misconfigured.
    Configuration,
    /// Fatal; the request must be fixed and resubmitted.
    Validation,
    /// The whole flow may be retried from the start.
    Transport,
    /// Fatal; server and client disagree on a wire format.
    Parse,
    /// The switch to the external user agent failed.
    BrowserSwitch,
}

impl Error {
    /// The message used when the gateway hands back an approval URL that is neither a URL nor `"null"`.
    pub const UNEXPECTED: &'static str = "An unexpected error occurred.";

    pub fn unexpected() -> Self {
        Error::Unexpected(Self::UNEXPECTED.to_string())
    }

    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Transport(Box::new(err))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Transport(_) | Error::Http { .. } => ErrorKind::Transport,
            Error::SerdeJsonError(_)
            | Error::Base64DecodeError(_)
            | Error::Utf8DecodeError(_)
            | Error::UrlParseError(_)
            | Error::Unexpected(_) => ErrorKind::Parse,
            Error::BrowserSwitch(_) => ErrorKind::BrowserSwitch,
        }
    }
}

/// A business error reported by the gateway.
///
/// Parsed from either the REST shape
/// `{"error": {"message": ...}, "fieldErrors": [...]}`
/// or the GraphQL shape `{"errors": [{"message": ...}]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub field_errors: Vec<FieldError>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A validation failure attached to one request field, possibly nested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

impl FieldError {
    /// Find the error for `field` among this error's children, recursively.
    pub fn find(&self, field: &str) -> Option<&FieldError> {
        self.field_errors
            .iter()
            .find_map(|e| if e.field == field { Some(e) } else { e.find(field) })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestErrorBody {
    error: RestErrorMessage,
    #[serde(default)]
    field_errors: Vec<FieldError>,
}

#[derive(Deserialize)]
struct RestErrorMessage {
    message: String,
}

#[derive(Deserialize)]
struct GraphQlErrorBody {
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

impl ValidationError {
    /// Extract a gateway-reported error from a response body, if it carries one.
    pub fn from_body(body: &str) -> Option<Self> {
        if let Ok(rest) = serde_json::from_str::<RestErrorBody>(body) {
            return Some(ValidationError {
                message: rest.error.message,
                field_errors: rest.field_errors,
            });
        }

        let graphql = serde_json::from_str::<GraphQlErrorBody>(body).ok()?;
        let first = graphql.errors.first()?;
        Some(ValidationError {
            message: first.message.clone(),
            field_errors: Vec::new(),
        })
    }

    /// Find the error reported for `field`, searching nested field errors.
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.field_errors
            .iter()
            .find_map(|e| if e.field == field { Some(e) } else { e.find(field) })
    }
}

/// A specialized `Result` type for Braintree client operations.
pub type Result<T> = std::result::Result<T, Error>;
