use aws_sdk_s3::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStreamError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum UtilError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Storage session not initialised")]
    NotInitialised,

    #[error("Failed to build HTTP request: {0}")]
    RequestBuild(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("Failed to parse multipart form: {0}")]
    MultipartError(String),

    #[error("Form field not found: {0}")]
    MissingField(String),

    #[error("Object name does not resolve inside the download directory: {0}")]
    InvalidObjectName(String),

    #[error("AWS service error ({code}): {message}")]
    ServiceError { code: String, message: String },

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Failed to convert record: {0}")]
    SerializationError(String),

    #[error("Randomness source failed: {0}")]
    RandomnessError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl UtilError {
    /// Errors a host should treat as a reason to stop at startup.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            UtilError::MissingConfiguration(_) | UtilError::MissingCredentials(_)
        )
    }

    /// The error code reported by the remote service, if any.
    #[must_use]
    pub fn service_code(&self) -> Option<&str> {
        match self {
            UtilError::ServiceError { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UtilError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            UtilError::RequestBuild(error.to_string())
        } else {
            UtilError::HttpError(error.to_string())
        }
    }
}

impl From<anyhow::Error> for UtilError {
    fn from(error: anyhow::Error) -> Self {
        UtilError::AwsError(error.to_string())
    }
}

impl From<serde_json::Error> for UtilError {
    fn from(error: serde_json::Error) -> Self {
        UtilError::SerializationError(error.to_string())
    }
}

impl From<multer::Error> for UtilError {
    fn from(error: multer::Error) -> Self {
        match error {
            multer::Error::StreamSizeExceeded { limit }
            | multer::Error::FieldSizeExceeded { limit, .. } => UtilError::PayloadTooLarge { limit },
            other => UtilError::MultipartError(other.to_string()),
        }
    }
}

// S3, SQS and DynamoDB share the smithy SdkError type, so one impl covers all three.
impl<E, R> From<SdkError<E, R>> for UtilError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        let code = error
            .as_service_error()
            .and_then(|service_error| service_error.code())
            .map(ToString::to_string);
        let message = DisplayErrorContext(&error).to_string();
        match code {
            Some(code) => UtilError::ServiceError { code, message },
            None => UtilError::AwsError(message),
        }
    }
}

impl From<BuildError> for UtilError {
    fn from(error: BuildError) -> Self {
        UtilError::AwsError(format!("request build: {error}"))
    }
}

impl From<ByteStreamError> for UtilError {
    fn from(error: ByteStreamError) -> Self {
        UtilError::AwsError(format!("body stream: {error}"))
    }
}

/// Logs an error once, with its service code when the remote side supplied one.
pub fn log_error(err: &UtilError) {
    match err.service_code() {
        Some(code) => error!(code, "{}", err),
        None => error!("{}", err),
    }
}

/// Returns `true` when `result` holds an error, logging it on the way.
pub fn handle_error<T>(result: &Result<T, UtilError>) -> bool {
    match result {
        Ok(_) => false,
        Err(err) => {
            log_error(err);
            true
        }
    }
}

/// Host-side startup policy: fatal errors end the process with status 1.
///
/// Non-fatal errors are handed back untouched.
///
/// # Errors
///
/// Returns the original error when it is not fatal.
pub fn exit_on_fatal<T>(result: Result<T, UtilError>) -> Result<T, UtilError> {
    exit_on_fatal_with(result, std::process::exit)
}

/// Same as [`exit_on_fatal`] with a caller-supplied exit hook.
///
/// # Errors
///
/// Returns the original error when it is not fatal.
pub fn exit_on_fatal_with<T>(
    result: Result<T, UtilError>,
    exit: fn(i32) -> !,
) -> Result<T, UtilError> {
    match result {
        Err(err) if err.is_fatal() => {
            error!("Fatal startup error: {}", err);
            exit(1)
        }
        other => other,
    }
}
