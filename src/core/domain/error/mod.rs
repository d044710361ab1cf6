use std::collections::BTreeMap;
use thiserror::Error;

/// The main error type for operations against a Proxmox VE endpoint.
///
/// Transport failures, decode failures, and internal misuse surface here.
/// API-level failures (a non-2xx status with a structured error payload)
/// do **not**: those are routine outcomes carried inside
/// [`ApiResult`](crate::ApiResult), and only become a [`PveError::Api`]
/// when the caller asks for decoded data from a failed call.
#[derive(Error, Debug)]
pub enum PveError {
    /// The endpoint could not be reached (DNS, TCP, or TLS failure).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request exceeded the configured deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Login was rejected, or no usable credential is configured.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A call failed at the API level and the caller requested its payload.
    ///
    /// `errors` maps parameter names to server-side validation messages.
    #[error("API error (status {status})")]
    Api {
        status: u16,
        errors: BTreeMap<String, String>,
    },

    /// The response body violated the expected envelope structure.
    ///
    /// This indicates a protocol mismatch between client and server and is
    /// never recovered into an [`ApiResult`](crate::ApiResult).
    #[error("Decode error: {0}")]
    Decode(String),

    /// A path template was resolved with fewer bound values than
    /// placeholders. This is a programming error in the calling code.
    #[error("Unbound placeholder '{name}' in path template '{template}'")]
    UnboundPlaceholder { name: String, template: String },

    /// Client configuration or a wire value failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Specialized error type for validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A specific configuration field failed validation.
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// A value had an invalid format or syntax.
    #[error("Format error: {0}")]
    Format(String),

    /// A value violated a domain constraint.
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a PveError.
pub type PveResult<T> = Result<T, PveError>;
