use crate::core::domain::error::{PveResult, ValidationError};

/// The CSRF-prevention token paired with a ticket.
///
/// Attached as the `CSRFPreventionToken` header on mutating requests only;
/// read requests never need it.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    value: String,
}

impl CsrfToken {
    /// Creates a validated token.
    pub fn new(value: String) -> PveResult<Self> {
        validate_csrf_token(&value)?;
        Ok(Self::new_unchecked(value))
    }

    /// Creates a token without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self { value }
    }

    /// Returns the token value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Validates the `timestamp:signature` shape of a CSRF token.
pub(crate) fn validate_csrf_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() {
        return Err(ValidationError::Field {
            field: "csrf_token".to_string(),
            message: "CSRF token cannot be empty".to_string(),
        });
    }
    if !token.contains(':') {
        return Err(ValidationError::Format(
            "Invalid CSRF token format: expected 'timestamp:signature'".to_string(),
        ));
    }
    Ok(())
}
