use crate::core::domain::error::{PveResult, ValidationError};
use std::time::{Duration, SystemTime};

/// An authentication ticket issued by `POST access/ticket`.
///
/// The creation time is recorded locally so the client can refresh the
/// ticket proactively instead of waiting for the server to reject it.
#[derive(Debug, Clone)]
pub struct PveTicket {
    value: String,
    created_at: SystemTime,
}

impl PveTicket {
    /// Creates a validated ticket.
    pub fn new(value: String) -> PveResult<Self> {
        validate_ticket(&value)?;
        Ok(Self::new_unchecked(value))
    }

    /// Creates a ticket without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self {
            value,
            created_at: SystemTime::now(),
        }
    }

    /// Returns the ticket value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the local creation time.
    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Checks if the ticket has outlived the given lifetime.
    #[must_use]
    pub fn is_expired(&self, lifetime: Duration) -> bool {
        self.created_at
            .elapsed()
            .map(|age| age > lifetime)
            .unwrap_or(true)
    }

    /// Formats the ticket as the cookie header value the API expects.
    #[must_use]
    pub fn as_cookie_header(&self) -> String {
        format!("PVEAuthCookie={}", self.value)
    }
}

/// Validates the format of a ticket string.
pub(crate) fn validate_ticket(ticket: &str) -> Result<(), ValidationError> {
    if ticket.is_empty() {
        return Err(ValidationError::Field {
            field: "ticket".to_string(),
            message: "Ticket cannot be empty".to_string(),
        });
    }
    let parts: Vec<&str> = ticket.split(':').collect();
    if parts.len() < 5 || parts[0] != "PVE" {
        return Err(ValidationError::Format(
            "Invalid ticket format: must start with 'PVE:' and have at least 5 parts".to_string(),
        ));
    }
    Ok(())
}
