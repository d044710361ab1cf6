use crate::core::domain::error::ValidationError;
use std::num::NonZeroU32;
use std::time::Duration;

/// Client-side rate limiting for outgoing requests.
///
/// Matches the sustained-rate-plus-burst model of the `governor` limiter
/// the dispatcher uses.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    requests_per_second: NonZeroU32,
    burst_size: NonZeroU32,
}

impl RateLimitConfig {
    /// Creates a rate limit; both values must be non-zero.
    pub fn new(requests_per_second: u32, burst_size: u32) -> Result<Self, ValidationError> {
        let requests_per_second = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            ValidationError::Field {
                field: "requests_per_second".to_string(),
                message: "Rate limit must be at least 1 request per second".to_string(),
            }
        })?;
        let burst_size = NonZeroU32::new(burst_size).ok_or_else(|| ValidationError::Field {
            field: "burst_size".to_string(),
            message: "Burst size must be at least 1".to_string(),
        })?;
        Ok(Self {
            requests_per_second,
            burst_size,
        })
    }

    #[must_use]
    pub fn requests_per_second(&self) -> NonZeroU32 {
        self.requests_per_second
    }

    #[must_use]
    pub fn burst_size(&self) -> NonZeroU32 {
        self.burst_size
    }
}

/// Tunables that apply to the whole client session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connect/read deadline for each request.
    pub timeout: Duration,
    /// How long a ticket is trusted before the client re-authenticates.
    /// The server issues two-hour tickets; the default refreshes earlier.
    pub ticket_lifetime: Duration,
    /// Optional client-side request rate limit.
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            ticket_lifetime: Duration::from_secs(2 * 60 * 60 - 10 * 60),
            rate_limit: None,
        }
    }
}
