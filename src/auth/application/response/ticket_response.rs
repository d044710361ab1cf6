use serde::Deserialize;

/// The payload inside the `access/ticket` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketData {
    pub ticket: String,
    /// Absent when the realm does not issue CSRF tokens (API-token-style
    /// realms); mutating calls then go out without the header.
    #[serde(default, rename = "CSRFPreventionToken")]
    pub csrf_token: Option<String>,
}
