use crate::core::domain::value_object::{CsrfToken, PveTicket};

/// The ticket/CSRF pair obtained from a successful login.
#[derive(Debug, Clone)]
pub struct PveAuth {
    ticket: PveTicket,
    csrf_token: Option<CsrfToken>,
}

impl PveAuth {
    pub fn new(ticket: PveTicket, csrf_token: Option<CsrfToken>) -> Self {
        Self { ticket, csrf_token }
    }

    pub fn ticket(&self) -> &PveTicket {
        &self.ticket
    }

    pub fn csrf_token(&self) -> Option<&CsrfToken> {
        self.csrf_token.as_ref()
    }
}

/// The credential attached to outgoing requests.
///
/// Tickets expire and are replaced wholesale on refresh; API tokens are
/// static for the session.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Session ticket from `POST access/ticket`.
    Ticket(PveAuth),
    /// Pre-provisioned API token, sent as `PVEAPIToken=<id>=<secret>`.
    ApiToken { token_id: String, secret: String },
}

impl Credential {
    /// The value of the `Authorization` header for token credentials.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Credential::Ticket(_) => None,
            Credential::ApiToken { token_id, secret } => {
                Some(format!("PVEAPIToken={token_id}={secret}"))
            }
        }
    }
}
