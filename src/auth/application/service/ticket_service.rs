use crate::auth::application::request::ticket_request::TicketRequest;
use crate::auth::application::response::ticket_response::TicketData;
use crate::core::domain::error::{PveError, PveResult};
use crate::core::domain::model::PveAuth;
use crate::core::domain::value_object::{CsrfToken, PveTicket};
use crate::core::infrastructure::dispatcher::Dispatcher;

const ACCESS_TICKET: &str = "access/ticket";

/// Exchanges username/password credentials for a ticket.
///
/// Login is one more `create` call through the dispatcher; whatever
/// credential is currently stored rides along and is ignored by the
/// server.
pub struct TicketService;

impl TicketService {
    /// Performs the login call and validates the returned tokens.
    ///
    /// # Errors
    ///
    /// Returns [`PveError::Authentication`] when the server rejects the
    /// credentials, and connection/decode errors from the dispatch itself.
    pub(crate) async fn execute(
        dispatcher: &Dispatcher,
        request: &TicketRequest,
    ) -> PveResult<PveAuth> {
        let result = dispatcher.create(ACCESS_TICKET, &request.params()).await?;

        match result.status() {
            401 | 403 => Err(PveError::Authentication(
                "Invalid credentials provided".to_string(),
            )),
            status if !result.succeeded() => Err(PveError::Authentication(format!(
                "Ticket request failed with status {status}"
            ))),
            _ => {
                let data: TicketData = result.into_data()?;
                let ticket = PveTicket::new(data.ticket)?;
                let csrf_token = match data.csrf_token {
                    Some(token) => Some(CsrfToken::new(token)?),
                    None => None,
                };
                Ok(PveAuth::new(ticket, csrf_token))
            }
        }
    }
}
