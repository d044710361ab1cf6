pub mod ticket_response;
