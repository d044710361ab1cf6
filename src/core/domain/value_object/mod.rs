mod csrf_token;
mod parameter_set;
mod resource_path;
mod ticket;

pub use csrf_token::CsrfToken;
pub use parameter_set::{ParamValue, ParameterSet, RenameTable};
pub use resource_path::ResourcePath;
pub use ticket::PveTicket;
