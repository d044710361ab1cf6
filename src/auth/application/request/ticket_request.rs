use crate::core::domain::value_object::ParameterSet;

/// The credentials posted to `access/ticket`.
#[derive(Debug, Clone)]
pub struct TicketRequest {
    pub username: String,
    pub password: String,
    pub realm: String,
}

impl TicketRequest {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            realm: realm.into(),
        }
    }

    /// Encodes the request as login-call parameters.
    pub(crate) fn params(&self) -> ParameterSet {
        ParameterSet::new()
            .arg("username", Some(self.username.as_str()))
            .arg("password", Some(self.password.as_str()))
            .arg("realm", Some(self.realm.as_str()))
    }
}
