use serde::{Deserialize, Serialize};

/// API version info from `GET /version`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Version {
    /// Full package version (e.g. "8.2.4").
    pub version: String,
    /// Release line (e.g. "8.2").
    pub release: String,
    /// Build repository id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repoid: Option<String>,
}
