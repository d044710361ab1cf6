use crate::core::domain::error::{PveResult, ValidationError};
use url::Url;

/// The API root every request path is appended to.
const API_ROOT: &str = "/api2/json";

/// The connection descriptor for one Proxmox VE endpoint.
///
/// Immutable after construction; credentials live separately so they can be
/// refreshed without touching the endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint {
    host: String,
    port: u16,
    secure: bool,
    accept_invalid_certs: bool,
}

impl Endpoint {
    /// Creates a validated endpoint descriptor.
    pub fn new(host: impl Into<String>, port: u16, secure: bool) -> PveResult<Self> {
        let host = host.into();
        validate_host(&host)?;
        validate_port(port)?;

        let endpoint = Self {
            host,
            port,
            secure,
            accept_invalid_certs: false,
        };
        // The formatted base must round-trip through a URL parser; this
        // catches anything the label checks above let through.
        Url::parse(&endpoint.base_url())
            .map_err(|e| ValidationError::Format(format!("Invalid endpoint URL: {e}")))?;
        Ok(endpoint)
    }

    /// Disables TLS certificate verification (self-signed PVE installs).
    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// The scheme/host/port base, without the API root.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// The absolute URL for a resolved API path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url(),
            API_ROOT,
            path.trim_start_matches('/')
        )
    }
}

/// Validates a hostname against RFC 1035 label rules. IP literals pass the
/// same checks since their dotted groups are plain alphanumeric labels.
pub(crate) fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.is_empty() {
        return Err(ValidationError::Field {
            field: "host".to_string(),
            message: "Host cannot be empty".to_string(),
        });
    }
    if host.len() > 253 {
        return Err(ValidationError::ConstraintViolation(
            "Host length exceeds maximum of 253 characters".to_string(),
        ));
    }
    for label in host.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(ValidationError::Format(
                "Label must be between 1 and 63 characters".to_string(),
            ));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError::Format(
                "Label can only contain alphanumeric characters and hyphens".to_string(),
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ValidationError::Format(
                "Label cannot start or end with hyphen".to_string(),
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_port(port: u16) -> Result<(), ValidationError> {
    if port == 0 {
        return Err(ValidationError::Field {
            field: "port".to_string(),
            message: "Port cannot be zero".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hosts() {
        for host in [
            "example.com",
            "sub.example.com",
            "pve-cluster.internal",
            "127.0.0.1",
            "localhost",
        ] {
            assert!(Endpoint::new(host, 8006, true).is_ok(), "host {}", host);
        }
    }

    #[test]
    fn test_invalid_hosts() {
        let long_host = "a".repeat(254);
        for (host, case) in [
            ("", "empty hostname"),
            (long_host.as_str(), "hostname too long"),
            ("-example.com", "starts with hyphen"),
            ("example-.com", "ends with hyphen"),
            ("exam@ple.com", "invalid character"),
            ("exam ple.com", "contains space"),
            (".example.com", "empty label"),
            ("example..com", "consecutive dots"),
        ] {
            assert!(
                Endpoint::new(host, 8006, true).is_err(),
                "case '{}' should fail: {}",
                case,
                host
            );
        }
    }

    #[test]
    fn test_zero_port_is_rejected() {
        assert!(Endpoint::new("example.com", 0, true).is_err());
    }

    #[test]
    fn test_url_composition() {
        let endpoint = Endpoint::new("pve.example.com", 8006, true).unwrap();
        assert_eq!(endpoint.base_url(), "https://pve.example.com:8006");
        assert_eq!(
            endpoint.url_for("nodes/pve1/qemu"),
            "https://pve.example.com:8006/api2/json/nodes/pve1/qemu"
        );
        assert_eq!(
            endpoint.url_for("/access/ticket"),
            "https://pve.example.com:8006/api2/json/access/ticket"
        );
    }

    #[test]
    fn test_insecure_scheme() {
        let endpoint = Endpoint::new("localhost", 8006, false).unwrap();
        assert_eq!(endpoint.base_url(), "http://localhost:8006");
    }
}
