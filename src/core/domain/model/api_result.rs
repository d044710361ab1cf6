use crate::core::domain::error::{PveError, PveResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// The `{"data": ..., "errors": {...}}` envelope every API response uses.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<BTreeMap<String, String>>,
    #[serde(default)]
    message: Option<String>,
}

/// The outcome of one dispatched call.
///
/// A non-2xx status is a *failed result*, not an error: operational
/// rejections ("VM not found", "name already in use") are routine and the
/// caller inspects them through [`succeeded`](Self::succeeded) and
/// [`errors`](Self::errors). Only a 2xx response whose body is not the
/// structured envelope escalates to [`PveError::Decode`].
#[derive(Debug, Clone)]
pub struct ApiResult {
    status: u16,
    body: String,
    data: Option<Value>,
    errors: BTreeMap<String, String>,
    message: Option<String>,
}

impl ApiResult {
    /// Builds a result from a raw status/body pair.
    ///
    /// # Errors
    ///
    /// Returns [`PveError::Decode`] when a success response carries a body
    /// that is not the structured envelope. Failure responses tolerate
    /// unstructured bodies; proxies and early-boot errors produce those.
    pub(crate) fn from_response(status: u16, body: String) -> PveResult<Self> {
        let succeeded = (200..300).contains(&status);
        if body.trim().is_empty() {
            return Ok(Self {
                status,
                body,
                data: None,
                errors: BTreeMap::new(),
                message: None,
            });
        }

        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) => Ok(Self {
                status,
                body,
                data: envelope.data,
                errors: envelope.errors.unwrap_or_default(),
                message: envelope.message,
            }),
            Err(e) if succeeded => Err(PveError::Decode(format!(
                "malformed response envelope: {e}"
            ))),
            Err(_) => Ok(Self {
                status,
                body,
                data: None,
                errors: BTreeMap::new(),
                message: None,
            }),
        }
    }

    /// True exactly when the call returned a 2xx status.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The raw HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The raw response body, exactly as received.
    #[must_use]
    pub fn raw_body(&self) -> &str {
        &self.body
    }

    /// The decoded `data` payload, if the envelope carried one.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Parameter-level error messages from a failed call.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// The server's human-readable status message, when present.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Converts the result into a typed payload.
    ///
    /// # Errors
    ///
    /// A failed result becomes [`PveError::Api`] carrying the status and
    /// error map; a success without a `data` payload, or whose payload does
    /// not match `T`, becomes [`PveError::Decode`].
    pub fn into_data<T: serde::de::DeserializeOwned>(self) -> PveResult<T> {
        if !self.succeeded() {
            return Err(PveError::Api {
                status: self.status,
                errors: self.errors,
            });
        }
        let data = self
            .data
            .ok_or_else(|| PveError::Decode("response envelope has no data".to_string()))?;
        serde_json::from_value(data)
            .map_err(|e| PveError::Decode(format!("unexpected payload shape: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let result = ApiResult::from_response(
            200,
            r#"{"data": {"version": "8.2.4", "release": "8.2"}}"#.to_string(),
        )
        .unwrap();
        assert!(result.succeeded());
        assert_eq!(result.status(), 200);
        assert_eq!(result.data().unwrap()["version"], "8.2.4");
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_failure_envelope_with_error_map() {
        let result = ApiResult::from_response(
            400,
            r#"{"data": null, "errors": {"name": "already in use"}}"#.to_string(),
        )
        .unwrap();
        assert!(!result.succeeded());
        assert_eq!(result.errors().get("name").unwrap(), "already in use");
        assert!(result.data().is_none());
    }

    #[test]
    fn test_empty_body_is_a_valid_result() {
        let result = ApiResult::from_response(200, String::new()).unwrap();
        assert!(result.succeeded());
        assert!(result.data().is_none());

        let result = ApiResult::from_response(501, String::new()).unwrap();
        assert!(!result.succeeded());
    }

    #[test]
    fn test_non_json_success_body_is_a_decode_error() {
        let result = ApiResult::from_response(200, "<html>proxy page</html>".to_string());
        assert!(matches!(result, Err(PveError::Decode(_))));
    }

    #[test]
    fn test_non_json_failure_body_is_tolerated() {
        let result =
            ApiResult::from_response(502, "<html>bad gateway</html>".to_string()).unwrap();
        assert!(!result.succeeded());
        assert_eq!(result.raw_body(), "<html>bad gateway</html>");
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_into_data_on_success() {
        #[derive(serde::Deserialize)]
        struct Version {
            version: String,
        }
        let result =
            ApiResult::from_response(200, r#"{"data": {"version": "8.2.4"}}"#.to_string())
                .unwrap();
        let version: Version = result.into_data().unwrap();
        assert_eq!(version.version, "8.2.4");
    }

    #[test]
    fn test_into_data_on_failure_carries_error_map() {
        let result = ApiResult::from_response(
            500,
            r#"{"errors": {"vmid": "VM 100 does not exist"}}"#.to_string(),
        )
        .unwrap();
        match result.into_data::<serde_json::Value>() {
            Err(PveError::Api { status, errors }) => {
                assert_eq!(status, 500);
                assert_eq!(errors.get("vmid").unwrap(), "VM 100 does not exist");
            }
            other => panic!("expected Api error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_into_data_without_payload_is_a_decode_error() {
        let result = ApiResult::from_response(200, r#"{"data": null}"#.to_string()).unwrap();
        assert!(matches!(
            result.into_data::<serde_json::Value>(),
            Err(PveError::Decode(_))
        ));
    }
}
