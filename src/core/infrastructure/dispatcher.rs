//! Single-shot request dispatch against one endpoint.
//!
//! One logical call in, one [`ApiResult`] out. The dispatcher never
//! retries; ticket refresh and re-dispatch on 401 belong to
//! [`PveClient`](crate::PveClient).

use crate::core::domain::error::PveResult;
use crate::core::domain::model::{ApiResult, Credential, Endpoint, RateLimitConfig};
use crate::core::domain::value_object::ParameterSet;
use crate::core::infrastructure::transport::{HttpMethod, Transport, WireRequest};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Issues read/create/update/delete calls with the session credential
/// attached.
///
/// The credential cell is shared-read and replaced atomically on refresh,
/// so concurrent callers observe either the old or the new credential.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
    credential: Arc<RwLock<Option<Credential>>>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl Dispatcher {
    /// Wires a dispatcher from its parts. Most callers go through
    /// [`PveClient::builder`](crate::PveClient::builder) instead.
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: Endpoint,
        rate_limit: Option<&RateLimitConfig>,
        initial_credential: Option<Credential>,
    ) -> Self {
        let rate_limiter = rate_limit.map(|rl| {
            let quota =
                Quota::per_second(rl.requests_per_second()).allow_burst(rl.burst_size());
            Arc::new(RateLimiter::direct(quota))
        });
        Self {
            transport,
            endpoint,
            credential: Arc::new(RwLock::new(initial_credential)),
            rate_limiter,
        }
    }

    /// Returns the endpoint this dispatcher talks to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Replaces the session credential atomically.
    pub async fn set_credential(&self, credential: Credential) {
        let mut lock = self.credential.write().await;
        *lock = Some(credential);
    }

    /// Returns a clone of the current credential, if any.
    pub async fn credential(&self) -> Option<Credential> {
        self.credential.read().await.clone()
    }

    /// True when a credential is present and usable: API tokens always,
    /// tickets only while younger than `ticket_lifetime`.
    pub(crate) async fn has_usable_credential(&self, ticket_lifetime: Duration) -> bool {
        match self.credential.read().await.as_ref() {
            Some(Credential::Ticket(auth)) => !auth.ticket().is_expired(ticket_lifetime),
            Some(Credential::ApiToken { .. }) => true,
            None => false,
        }
    }

    /// GET: parameters travel in the query string.
    pub async fn read(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.dispatch(HttpMethod::Get, path, params).await
    }

    /// POST: parameters travel in the form body.
    pub async fn create(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.dispatch(HttpMethod::Post, path, params).await
    }

    /// PUT: parameters travel in the form body.
    pub async fn update(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.dispatch(HttpMethod::Put, path, params).await
    }

    /// DELETE: parameters travel in the form body.
    pub async fn delete(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.dispatch(HttpMethod::Delete, path, params).await
    }

    /// Performs exactly one HTTP call.
    pub(crate) async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        params: &ParameterSet,
    ) -> PveResult<ApiResult> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.endpoint.url_for(path);
        let mut headers = Vec::new();
        {
            let credential = self.credential.read().await;
            if let Some(credential) = credential.as_ref() {
                match credential {
                    Credential::Ticket(auth) => {
                        headers.push(("Cookie".to_string(), auth.ticket().as_cookie_header()));
                        if method.is_mutating()
                            && let Some(csrf) = auth.csrf_token()
                        {
                            headers.push((
                                "CSRFPreventionToken".to_string(),
                                csrf.as_str().to_string(),
                            ));
                        }
                    }
                    token @ Credential::ApiToken { .. } => {
                        if let Some(value) = token.authorization_header() {
                            headers.push(("Authorization".to_string(), value));
                        }
                    }
                }
            }
        }

        let pairs = params.pairs().to_vec();
        let (query, form) = if method.is_mutating() {
            (Vec::new(), Some(pairs))
        } else {
            (pairs, None)
        };

        tracing::debug!(method = %method, path, "dispatching API request");
        let response = self
            .transport
            .execute(WireRequest {
                method,
                url,
                headers,
                query,
                form,
            })
            .await?;

        let result = ApiResult::from_response(response.status, response.body)?;
        if !result.succeeded() {
            tracing::warn!(method = %method, path, status = result.status(), "API call failed");
        }
        Ok(result)
    }
}
