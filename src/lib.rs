//! # pverest
//!
//! A minimal, async request core for the Proxmox VE REST API.
//!
//! The crate implements the four pieces every generated PVE accessor
//! method reduces to: a path resolver ([`ResourcePath`]), a parameter
//! codec ([`ParameterSet`]), a request dispatcher, and a uniform outcome
//! envelope ([`ApiResult`]). On top of those sit the raw `read` /
//! `create` / `update` / `delete` primitives and a small typed surface
//! (version, nodes, VMs) showing how an accessor layer consumes the core.

mod auth;
mod core;

pub use crate::core::domain::error::{PveError, PveResult, ValidationError};
pub use crate::core::domain::model::{
    ApiResult, ClientConfig, Credential, Endpoint, NodeListItem, PveAuth, RateLimitConfig,
    Version, VmListItem, VmStatus,
};
pub use crate::core::domain::value_object::{
    CsrfToken, ParamValue, ParameterSet, PveTicket, RenameTable, ResourcePath,
};
pub use crate::core::infrastructure::dispatcher::Dispatcher;
pub use crate::core::infrastructure::transport::{
    HttpMethod, ReqwestTransport, Transport, WireRequest, WireResponse,
};
pub use crate::auth::application::request::ticket_request::TicketRequest;

use crate::auth::application::service::ticket_service::TicketService;
use std::sync::Arc;
use std::time::Duration;

/// Path templates for the typed operations below. The full API tree is
/// intended to be driven by tables like this one, not per-resource types.
mod templates {
    pub const VERSION: &str = "version";
    pub const NODES: &str = "nodes";
    pub const NODE_QEMU: &str = "nodes/{node}/qemu";
    pub const QEMU_VM: &str = "nodes/{node}/qemu/{vmid}";
    pub const QEMU_STATUS_CURRENT: &str = "nodes/{node}/qemu/{vmid}/status/current";
    pub const QEMU_STATUS_START: &str = "nodes/{node}/qemu/{vmid}/status/start";
    pub const QEMU_STATUS_STOP: &str = "nodes/{node}/qemu/{vmid}/status/stop";
}

/// A client for one Proxmox VE endpoint.
///
/// # Examples
///
/// ```no_run
/// use pverest::{PveClient, PveResult};
///
/// #[tokio::main]
/// async fn main() -> PveResult<()> {
///     let client = PveClient::builder()
///         .host("proxmox.example.com")
///         .port(8006)
///         .credentials("user", "password", "pve")
///         .secure(true)
///         .build()?;
///
///     client.login().await?;
///     for vm in client.vms("pve1").await? {
///         println!("{} {}", vm.vmid, vm.status);
///     }
///     Ok(())
/// }
/// ```
pub struct PveClient {
    dispatcher: Dispatcher,
    login: Option<TicketRequest>,
    config: ClientConfig,
}

/// Builder for [`PveClient`] configuration.
#[derive(Debug, Default)]
pub struct PveClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    credentials: Option<(String, String, String)>,
    api_token: Option<(String, String)>,
    secure: bool,
    accept_invalid_certs: bool,
    timeout: Option<Duration>,
    ticket_lifetime: Option<Duration>,
    rate_limit: Option<RateLimitConfig>,
}

impl PveClientBuilder {
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Configures username/password/realm login. The client obtains a
    /// ticket on first use and refreshes it when it expires.
    #[must_use]
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into(), realm.into()));
        self
    }

    /// Configures a static API token (`user@realm!name` plus secret).
    #[must_use]
    pub fn api_token(mut self, token_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.api_token = Some((token_id.into(), secret.into()));
        self
    }

    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Accepts self-signed certificates, the default on fresh PVE installs.
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn ticket_lifetime(mut self, lifetime: Duration) -> Self {
        self.ticket_lifetime = Some(lifetime);
        self
    }

    #[must_use]
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Validates the configuration and builds the client.
    pub fn build(self) -> PveResult<PveClient> {
        let host = self.host.ok_or_else(|| ValidationError::Field {
            field: "host".to_string(),
            message: "Host is required".to_string(),
        })?;
        if self.credentials.is_some() && self.api_token.is_some() {
            return Err(ValidationError::ConstraintViolation(
                "Configure either password credentials or an API token, not both".to_string(),
            )
            .into());
        }

        let endpoint = Endpoint::new(host, self.port.unwrap_or(8006), self.secure)?
            .with_accept_invalid_certs(self.accept_invalid_certs);

        let defaults = ClientConfig::default();
        let config = ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            ticket_lifetime: self.ticket_lifetime.unwrap_or(defaults.ticket_lifetime),
            rate_limit: self.rate_limit,
        };

        let transport = ReqwestTransport::new(endpoint.accept_invalid_certs(), config.timeout)?;
        let initial_credential = self
            .api_token
            .map(|(token_id, secret)| Credential::ApiToken { token_id, secret });
        let dispatcher = Dispatcher::new(
            Arc::new(transport),
            endpoint,
            config.rate_limit.as_ref(),
            initial_credential,
        );

        Ok(PveClient {
            dispatcher,
            login: self
                .credentials
                .map(|(username, password, realm)| TicketRequest::new(username, password, realm)),
            config,
        })
    }
}

impl PveClient {
    /// Creates a new builder for client configuration.
    #[must_use]
    pub fn builder() -> PveClientBuilder {
        PveClientBuilder::default()
    }

    /// Builds a client from pre-constructed parts. Intended for embedders
    /// that manage their own transport or dispatcher wiring.
    #[must_use]
    pub fn from_parts(dispatcher: Dispatcher, config: ClientConfig) -> Self {
        Self {
            dispatcher,
            login: None,
            config,
        }
    }

    /// Returns the dispatcher for direct use.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Authenticates with the configured password credentials and stores
    /// the resulting ticket for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`PveError::Authentication`] when no password credentials
    /// are configured or the server rejects them.
    pub async fn login(&self) -> PveResult<()> {
        let login = self.login.as_ref().ok_or_else(|| {
            PveError::Authentication("No password credentials configured".to_string())
        })?;
        let auth = TicketService::execute(&self.dispatcher, login).await?;
        self.dispatcher.set_credential(Credential::Ticket(auth)).await;
        Ok(())
    }

    /// True if a usable credential (unexpired ticket or API token) is held.
    pub async fn is_authenticated(&self) -> bool {
        self.dispatcher
            .has_usable_credential(self.config.ticket_lifetime)
            .await
    }

    /// Performs a GET against a resolved path.
    pub async fn read(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.call(HttpMethod::Get, path, params).await
    }

    /// Performs a POST against a resolved path.
    pub async fn create(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.call(HttpMethod::Post, path, params).await
    }

    /// Performs a PUT against a resolved path.
    pub async fn update(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.call(HttpMethod::Put, path, params).await
    }

    /// Performs a DELETE against a resolved path.
    pub async fn delete(&self, path: &str, params: &ParameterSet) -> PveResult<ApiResult> {
        self.call(HttpMethod::Delete, path, params).await
    }

    /// Dispatches one call, logging in first (and once more after a 401)
    /// when password credentials are configured. Connection failures are
    /// never retried.
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        params: &ParameterSet,
    ) -> PveResult<ApiResult> {
        self.ensure_ticket().await?;
        let result = self.dispatcher.dispatch(method, path, params).await?;
        if result.status() == 401 && self.login.is_some() {
            self.login().await?;
            return self.dispatcher.dispatch(method, path, params).await;
        }
        Ok(result)
    }

    async fn ensure_ticket(&self) -> PveResult<()> {
        if self.login.is_some()
            && !self
                .dispatcher
                .has_usable_credential(self.config.ticket_lifetime)
                .await
        {
            self.login().await?;
        }
        Ok(())
    }

    /// Returns the API version of the endpoint.
    pub async fn version(&self) -> PveResult<Version> {
        self.read(templates::VERSION, &ParameterSet::new())
            .await?
            .into_data()
    }

    /// Lists the cluster's nodes.
    pub async fn nodes(&self) -> PveResult<Vec<NodeListItem>> {
        self.read(templates::NODES, &ParameterSet::new())
            .await?
            .into_data()
    }

    /// Lists the QEMU virtual machines on a node.
    pub async fn vms(&self, node: &str) -> PveResult<Vec<VmListItem>> {
        let path = ResourcePath::parse(templates::NODE_QEMU).bind(node).resolve()?;
        self.read(&path, &ParameterSet::new()).await?.into_data()
    }

    /// Returns the current runtime status of a VM.
    pub async fn vm_status(&self, node: &str, vmid: u32) -> PveResult<VmStatus> {
        let path = ResourcePath::parse(templates::QEMU_STATUS_CURRENT)
            .bind(node)
            .bind(vmid)
            .resolve()?;
        self.read(&path, &ParameterSet::new()).await?.into_data()
    }

    /// Starts a VM; returns the worker task UPID.
    pub async fn start_vm(&self, node: &str, vmid: u32) -> PveResult<String> {
        let path = ResourcePath::parse(templates::QEMU_STATUS_START)
            .bind(node)
            .bind(vmid)
            .resolve()?;
        self.create(&path, &ParameterSet::new()).await?.into_data()
    }

    /// Stops a VM immediately; returns the worker task UPID.
    pub async fn stop_vm(&self, node: &str, vmid: u32) -> PveResult<String> {
        let path = ResourcePath::parse(templates::QEMU_STATUS_STOP)
            .bind(node)
            .bind(vmid)
            .resolve()?;
        self.create(&path, &ParameterSet::new()).await?.into_data()
    }

    /// Destroys a VM, optionally purging it from job configurations;
    /// returns the worker task UPID.
    pub async fn delete_vm(&self, node: &str, vmid: u32, purge: bool) -> PveResult<String> {
        let path = ResourcePath::parse(templates::QEMU_VM)
            .bind(node)
            .bind(vmid)
            .resolve()?;
        let params = ParameterSet::new().arg("purge", Some(purge));
        self.delete(&path, &params).await?.into_data()
    }
}

#[cfg(test)]
mod tests;
