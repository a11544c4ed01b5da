//! HTTP backend for the HashiCups API.
//!
//! This module provides the [`HttpBackend`] implementation, a thin blocking
//! wrapper over a `ureq` agent. Timeouts are enforced by the agent; nothing
//! here retries.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{AuthResponse, Coffee, Order, OrderItem, SignInPayload, order_payload};
use std::time::Duration;

/// Default API location used by the HashiCups demo stack.
pub const DEFAULT_HOST: &str = "http://localhost:19090";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HashiCups HTTP backend.
///
/// # Example
///
/// ```no_run
/// use hashicups_client::backend::http::HttpBackend;
/// use hashicups_client::backend::Backend;
///
/// let backend = HttpBackend::new("http://localhost:19090");
/// let coffees = backend.get_coffees().unwrap();
/// println!("Found {} coffees", coffees.len());
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL, without trailing slash.
    host: String,
    /// Token from `/signin`, sent with order requests.
    token: Option<String>,
}

impl HttpBackend {
    /// Create a backend with the default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_timeout(host, DEFAULT_TIMEOUT)
    }

    /// Create a backend whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(host: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let host = host.into().trim_end_matches('/').to_string();
        Self {
            agent: ureq::Agent::new_with_config(config),
            host,
            token: None,
        }
    }

    /// Get the API base URL.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Exchange credentials for a token and keep it for later requests.
    pub fn sign_in(&mut self, username: &str, password: &str) -> Result<AuthResponse> {
        let url = format!("{}/signin", self.host);
        log::debug!("POST {} as {}", url, username);

        let auth: AuthResponse = self
            .agent
            .post(&url)
            .send_json(SignInPayload { username, password })?
            .body_mut()
            .read_json()?;

        if auth.token.is_empty() {
            return Err(Error::InvalidResponse(
                "sign-in succeeded without a token".to_string(),
            ));
        }

        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.host)
    }

    fn order_url(&self, id: &str) -> String {
        format!("{}/orders/{}", self.host, id)
    }

    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(Error::NotSignedIn)
    }
}

impl Backend for HttpBackend {
    fn get_coffees(&self) -> Result<Vec<Coffee>> {
        let url = format!("{}/coffees", self.host);
        log::debug!("GET {}", url);

        let coffees: Vec<Coffee> = self.agent.get(&url).call()?.body_mut().read_json()?;
        Ok(coffees)
    }

    fn create_order(&self, items: &[OrderItem]) -> Result<Order> {
        let url = self.orders_url();
        log::debug!("POST {} ({} items)", url, items.len());

        let order: Order = self
            .agent
            .post(&url)
            .header("Authorization", self.token()?)
            .send_json(order_payload(items))?
            .body_mut()
            .read_json()?;
        Ok(order)
    }

    fn get_order(&self, id: &str) -> Result<Order> {
        let url = self.order_url(id);
        log::debug!("GET {}", url);

        let order: Order = self
            .agent
            .get(&url)
            .header("Authorization", self.token()?)
            .call()?
            .body_mut()
            .read_json()?;
        Ok(order)
    }

    fn update_order(&self, id: &str, items: &[OrderItem]) -> Result<Order> {
        let url = self.order_url(id);
        log::debug!("PUT {} ({} items)", url, items.len());

        let order: Order = self
            .agent
            .put(&url)
            .header("Authorization", self.token()?)
            .send_json(order_payload(items))?
            .body_mut()
            .read_json()?;
        Ok(order)
    }
}
