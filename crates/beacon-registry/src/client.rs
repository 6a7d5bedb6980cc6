//! REST client for the registry endpoint

use beacon_core::{
    Instance, RegisterRequest, RegistryConfig, RegistryError, RegistryResponse, RegistryResult,
};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response};
use tracing::debug;

/// Client for the registry's REST surface.
///
/// Stateless besides connection configuration; cheap to clone. Timeout
/// behavior is whatever the underlying transport provides.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a new registry client
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username,
            password: config.password,
            http: reqwest::Client::new(),
        }
    }

    /// Create or update an instance registration (full descriptor)
    pub async fn register_instance(&self, instance: &Instance) -> RegistryResult<()> {
        let url = format!("{}/apps/{}", self.base_url, instance.app);
        debug!(instance_id = %instance.instance_id, url = %url, "Pushing instance descriptor");
        let response = self
            .request(Method::POST, url)
            .json(&RegisterRequest { instance })
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Renew the lease for an instance (body-less heartbeat)
    pub async fn renew_lease(&self, app: &str, instance_id: &str) -> RegistryResult<()> {
        let url = format!("{}/apps/{}/{}", self.base_url, app, instance_id);
        let response = self.request(Method::PUT, url).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Delete an instance registration
    pub async fn deregister_instance(&self, app: &str, instance_id: &str) -> RegistryResult<()> {
        let url = format!("{}/apps/{}/{}", self.base_url, app, instance_id);
        debug!(instance_id = %instance_id, url = %url, "Deleting instance registration");
        let response = self.request(Method::DELETE, url).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Fetch one application by name
    pub async fn fetch_application(&self, name: &str) -> RegistryResult<RegistryResponse> {
        self.fetch(format!("{}/apps/{}", self.base_url, name)).await
    }

    /// Fetch every application known to the registry
    pub async fn fetch_all_applications(&self) -> RegistryResult<RegistryResponse> {
        self.fetch(format!("{}/apps", self.base_url)).await
    }

    /// Fetch a single instance
    pub async fn fetch_instance(
        &self,
        app: &str,
        instance_id: &str,
    ) -> RegistryResult<RegistryResponse> {
        self.fetch(format!("{}/apps/{}/{}", self.base_url, app, instance_id))
            .await
    }

    async fn fetch(&self, url: String) -> RegistryResult<RegistryResponse> {
        debug!(url = %url, "Fetching from registry");
        let response = self
            .request(Method::GET, url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_deref()),
            None => builder,
        }
    }

    async fn expect_success(response: Response) -> RegistryResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await?;
            Err(RegistryError::UnexpectedStatus {
                code: status.as_u16(),
                body,
            })
        }
    }
}
