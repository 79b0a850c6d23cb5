//! Request executor

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use serde::de::DeserializeOwned;
use tracing::Instrument;

use crate::config::TransportConfig;
use crate::decode::decode;
use crate::endpoint::{Endpoint, HttpMethod};
use crate::error::NetworkError;
use crate::target::{ResolvedRequest, Target};

static SHARED: Lazy<NetworkService> = Lazy::new(NetworkService::new);

/// Issues one HTTP call and decodes its JSON body
///
/// Implemented by [`NetworkService`]; callers that want to swap in a fake
/// executor in tests should depend on this trait.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Resolve the target, send the request and decode the response body as `T`
    async fn request<T, E>(
        &self,
        endpoint: Option<&E>,
        raw_url: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<T, NetworkError>
    where
        T: DeserializeOwned + Send,
        E: Endpoint + Sync + ?Sized;
}

/// Stateless HTTP request executor
///
/// Holds only its transport configuration. Every call builds its own
/// transport client, so one instance can serve any number of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct NetworkService {
    config: TransportConfig,
}

impl NetworkService {
    /// Create a new service with default timeouts
    pub fn new() -> Self {
        Self {
            config: TransportConfig::default(),
        }
    }

    /// Create a new service with the given transport configuration
    pub fn with_config(config: TransportConfig) -> Result<Self, NetworkError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Process-wide instance with default timeouts
    pub fn shared() -> &'static NetworkService {
        &SHARED
    }

    /// Transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// GET a raw URL and decode the JSON body
    pub async fn fetch<T>(&self, raw_url: &str) -> Result<T, NetworkError>
    where
        T: DeserializeOwned,
    {
        self.execute::<T, NoEndpoint>(None, Some(raw_url), None).await
    }

    /// Call an endpoint descriptor and decode the JSON body
    pub async fn send<T, E>(&self, endpoint: &E, body: Option<Vec<u8>>) -> Result<T, NetworkError>
    where
        T: DeserializeOwned,
        E: Endpoint + ?Sized,
    {
        self.execute(Some(endpoint), None, body).await
    }

    /// Resolve the target, send the request and decode the response body as `T`
    ///
    /// The endpoint wins when it yields a valid URL; otherwise `raw_url` is
    /// requested with GET. Any failure aborts the call, nothing is retried.
    pub async fn execute<T, E>(
        &self,
        endpoint: Option<&E>,
        raw_url: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<T, NetworkError>
    where
        T: DeserializeOwned,
        E: Endpoint + ?Sized,
    {
        let ResolvedRequest { url, method } = Target::select(endpoint, raw_url).resolve()?;

        let span = tracing::debug_span!("request", method = %method, url = %url);
        self.perform(url, method, body).instrument(span).await
    }

    async fn perform<T>(
        &self,
        url: url::Url,
        method: HttpMethod,
        body: Option<Vec<u8>>,
    ) -> Result<T, NetworkError>
    where
        T: DeserializeOwned,
    {
        let client = self.transport()?;

        let mut request = client
            .request(method.into(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        if let Some(body) = body {
            if method == HttpMethod::Get {
                tracing::warn!("Sending a {} byte body with a GET request", body.len());
            }
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!("Server responded with {}", status);
            return Err(NetworkError::ServerError {
                status_code: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(NetworkError::from_body)?;

        match decode(&bytes) {
            Ok(value) => {
                tracing::debug!("Decoded {} byte response ({})", bytes.len(), status);
                Ok(value)
            }
            Err(failure) => {
                tracing::warn!(
                    "Decoding error into {}: {}",
                    std::any::type_name::<T>(),
                    failure
                );
                Err(NetworkError::Decoding)
            }
        }
    }

    /// Fresh transport client for a single call
    fn transport(&self) -> Result<reqwest::Client, NetworkError> {
        reqwest::Client::builder()
            .connect_timeout(self.config.request_timeout)
            .read_timeout(self.config.request_timeout)
            .timeout(self.config.resource_timeout)
            .build()
            .map_err(|e| NetworkError::Config(e.to_string()))
    }
}

#[async_trait]
impl RequestExecutor for NetworkService {
    async fn request<T, E>(
        &self,
        endpoint: Option<&E>,
        raw_url: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<T, NetworkError>
    where
        T: DeserializeOwned + Send,
        E: Endpoint + Sync + ?Sized,
    {
        self.execute(endpoint, raw_url, body).await
    }
}

/// Placeholder descriptor for calls that only carry a raw URL
#[derive(Debug)]
pub enum NoEndpoint {}

impl Endpoint for NoEndpoint {
    fn url(&self) -> Option<url::Url> {
        match *self {}
    }

    fn method(&self) -> HttpMethod {
        match *self {}
    }
}
