//! Request target selection

use url::Url;

use crate::endpoint::{Endpoint, HttpMethod};
use crate::error::NetworkError;

/// Where a request goes, selected once from the caller's inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Endpoint descriptor that produced a valid URL
    Endpoint {
        /// Descriptor URL
        url: Url,
        /// Descriptor method
        method: HttpMethod,
    },
    /// Raw URL string fallback, always requested with GET
    RawUrl(Url),
    /// Nothing usable was supplied
    None,
}

/// URL and method a request is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Request URL
    pub url: Url,
    /// Request method
    pub method: HttpMethod,
}

impl Target {
    /// Select the target, first match wins: endpoint, then raw URL, then none
    pub fn select<E>(endpoint: Option<&E>, raw_url: Option<&str>) -> Self
    where
        E: Endpoint + ?Sized,
    {
        if let Some(endpoint) = endpoint {
            if let Some(url) = endpoint.url().filter(is_http) {
                return Target::Endpoint {
                    url,
                    method: endpoint.method(),
                };
            }
        }

        match raw_url
            .and_then(|raw| Url::parse(raw.trim()).ok())
            .filter(is_http)
        {
            Some(url) => Target::RawUrl(url),
            None => Target::None,
        }
    }

    /// Turn the selection into a URL and method
    pub fn resolve(self) -> Result<ResolvedRequest, NetworkError> {
        match self {
            Target::Endpoint { url, method } => Ok(ResolvedRequest { url, method }),
            Target::RawUrl(url) => Ok(ResolvedRequest {
                url,
                method: HttpMethod::Get,
            }),
            Target::None => Err(NetworkError::InvalidTarget),
        }
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
