//! Endpoints addressed relative to the configured API base URL

use planets_network::{Endpoint, HttpMethod};
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiEndpoint {
    base: Url,
    path: String,
    method: HttpMethod,
}

impl ApiEndpoint {
    pub fn new(mut base: Url, path: &str, method: HttpMethod) -> Self {
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Self {
            base,
            path: path.trim_start_matches('/').to_string(),
            method,
        }
    }
}

impl Endpoint for ApiEndpoint {
    fn url(&self) -> Option<Url> {
        self.base.join(&self.path).ok()
    }

    fn method(&self) -> HttpMethod {
        self.method
    }
}
