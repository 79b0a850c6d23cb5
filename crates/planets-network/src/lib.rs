//! Request executor for the PlanetsJPM API
//!
//! One call, one HTTP request: the target is resolved from an endpoint
//! descriptor or a raw URL, the response status is checked and the JSON body
//! is decoded into the caller's type.
//!
//! # Example
//!
//! ```no_run
//! use planets_network::{NetworkError, NetworkService};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Planet {
//!     name: String,
//! }
//!
//! async fn example() -> Result<Planet, NetworkError> {
//!     NetworkService::shared()
//!         .fetch("https://swapi.dev/api/planets/1/")
//!         .await
//! }
//! ```

mod client;
mod config;
pub mod decode;
mod endpoint;
mod error;
mod target;

pub use client::{NetworkService, NoEndpoint, RequestExecutor};
pub use config::{TransportConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESOURCE_TIMEOUT};
pub use endpoint::{Endpoint, HttpMethod};
pub use error::NetworkError;
pub use target::{ResolvedRequest, Target};
