//! HTTP transport used by providers to reach token and resource endpoints.

mod client;
mod transport;

pub use client::{HttpClientConfig, HttpTransport};
pub use reqwest::Method;
pub use transport::{Parameters, Response, Transport};
