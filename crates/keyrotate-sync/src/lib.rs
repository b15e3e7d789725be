//! reqwest implementations of the collaborators the rotation workflow needs:
//! the hashpool proxy in front of the primary network, and the mirror node's
//! REST API.

pub mod error;
pub mod hashpool;
pub mod mirror;

use std::time::Duration;

use keyrotate_types::ClientError;
use reqwest::Client as HttpClient;

pub use error::{check_status, map_reqwest_error};
pub use hashpool::HashpoolClient;
pub use mirror::MirrorRestClient;

/// HTTP client shared by the proxy and mirror clients.
pub fn http_client(timeout: Duration) -> Result<HttpClient, ClientError> {
    HttpClient::builder()
        .timeout(timeout)
        .user_agent(concat!("keyrotate/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(map_reqwest_error)
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
