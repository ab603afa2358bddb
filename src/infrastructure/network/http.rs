// HTTP client utilities
use crate::domain::error::LingoError;
use reqwest::Client;

/// Create the shared HTTP client
///
/// No request timeout is set: a hung upstream call hangs only the request
/// that made it.
pub fn create_client() -> Result<Client, LingoError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .user_agent(concat!("task-lingo/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
