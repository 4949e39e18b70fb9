//! Shared HTTP client instance.

use std::sync::LazyLock;
use std::time::Duration;

/// Global HTTP client, initialized lazily on first access and reused for both
/// trigger calls and webhook deliveries (connection pooling, DNS caching).
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(concat!("chronod/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_initializes() {
        let _ = &*HTTP_CLIENT;
    }
}
