use std::env;
use tracing::{debug, warn};

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL customers use to open shared quotes.
    pub public_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let public_base_url = env::var("APP_PUBLIC_URL").unwrap_or_else(|_| {
            let fallback = format!("http://{}:{}", host, port);
            warn!("APP_PUBLIC_URL not set, using {}", fallback);
            fallback
        });
        debug!("App config: host={}, port={}, public_base_url={}", host, port, public_base_url);
        AppConfig { host, port, public_base_url }
    }
}
