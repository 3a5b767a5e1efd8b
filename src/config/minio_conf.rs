use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::{parsed_var, required_var, ConfigError};

/// Object storage holding uploaded business logos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinioConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    /// Public base URL logos are served from, e.g. `https://cdn.example.com`.
    pub public_url_prefix: String,
    pub region: Option<String>,
    pub secure: bool,
}

impl MinioConfig {
    /// Load MinIO configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MINIO_ENDPOINT: MinIO server endpoint (e.g., "localhost:9000")
    /// - MINIO_ACCESS_KEY / MINIO_SECRET_KEY: credentials
    /// - MINIO_BUCKET_NAME: logo bucket (defaults to "logos")
    /// - MINIO_PUBLIC_URL: public prefix for logo links
    /// - MINIO_REGION: Optional region (defaults to "us-east-1")
    /// - MINIO_SECURE: Whether to use HTTPS (defaults to false)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MinIO configuration from environment variables");

        let endpoint = required_var("MINIO_ENDPOINT")?;
        let access_key = required_var("MINIO_ACCESS_KEY")?;
        let secret_key = required_var("MINIO_SECRET_KEY")?;
        let bucket_name = parsed_var("MINIO_BUCKET_NAME", "logos".to_string())?;
        let region = parsed_var("MINIO_REGION", "us-east-1".to_string())?;
        let secure = parsed_var("MINIO_SECURE", false)?;

        // Logos are linked straight from the endpoint unless a CDN prefix is set
        let public_url_prefix = env::var("MINIO_PUBLIC_URL").unwrap_or_else(|_| {
            let fallback = format!("{}://{}", if secure { "https" } else { "http" }, endpoint);
            warn!("MINIO_PUBLIC_URL not set, using endpoint: {}", fallback);
            fallback
        });
        debug!(
            endpoint = %endpoint,
            bucket = %bucket_name,
            secure,
            public_url_prefix = %public_url_prefix,
            "MinIO settings read"
        );

        Ok(Self {
            endpoint,
            access_key,
            secret_key,
            bucket_name,
            public_url_prefix,
            region: Some(region),
            secure,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating MinIO configuration");

        if self.endpoint.is_empty() {
            error!("MinIO endpoint is empty");
            return Err(ConfigError::ValidationError("Endpoint cannot be empty".to_string()));
        }

        if self.access_key.is_empty() || self.secret_key.is_empty() {
            error!("MinIO credentials are empty");
            return Err(ConfigError::ValidationError("Credentials cannot be empty".to_string()));
        }

        if !self.bucket_name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.') {
            error!("Invalid bucket name format: {}", self.bucket_name);
            return Err(ConfigError::ValidationError(
                "Bucket name contains invalid characters".to_string(),
            ));
        }

        if self.bucket_name.len() < 3 || self.bucket_name.len() > 63 {
            error!("Invalid bucket name length: {}", self.bucket_name.len());
            return Err(ConfigError::ValidationError(
                "Bucket name must be between 3 and 63 characters".to_string(),
            ));
        }

        info!("MinIO configuration validation successful");
        Ok(())
    }

    /// Get the full endpoint URL with protocol
    pub fn get_endpoint_url(&self) -> String {
        let protocol = if self.secure { "https" } else { "http" };
        format!("{}://{}", protocol, self.endpoint)
    }

    /// Public link for an object in the logo bucket.
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_url_prefix.trim_end_matches('/'),
            self.bucket_name,
            object_name.trim_start_matches('/')
        )
    }
}

impl Default for MinioConfig {
    fn default() -> Self {
        Self {
            endpoint: "localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket_name: "logos".to_string(),
            public_url_prefix: "http://localhost:9000".to_string(),
            region: Some("us-east-1".to_string()),
            secure: false,
        }
    }
}
