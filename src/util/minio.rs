use crate::config::MinioConfig;
use async_trait::async_trait;
use minio::s3::args::{BucketExistsArgs, MakeBucketArgs, PutObjectArgs};
use minio::s3::client::{Client, ClientBuilder};
use minio::s3::creds::StaticProvider;
use minio::s3::http::BaseUrl;
use std::io::Cursor;
use tracing::{debug, error, info, instrument, warn};

/// Where uploaded logos end up. Implemented by [`MinioService`].
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(
        &self,
        object_name: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), MinioError>;

    /// Publicly fetchable URL of a stored object.
    fn public_url(&self, object_name: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct MinioService {
    client: Client,
    pub config: MinioConfig,
}

impl MinioService {
    /// Connects to MinIO and creates the logo bucket when it is missing.
    #[instrument(skip(config), fields(endpoint = %config.endpoint, bucket = %config.bucket_name))]
    pub async fn new(config: MinioConfig) -> Result<Self, MinioError> {
        config
            .validate()
            .map_err(|e| MinioError::ConfigError(e.to_string()))?;

        let endpoint = config.get_endpoint_url();
        let base_url = endpoint.parse::<BaseUrl>().map_err(|e| {
            error!("Invalid MinIO endpoint {}: {}", endpoint, e);
            MinioError::ConnectionError(format!("Invalid endpoint URL: {}", e))
        })?;

        let provider = StaticProvider::new(&config.access_key, &config.secret_key, None);
        let client = ClientBuilder::new(base_url)
            .provider(Some(Box::new(provider)))
            .build()
            .map_err(|e| MinioError::ConnectionError(format!("Client creation failed: {}", e)))?;

        let service = Self { client, config };
        service.ensure_logo_bucket().await?;
        info!("MinIO ready at {}", endpoint);
        Ok(service)
    }

    async fn ensure_logo_bucket(&self) -> Result<(), MinioError> {
        let bucket = self.config.bucket_name.as_str();
        let exists_args = BucketExistsArgs::new(bucket).map_err(|e| MinioError::InvalidArguments(e.to_string()))?;
        let exists = self
            .client
            .bucket_exists(&exists_args)
            .await
            .map_err(|e| MinioError::OperationError(format!("Bucket exists check failed: {}", e)))?;
        if exists {
            debug!("Logo bucket '{}' present", bucket);
            return Ok(());
        }

        warn!("Logo bucket '{}' missing, creating it", bucket);
        let make_args = MakeBucketArgs::new(bucket).map_err(|e| MinioError::InvalidArguments(e.to_string()))?;
        self.client.make_bucket(&make_args).await.map_err(|e| {
            error!("Failed to create bucket '{}': {}", bucket, e);
            MinioError::OperationError(format!("Bucket creation failed: {}", e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MinioService {
    #[instrument(skip(self, data), fields(object_name = %object_name, size = data.len()))]
    async fn put_object(
        &self,
        object_name: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), MinioError> {
        let client = self.client.clone();
        let bucket = self.config.bucket_name.clone();
        let object = object_name.to_string();
        let content_type = content_type.map(str::to_string);

        // PutObjectArgs borrows a blocking reader, so the upload runs off the runtime
        tokio::task::spawn_blocking(move || {
            let size = data.len();
            let mut reader = Cursor::new(data);
            let mut args = PutObjectArgs::new(&bucket, &object, &mut reader, Some(size), None)
                .map_err(|e| MinioError::InvalidArguments(e.to_string()))?;
            if let Some(ct) = content_type.as_deref() {
                args.content_type = ct;
            }

            futures::executor::block_on(client.put_object(&mut args))
                .map_err(|e| MinioError::OperationError(format!("Upload failed: {}", e)))?;
            info!("Stored '{}' in bucket '{}'", object, bucket);
            Ok(())
        })
        .await
        .map_err(|e| MinioError::OperationError(format!("Upload task failed: {}", e)))?
    }

    fn public_url(&self, object_name: &str) -> String {
        self.config.public_url(object_name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MinioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Operation error: {0}")]
    OperationError(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
