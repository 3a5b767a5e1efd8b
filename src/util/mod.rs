pub mod error;
pub mod logger;
pub mod minio;
pub mod money;
