use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::branding::extractor::ImagePaletteExtractor;
use crate::config::app_conf::AppConfig;
use crate::config::{BrandingConfig, MinioConfig, MongoConfig};
use crate::repository::{MongoProfileRepository, MongoQuoteRepository};
use crate::router::app_router;
use crate::service::{ProfileServiceImpl, QuoteServiceImpl};
use crate::util::minio::MinioService;

pub struct App {
    config: AppConfig,
    router: Router,
    pub quote_service: Arc<QuoteServiceImpl>,
    pub profile_service: Arc<ProfileServiceImpl>,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env();

        let mongo_config = MongoConfig::from_env()?;
        mongo_config.validate()?;
        let minio_config = MinioConfig::from_env()?;
        let branding_config = BrandingConfig::from_env()?;

        let db = mongo_config.connect().await.map_err(|e| {
            error!("Failed to connect to MongoDB: {}", e);
            e
        })?;
        let quote_repo = Arc::new(MongoQuoteRepository::new(&db, &mongo_config.quote_collection));
        let profile_repo = Arc::new(MongoProfileRepository::new(&db, &mongo_config.profile_collection));

        let storage = Arc::new(MinioService::new(minio_config).await?);
        let extractor = Arc::new(ImagePaletteExtractor::new(&branding_config)?);

        let quote_service = Arc::new(QuoteServiceImpl::new(
            quote_repo,
            profile_repo.clone(),
            config.public_base_url.clone(),
        ));
        let profile_service = Arc::new(ProfileServiceImpl::new(profile_repo, storage, extractor, branding_config));

        let router = app_router(quote_service.clone(), profile_service.clone());
        Ok(App {
            config,
            router,
            quote_service,
            profile_service,
        })
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
