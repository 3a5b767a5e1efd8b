use dotenv::dotenv;
use tracing::{error, info, warn};

use quote_builder_backend::app::App;
use quote_builder_backend::util::logger::Logger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before the logger so LOG_DIR and RUST_LOG from .env apply
    let env_loaded = dotenv();

    let _logger = Logger::new()?;
    info!("🚀 Starting Quote Builder Backend");

    match env_loaded {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new().await.map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;
    app.start().await
}
