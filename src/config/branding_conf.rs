use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;
use crate::model::color::{HexColor, DEFAULT_THEME_COLOR};

const DEFAULT_MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// Logo upload limits and brand color extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    pub default_theme_color: HexColor,
    pub max_logo_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub user_agent: String,
}

impl BrandingConfig {
    /// Expected environment variables (all optional):
    /// - BRANDING_DEFAULT_THEME_COLOR: fallback accent color (defaults to #0d9b5c)
    /// - BRANDING_MAX_LOGO_BYTES: upload/download size limit (defaults to 2 MiB)
    /// - BRANDING_USER_AGENT: user agent for logo downloads
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading branding configuration from environment variables");

        let default_theme_color = match env::var("BRANDING_DEFAULT_THEME_COLOR") {
            Ok(raw) => HexColor::parse(&raw).map_err(|e| {
                error!("Invalid BRANDING_DEFAULT_THEME_COLOR: {}", e);
                ConfigError::InvalidValue(format!("BRANDING_DEFAULT_THEME_COLOR: {}", e))
            })?,
            Err(_) => {
                debug!("BRANDING_DEFAULT_THEME_COLOR not set, using {}", DEFAULT_THEME_COLOR);
                DEFAULT_THEME_COLOR
            }
        };

        let max_logo_bytes = match env::var("BRANDING_MAX_LOGO_BYTES") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                error!("Invalid BRANDING_MAX_LOGO_BYTES value: {}", raw);
                ConfigError::ParseError(format!("BRANDING_MAX_LOGO_BYTES: {}", raw))
            })?,
            Err(_) => {
                warn!("BRANDING_MAX_LOGO_BYTES not set, using default: {}", DEFAULT_MAX_LOGO_BYTES);
                DEFAULT_MAX_LOGO_BYTES
            }
        };

        let user_agent = env::var("BRANDING_USER_AGENT")
            .unwrap_or_else(|_| concat!("quote-builder-backend/", env!("CARGO_PKG_VERSION")).to_string());

        let config = BrandingConfig {
            default_theme_color,
            max_logo_bytes,
            user_agent,
            ..Default::default()
        };
        config.validate()?;

        info!("Branding configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_logo_bytes == 0 {
            error!("Branding max logo size is 0");
            return Err(ConfigError::ValidationError("Max logo size must be greater than 0".to_string()));
        }
        if self.allowed_content_types.is_empty() {
            error!("No allowed logo content types configured");
            return Err(ConfigError::ValidationError("At least one logo content type is required".to_string()));
        }
        Ok(())
    }

    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        self.allowed_content_types.iter().any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        BrandingConfig {
            default_theme_color: DEFAULT_THEME_COLOR,
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "image/svg+xml".to_string(),
            ],
            user_agent: concat!("quote-builder-backend/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
