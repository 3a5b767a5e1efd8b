use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::branding::session::ExtractionTicket;
use crate::model::color::HexColor;
use crate::model::profile::{LayoutStyle, PricingTier, Profile};

/// Uploaded logo as read from the multipart body.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl LogoUpload {
    /// Extension used for the stored object, derived from the content type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.split(';').next().unwrap_or_default().trim() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoUploadResponse {
    pub logo_url: String,
    /// Poll `GET /profile/branding` until `latest_ticket` matches and
    /// `extraction_pending` is false.
    pub ticket: ExtractionTicket,
}

/// Explicit save. Absent fields fall back to the live session values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SaveProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub business_name: Option<String>,

    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 7))]
    pub theme_color: Option<String>,

    pub layout_style: Option<LayoutStyle>,

    pub pricing_tier: Option<PricingTier>,

    #[serde(default)]
    pub complete_onboarding: bool,
}

/// Live edit of the branding session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EditBrandingRequest {
    #[validate(length(min = 3, max = 7))]
    pub theme_color: Option<String>,

    pub layout_style: Option<LayoutStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponseDto {
    pub owner_id: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
    /// Effective color, the default when none was chosen.
    pub theme_color: HexColor,
    pub theme_color_explicit: bool,
    pub layout_style: Option<LayoutStyle>,
    pub pricing_tier: Option<PricingTier>,
    pub onboarded: bool,
}

impl From<Profile> for ProfileResponseDto {
    fn from(profile: Profile) -> Self {
        ProfileResponseDto {
            owner_id: profile.id.to_hex(),
            theme_color: profile.effective_theme_color(),
            theme_color_explicit: profile.theme_color.is_some(),
            onboarded: profile.is_onboarded(),
            business_name: profile.business_name,
            phone: profile.phone,
            email: profile.email,
            logo_url: profile.logo_url,
            layout_style: profile.layout_style,
            pricing_tier: profile.pricing_tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_extension() {
        let upload = |ct: &str| LogoUpload {
            filename: "logo".to_string(),
            content_type: ct.to_string(),
            content: Vec::new(),
        };
        assert_eq!(upload("image/png").extension(), "png");
        assert_eq!(upload("image/jpeg; charset=binary").extension(), "jpg");
        assert_eq!(upload("image/svg+xml").extension(), "svg");
    }

    #[test]
    fn test_save_request_validation() {
        let request = SaveProfileRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = SaveProfileRequest {
            business_name: Some("Oficina do Zé".to_string()),
            theme_color: Some("#1e40af".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
