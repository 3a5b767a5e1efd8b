use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::branding::extractor::{extract_brand_color, PaletteExtractor};
use crate::branding::session::{
    ApplyOutcome, BrandingSession, BrandingSnapshot, ExtractionTicket, SessionRegistry,
};
use crate::config::BrandingConfig;
use crate::dto::profile_dto::{LogoUpload, LogoUploadResponse, SaveProfileRequest};
use crate::model::color::HexColor;
use crate::model::profile::{LayoutStyle, Profile};
use crate::repository::ProfileRepository;
use crate::util::error::ServiceError;
use crate::util::minio::ObjectStorage;

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self, owner_id: ObjectId) -> Result<Profile, ServiceError>;
    async fn save_profile(&self, owner_id: ObjectId, request: SaveProfileRequest) -> Result<Profile, ServiceError>;
    async fn upload_logo(&self, owner_id: ObjectId, upload: LogoUpload) -> Result<LogoUploadResponse, ServiceError>;
    async fn branding_state(&self, owner_id: ObjectId) -> Result<BrandingSnapshot, ServiceError>;
    /// Unsaved color/layout edits. Nothing is persisted until `save_profile`.
    async fn edit_branding(
        &self,
        owner_id: ObjectId,
        theme_color: Option<HexColor>,
        layout: Option<LayoutStyle>,
    ) -> Result<BrandingSnapshot, ServiceError>;
    /// Returns false when there was no open session.
    fn discard_session(&self, owner_id: ObjectId) -> bool;
}

pub struct ProfileServiceImpl {
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub extractor: Arc<dyn PaletteExtractor>,
    pub sessions: Arc<SessionRegistry>,
    pub config: BrandingConfig,
}

impl ProfileServiceImpl {
    pub fn new(
        profile_repo: Arc<dyn ProfileRepository>,
        storage: Arc<dyn ObjectStorage>,
        extractor: Arc<dyn PaletteExtractor>,
        config: BrandingConfig,
    ) -> Self {
        ProfileServiceImpl {
            profile_repo,
            storage,
            extractor,
            sessions: Arc::new(SessionRegistry::new(config.default_theme_color)),
            config,
        }
    }

    async fn load_profile(&self, owner_id: ObjectId) -> Result<Profile, ServiceError> {
        Ok(self
            .profile_repo
            .get(owner_id)
            .await?
            .unwrap_or_else(|| Profile::empty(owner_id)))
    }

    async fn open_session(&self, owner_id: ObjectId) -> Result<Arc<BrandingSession>, ServiceError> {
        match self.sessions.get(&owner_id) {
            Some(session) => Ok(session),
            None => Ok(self.sessions.open(&self.load_profile(owner_id).await?)),
        }
    }

    fn validate_logo(&self, upload: &LogoUpload) -> Result<(), ServiceError> {
        if upload.content.is_empty() {
            return Err(ServiceError::InvalidInput("Logo file is empty".to_string()));
        }
        if upload.content.len() > self.config.max_logo_bytes {
            return Err(ServiceError::InvalidInput(format!(
                "Logo is {} bytes, the limit is {} bytes",
                upload.content.len(),
                self.config.max_logo_bytes
            )));
        }
        if !self.config.accepts_content_type(&upload.content_type) {
            return Err(ServiceError::InvalidInput(format!(
                "Unsupported logo type '{}', expected one of: {}",
                upload.content_type,
                self.config.allowed_content_types.join(", ")
            )));
        }
        Ok(())
    }

    /// Issues a ticket on `session` and extracts the brand color of `logo_url`
    /// in the background. The task reports whether its result was applied.
    pub fn start_extraction(
        &self,
        session: Arc<BrandingSession>,
        logo_url: String,
    ) -> (ExtractionTicket, JoinHandle<ApplyOutcome>) {
        let ticket = session.begin_extraction();
        let handle = self.spawn_extraction(session, ticket, logo_url);
        (ticket, handle)
    }

    fn spawn_extraction(
        &self,
        session: Arc<BrandingSession>,
        ticket: ExtractionTicket,
        logo_url: String,
    ) -> JoinHandle<ApplyOutcome> {
        let extractor = Arc::clone(&self.extractor);
        tokio::spawn(async move {
            let color = extract_brand_color(extractor.as_ref(), &logo_url).await;
            let outcome = session.complete_extraction(ticket, color);
            debug!(
                owner_id = %session.owner_id(),
                ticket = ticket.value(),
                outcome = ?outcome,
                "Extraction finished"
            );
            outcome
        })
    }

    /// Stores the logo under a fresh object name. The profile's `logo_url`
    /// is only written while `ticket` is still the latest upload.
    async fn store_logo(
        &self,
        owner_id: ObjectId,
        session: &BrandingSession,
        ticket: ExtractionTicket,
        upload: LogoUpload,
    ) -> Result<String, ServiceError> {
        let object_name = format!(
            "{}/logo-{}.{}",
            owner_id.to_hex(),
            uuid::Uuid::new_v4().simple(),
            upload.extension()
        );
        self.storage
            .put_object(&object_name, upload.content, Some(upload.content_type.as_str()))
            .await?;
        let logo_url = self.storage.public_url(&object_name);
        info!(original_filename = %upload.filename, logo_url = %logo_url, "Logo stored");

        if session.is_latest(ticket) {
            self.profile_repo
                .set_logo_url(owner_id, &logo_url, Utc::now())
                .await?;
        } else {
            info!(ticket = ticket.value(), "Superseded by a newer upload, profile left unchanged");
        }
        Ok(logo_url)
    }
}

#[async_trait]
impl ProfileService for ProfileServiceImpl {
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn get_profile(&self, owner_id: ObjectId) -> Result<Profile, ServiceError> {
        self.load_profile(owner_id).await
    }

    #[instrument(skip(self, request), fields(owner_id = %owner_id))]
    async fn save_profile(&self, owner_id: ObjectId, request: SaveProfileRequest) -> Result<Profile, ServiceError> {
        let mut profile = self.load_profile(owner_id).await?;
        let session = self.sessions.get(&owner_id);

        let requested_color = request.theme_color.as_deref().map(HexColor::parse).transpose()?;
        let live_color = session.as_ref().and_then(|s| s.unsaved_theme_color());
        let live_layout = session.as_ref().and_then(|s| s.unsaved_layout());

        profile.theme_color = requested_color.or(live_color).or(profile.theme_color);
        profile.layout_style = request.layout_style.or(live_layout).or(profile.layout_style);
        if request.business_name.is_some() {
            profile.business_name = request.business_name;
        }
        if request.phone.is_some() {
            profile.phone = request.phone;
        }
        if request.email.is_some() {
            profile.email = request.email;
        }
        if request.pricing_tier.is_some() {
            profile.pricing_tier = request.pricing_tier;
        }

        let now = Utc::now();
        if request.complete_onboarding && profile.onboarded_at.is_none() {
            profile.onboarded_at = Some(now);
        }
        profile.updated_at = Some(now);

        let saved = self.profile_repo.upsert(profile).await?;
        if let Some(session) = session {
            session.rebase(&saved);
        }
        info!(theme_color = ?saved.theme_color, layout = ?saved.layout_style, "Profile saved");
        Ok(saved)
    }

    #[instrument(skip(self, upload), fields(owner_id = %owner_id, content_type = %upload.content_type, size = upload.content.len()))]
    async fn upload_logo(&self, owner_id: ObjectId, upload: LogoUpload) -> Result<LogoUploadResponse, ServiceError> {
        if let Err(e) = self.validate_logo(&upload) {
            warn!("Rejected logo upload: {}", e);
            return Err(e);
        }

        // The ticket is taken before any write so upload order decides the winner.
        let session = self.open_session(owner_id).await?;
        let ticket = session.begin_extraction();

        let logo_url = match self.store_logo(owner_id, &session, ticket, upload).await {
            Ok(logo_url) => logo_url,
            Err(e) => {
                session.complete_extraction(ticket, None);
                return Err(e);
            }
        };
        if session.is_latest(ticket) {
            session.set_logo_url(logo_url.clone());
            self.spawn_extraction(session, ticket, logo_url.clone());
        }

        Ok(LogoUploadResponse { logo_url, ticket })
    }

    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn branding_state(&self, owner_id: ObjectId) -> Result<BrandingSnapshot, ServiceError> {
        if let Some(session) = self.sessions.get(&owner_id) {
            return Ok(session.snapshot());
        }
        let profile = self.load_profile(owner_id).await?;
        Ok(BrandingSession::new(&profile, self.config.default_theme_color).snapshot())
    }

    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn edit_branding(
        &self,
        owner_id: ObjectId,
        theme_color: Option<HexColor>,
        layout: Option<LayoutStyle>,
    ) -> Result<BrandingSnapshot, ServiceError> {
        let session = self.open_session(owner_id).await?;
        if let Some(color) = theme_color {
            session.set_theme_color(color);
        }
        if let Some(layout) = layout {
            session.set_layout(layout);
        }
        Ok(session.snapshot())
    }

    fn discard_session(&self, owner_id: ObjectId) -> bool {
        self.sessions.discard(&owner_id)
    }
}
