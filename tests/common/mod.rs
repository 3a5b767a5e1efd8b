#![allow(dead_code)]

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use quote_builder_backend::branding::extractor::{DominantColor, ExtractionError, PaletteExtractor};
use quote_builder_backend::config::BrandingConfig;
use quote_builder_backend::model::color::HexColor;
use quote_builder_backend::model::profile::Profile;
use quote_builder_backend::model::quote::{Quote, QuoteStatus};
use quote_builder_backend::repository::{ProfileRepository, QuoteRepository, RepositoryError, RepositoryResult};
use quote_builder_backend::service::{ProfileServiceImpl, QuoteServiceImpl};
use quote_builder_backend::util::minio::{MinioError, ObjectStorage};

pub const PUBLIC_URL: &str = "https://orcamentos.test";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    pub quotes: Mutex<HashMap<ObjectId, Quote>>,
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create(&self, mut quote: Quote) -> RepositoryResult<Quote> {
        let id = ObjectId::new();
        quote.id = Some(id);
        self.quotes.lock().unwrap().insert(id, quote.clone());
        Ok(quote)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        self.quotes
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
    }

    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        match quotes.get_mut(&id) {
            Some(stored) => {
                *stored = Quote { id: Some(id), ..quote };
                Ok(stored.clone())
            }
            None => Err(RepositoryError::not_found(format!("No quote found to update for ID: {}", id))),
        }
    }

    async fn update_status(&self, id: ObjectId, status: QuoteStatus, updated_at: DateTime<Utc>) -> RepositoryResult<()> {
        let mut quotes = self.quotes.lock().unwrap();
        let stored = quotes
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::not_found(format!("No quote found to update status for ID: {}", id)))?;
        stored.status = status;
        stored.updated_at = updated_at;
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        self.quotes
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(format!("No quote found to delete for ID: {}", id)))
    }

    async fn list_by_owner(&self, owner_id: ObjectId) -> RepositoryResult<Vec<Quote>> {
        let mut quotes: Vec<Quote> = self
            .quotes
            .lock()
            .unwrap()
            .values()
            .filter(|q| q.owner_id == owner_id)
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes)
    }
}

#[derive(Default)]
pub struct InMemoryProfileRepository {
    pub profiles: Mutex<HashMap<ObjectId, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn with(profile: Profile) -> Self {
        let repo = Self::default();
        repo.profiles.lock().unwrap().insert(profile.id, profile);
        repo
    }

    pub fn stored(&self, owner_id: ObjectId) -> Option<Profile> {
        self.profiles.lock().unwrap().get(&owner_id).cloned()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get(&self, owner_id: ObjectId) -> RepositoryResult<Option<Profile>> {
        Ok(self.stored(owner_id))
    }

    async fn upsert(&self, profile: Profile) -> RepositoryResult<Profile> {
        self.profiles.lock().unwrap().insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn set_logo_url(&self, owner_id: ObjectId, logo_url: &str, updated_at: DateTime<Utc>) -> RepositoryResult<()> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.entry(owner_id).or_insert_with(|| Profile::empty(owner_id));
        profile.logo_url = Some(logo_url.to_string());
        profile.updated_at = Some(updated_at);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    pub objects: Mutex<Vec<(String, usize, Option<String>)>>,
    next_put_gate: Mutex<Option<Arc<Notify>>>,
}

impl InMemoryStorage {
    /// The next `put_object` call waits until the returned gate is opened.
    pub fn hold_next_put(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.next_put_gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put_object(&self, object_name: &str, data: Vec<u8>, content_type: Option<&str>) -> Result<(), MinioError> {
        let gate = self.next_put_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.objects
            .lock()
            .unwrap()
            .push((object_name.to_string(), data.len(), content_type.map(str::to_string)));
        Ok(())
    }

    fn public_url(&self, object_name: &str) -> String {
        format!("https://cdn.test/logos/{}", object_name)
    }
}

/// Answers per URL, falling back to a default. A gated URL blocks until
/// its gate is opened.
#[derive(Default)]
pub struct ScriptedExtractor {
    responses: Mutex<HashMap<String, Option<HexColor>>>,
    default: Mutex<Option<HexColor>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl ScriptedExtractor {
    /// `None` makes the extraction fail.
    pub fn respond(&self, url: &str, color: Option<HexColor>) {
        self.responses.lock().unwrap().insert(url.to_string(), color);
    }

    pub fn respond_by_default(&self, color: HexColor) {
        *self.default.lock().unwrap() = Some(color);
    }

    pub fn gate(&self, url: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(url.to_string(), gate.clone());
        gate
    }
}

#[async_trait]
impl PaletteExtractor for ScriptedExtractor {
    async fn dominant_colors(&self, url: &str) -> Result<Vec<DominantColor>, ExtractionError> {
        let gate = self.gates.lock().unwrap().get(url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let scripted = self.responses.lock().unwrap().get(url).copied();
        let color = match scripted {
            Some(color) => color,
            None => *self.default.lock().unwrap(),
        };
        match color {
            Some(hex) => Ok(vec![DominantColor { hex, area: 1.0 }]),
            None => Err(ExtractionError::Fetch(format!("connection refused: {}", url))),
        }
    }
}

pub struct TestServices {
    pub quote_repo: Arc<InMemoryQuoteRepository>,
    pub profile_repo: Arc<InMemoryProfileRepository>,
    pub storage: Arc<InMemoryStorage>,
    pub extractor: Arc<ScriptedExtractor>,
    pub quote_service: Arc<QuoteServiceImpl>,
    pub profile_service: Arc<ProfileServiceImpl>,
}

pub fn services_with(profile_repo: InMemoryProfileRepository) -> TestServices {
    let quote_repo = Arc::new(InMemoryQuoteRepository::default());
    let profile_repo = Arc::new(profile_repo);
    let storage = Arc::new(InMemoryStorage::default());
    let extractor = Arc::new(ScriptedExtractor::default());

    let quote_service = Arc::new(QuoteServiceImpl::new(quote_repo.clone(), profile_repo.clone(), PUBLIC_URL));
    let profile_service = Arc::new(ProfileServiceImpl::new(
        profile_repo.clone(),
        storage.clone(),
        extractor.clone(),
        BrandingConfig::default(),
    ));

    TestServices {
        quote_repo,
        profile_repo,
        storage,
        extractor,
        quote_service,
        profile_service,
    }
}

pub fn services() -> TestServices {
    services_with(InMemoryProfileRepository::default())
}

/// Polls until no extraction is pending for `owner_id`.
pub async fn wait_for_extraction(service: &ProfileServiceImpl, owner_id: ObjectId) {
    use quote_builder_backend::service::ProfileService;
    for _ in 0..200 {
        let state = service.branding_state(owner_id).await.unwrap();
        if !state.extraction_pending {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("extraction did not finish");
}
