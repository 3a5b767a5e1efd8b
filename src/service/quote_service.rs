use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dto::quote_dto::{CreateQuoteRequest, QuoteItemRequest};
use crate::model::profile::Profile;
use crate::model::quote::{Quote, QuoteItem, QuoteStatus};
use crate::render::{build_render_plan, RenderPlan};
use crate::repository::{ProfileRepository, QuoteRepository};
use crate::util::error::ServiceError;

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn create_quote(&self, owner_id: ObjectId, request: CreateQuoteRequest) -> Result<Quote, ServiceError>;
    async fn get_quote(&self, owner_id: ObjectId, id: ObjectId) -> Result<Quote, ServiceError>;
    async fn list_quotes(&self, owner_id: ObjectId) -> Result<Vec<Quote>, ServiceError>;
    async fn replace_items(
        &self,
        owner_id: ObjectId,
        id: ObjectId,
        items: Vec<QuoteItemRequest>,
    ) -> Result<Quote, ServiceError>;
    async fn delete_quote(&self, owner_id: ObjectId, id: ObjectId) -> Result<(), ServiceError>;

    // Public, reached through the link shared with the customer
    async fn change_status(&self, id: ObjectId, status: QuoteStatus) -> Result<Quote, ServiceError>;
    async fn render_plan(&self, id: ObjectId, now: DateTime<Utc>) -> Result<RenderPlan, ServiceError>;
}

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    /// Prefix of the approval links placed in render plans.
    pub public_base_url: String,
}

impl QuoteServiceImpl {
    pub fn new(
        quote_repo: Arc<dyn QuoteRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        public_base_url: impl Into<String>,
    ) -> Self {
        QuoteServiceImpl {
            quote_repo,
            profile_repo,
            public_base_url: public_base_url.into(),
        }
    }

    /// Loads a quote and hides it from anyone but its owner.
    async fn owned_quote(&self, owner_id: ObjectId, id: ObjectId) -> Result<Quote, ServiceError> {
        let quote = self.quote_repo.get_by_id(id).await?;
        if quote.owner_id != owner_id {
            warn!(quote_id = %id, owner_id = %owner_id, "Quote requested by another owner");
            return Err(ServiceError::NotFound(format!("Quote not found for ID: {}", id)));
        }
        Ok(quote)
    }
}

fn convert_items(items: &[QuoteItemRequest]) -> Result<Vec<QuoteItem>, ServiceError> {
    items
        .iter()
        .map(|item| item.to_item().map_err(ServiceError::from))
        .collect()
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, request), fields(owner_id = %owner_id))]
    async fn create_quote(&self, owner_id: ObjectId, request: CreateQuoteRequest) -> Result<Quote, ServiceError> {
        info!("Creating draft quote");
        let items = convert_items(&request.items)?;

        let mut quote = Quote::new_draft(owner_id, request.client_name.trim(), items, Utc::now());
        quote.client_phone = request.client_phone;
        quote.valid_until = request.valid_until;
        quote.payment_terms = request.payment_terms;
        quote.notes = request.notes;
        quote.customization = request.customization;

        let created = self.quote_repo.create(quote).await?;
        info!(quote_id = ?created.id, total = %created.total, "Draft quote created");
        Ok(created)
    }

    #[instrument(skip(self), fields(owner_id = %owner_id, id = %id))]
    async fn get_quote(&self, owner_id: ObjectId, id: ObjectId) -> Result<Quote, ServiceError> {
        self.owned_quote(owner_id, id).await
    }

    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn list_quotes(&self, owner_id: ObjectId) -> Result<Vec<Quote>, ServiceError> {
        Ok(self.quote_repo.list_by_owner(owner_id).await?)
    }

    #[instrument(skip(self, items), fields(owner_id = %owner_id, id = %id, count = items.len()))]
    async fn replace_items(
        &self,
        owner_id: ObjectId,
        id: ObjectId,
        items: Vec<QuoteItemRequest>,
    ) -> Result<Quote, ServiceError> {
        let items = convert_items(&items)?;
        let mut quote = self.owned_quote(owner_id, id).await?;
        quote.replace_items(items, Utc::now());

        let updated = self.quote_repo.update(id, quote).await?;
        info!(total = %updated.total, "Quote items replaced");
        Ok(updated)
    }

    #[instrument(skip(self), fields(owner_id = %owner_id, id = %id))]
    async fn delete_quote(&self, owner_id: ObjectId, id: ObjectId) -> Result<(), ServiceError> {
        self.owned_quote(owner_id, id).await?;
        self.quote_repo.delete(id).await?;
        info!("Quote deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id, status = %status))]
    async fn change_status(&self, id: ObjectId, status: QuoteStatus) -> Result<Quote, ServiceError> {
        let mut quote = self.quote_repo.get_by_id(id).await?;
        let now = Utc::now();
        if quote.transition(status, now)? {
            self.quote_repo.update_status(id, status, now).await?;
            info!("Quote status changed");
        } else {
            info!("Quote already {}, nothing to do", status);
        }
        Ok(quote)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn render_plan(&self, id: ObjectId, now: DateTime<Utc>) -> Result<RenderPlan, ServiceError> {
        let quote = self.quote_repo.get_by_id(id).await?;
        let profile = self
            .profile_repo
            .get(quote.owner_id)
            .await?
            .unwrap_or_else(|| Profile::empty(quote.owner_id));

        let plan = build_render_plan(&quote, &profile, now, &self.public_base_url);
        info!(
            layout = %plan.layout,
            signal = ?plan.detection.signal,
            reason = %plan.detection.reason,
            "Render plan built"
        );
        Ok(plan)
    }
}
