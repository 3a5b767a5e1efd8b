use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use tracing::{debug, error, info, warn};

use crate::model::quote::{Quote, QuoteStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Assigns a fresh id and stores the quote.
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote>;
    /// Replaces every stored field of quote `id`.
    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote>;
    async fn update_status(&self, id: ObjectId, status: QuoteStatus, updated_at: DateTime<Utc>) -> RepositoryResult<()>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    /// Newest first.
    async fn list_by_owner(&self, owner_id: ObjectId) -> RepositoryResult<Vec<Quote>>;
}

pub struct MongoQuoteRepository {
    collection: Collection<Quote>,
}

impl MongoQuoteRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        MongoQuoteRepository {
            collection: db.collection::<Quote>(collection_name),
        }
    }
}

/// Documents written before totals were kept in sync are fixed on read.
fn heal_total(mut quote: Quote) -> Quote {
    if quote.recompute_total() {
        warn!(quote_id = ?quote.id, "Stored total was stale, recomputed from items");
    }
    quote
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(owner_id = %quote.owner_id))]
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        info!("Creating new quote");
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());

        match self.collection.insert_one(new_quote.clone(), None).await {
            Ok(_) => {
                info!(quote_id = ?new_quote.id, "Quote created successfully");
                Ok(new_quote)
            }
            Err(e) => {
                error!("Failed to create quote: {}", e);
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        debug!("Fetching quote by ID: {}", id);
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(quote)) => Ok(heal_total(quote)),
            Ok(None) => {
                warn!("Quote not found for ID: {}", id);
                Err(RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to fetch quote by ID: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch quote by ID: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, quote), fields(id = %id))]
    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote> {
        info!("Updating quote with ID: {}", id);
        let mut fields = bson::to_document(&quote)?;
        fields.remove("_id");

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await;
        match result {
            // matched, not modified: saving unchanged data is not a miss
            Ok(update_result) if update_result.matched_count > 0 => {
                info!("Quote updated successfully for ID: {}", id);
                Ok(Quote { id: Some(id), ..quote })
            }
            Ok(_) => {
                warn!("No quote found to update for ID: {}", id);
                Err(RepositoryError::not_found(format!("No quote found to update for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update quote: {}", e);
                Err(RepositoryError::database(format!("Failed to update quote: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(&self, id: ObjectId, status: QuoteStatus, updated_at: DateTime<Utc>) -> RepositoryResult<()> {
        info!("Updating quote status");
        let update = doc! {
            "$set": {
                "status": status.as_str(),
                "updated_at": bson::to_bson(&updated_at)?,
            }
        };
        match self.collection.update_one(doc! { "_id": id }, update, None).await {
            Ok(update_result) if update_result.matched_count > 0 => {
                info!("Quote status updated successfully for ID: {}", id);
                Ok(())
            }
            Ok(_) => {
                warn!("No quote found to update status for ID: {}", id);
                Err(RepositoryError::not_found(format!("No quote found to update status for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update quote status: {}", e);
                Err(RepositoryError::database(format!("Failed to update quote status: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting quote with ID: {}", id);
        match self.collection.delete_one(doc! { "_id": id }, None).await {
            Ok(delete_result) if delete_result.deleted_count > 0 => {
                info!("Quote deleted successfully for ID: {}", id);
                Ok(())
            }
            Ok(_) => {
                warn!("No quote found to delete for ID: {}", id);
                Err(RepositoryError::not_found(format!("No quote found to delete for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to delete quote: {}", e);
                Err(RepositoryError::database(format!("Failed to delete quote: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(owner_id = %owner_id))]
    async fn list_by_owner(&self, owner_id: ObjectId) -> RepositoryResult<Vec<Quote>> {
        debug!("Listing quotes for owner");
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let mut cursor = self
            .collection
            .find(doc! { "owner_id": owner_id }, options)
            .await
            .map_err(|e| {
                error!("Failed to list quotes: {}", e);
                RepositoryError::database(format!("Failed to list quotes: {}", e))
            })?;

        let mut quotes = Vec::new();
        while let Some(quote) = cursor.next().await {
            match quote {
                Ok(q) => quotes.push(heal_total(q)),
                Err(e) => {
                    error!("Failed to deserialize quote: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize quote: {}", e)));
                }
            }
        }
        info!("Fetched {} quotes", quotes.len());
        Ok(quotes)
    }
}
