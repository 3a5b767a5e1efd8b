use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use mongodb::options::{ReplaceOptions, UpdateOptions};
use mongodb::{Collection, Database};
use tracing::{debug, error, info};

use crate::model::profile::Profile;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// `None` when the owner never saved a profile.
    async fn get(&self, owner_id: ObjectId) -> RepositoryResult<Option<Profile>>;
    async fn upsert(&self, profile: Profile) -> RepositoryResult<Profile>;
    /// Sets only `logo_url`, creating the profile if needed.
    async fn set_logo_url(&self, owner_id: ObjectId, logo_url: &str, updated_at: DateTime<Utc>) -> RepositoryResult<()>;
}

pub struct MongoProfileRepository {
    collection: Collection<Profile>,
}

impl MongoProfileRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        MongoProfileRepository {
            collection: db.collection::<Profile>(collection_name),
        }
    }
}

#[async_trait]
impl ProfileRepository for MongoProfileRepository {
    #[tracing::instrument(skip(self), fields(owner_id = %owner_id))]
    async fn get(&self, owner_id: ObjectId) -> RepositoryResult<Option<Profile>> {
        debug!("Fetching profile");
        self.collection
            .find_one(doc! { "_id": owner_id }, None)
            .await
            .map_err(|e| {
                error!("Failed to fetch profile: {}", e);
                RepositoryError::database(format!("Failed to fetch profile for {}: {}", owner_id, e))
            })
    }

    #[tracing::instrument(skip(self, profile), fields(owner_id = %profile.id))]
    async fn upsert(&self, profile: Profile) -> RepositoryResult<Profile> {
        let options = ReplaceOptions::builder().upsert(true).build();
        match self
            .collection
            .replace_one(doc! { "_id": profile.id }, &profile, options)
            .await
        {
            Ok(result) => {
                info!(
                    matched = result.matched_count,
                    upserted = result.upserted_id.is_some(),
                    "Profile saved"
                );
                Ok(profile)
            }
            Err(e) => {
                error!("Failed to save profile: {}", e);
                Err(e.into())
            }
        }
    }

    #[tracing::instrument(skip(self), fields(owner_id = %owner_id))]
    async fn set_logo_url(&self, owner_id: ObjectId, logo_url: &str, updated_at: DateTime<Utc>) -> RepositoryResult<()> {
        let update = doc! {
            "$set": {
                "logo_url": logo_url,
                "updated_at": bson::to_bson(&updated_at)?,
            }
        };
        let options = UpdateOptions::builder().upsert(true).build();
        match self.collection.update_one(doc! { "_id": owner_id }, update, options).await {
            Ok(result) => {
                debug!(
                    matched = result.matched_count,
                    upserted = result.upserted_id.is_some(),
                    "Logo URL saved"
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to save logo URL: {}", e);
                Err(e.into())
            }
        }
    }
}
