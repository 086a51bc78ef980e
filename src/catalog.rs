use std::sync::Arc;

use time::OffsetDateTime;

use crate::db::{Db, Order, SoundKey, SoundQuery, SoundUpdate};
use crate::defaults::DEFAULT_SOUNDS;
use crate::errors::BackendError;
use crate::sound::{NewSound, SoundMetadata, SoundPatch, SoundRecord};

/// How many sounds `popular` returns at most.
pub const POPULAR_LIMIT: u32 = 10;

/// Predicates for `list`. `None` leaves a field unconstrained, except
/// `is_active`, which defaults to active sounds only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SoundFilter {
    pub category: Option<String>,
    pub is_premium: Option<bool>,
    pub is_active: Option<bool>,
}

/// The outcome of seeding the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Seeding {
    /// The store already held this many sounds, so nothing was written.
    AlreadySeeded(i64),

    /// The built-in catalog was inserted.
    Inserted(Vec<SoundRecord>),
}

/// Operations over sound records. Holds no state of its own.
pub struct SoundCatalog {
    db: Arc<dyn Db + Send + Sync>,
}

impl SoundCatalog {
    pub fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        SoundCatalog { db }
    }

    pub async fn list(&self, filter: SoundFilter) -> Result<Vec<SoundRecord>, BackendError> {
        let query = SoundQuery {
            category: filter.category,
            is_premium: filter.is_premium,
            is_active: Some(filter.is_active.unwrap_or(true)),
            order: Order::PopularityThenNewest,
            limit: None,
        };

        self.db.find_sounds(query).await
    }

    /// Unknown categories simply match nothing.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<SoundRecord>, BackendError> {
        let query = SoundQuery {
            category: Some(category.to_owned()),
            is_active: Some(true),
            order: Order::Popularity,
            ..Default::default()
        };

        self.db.find_sounds(query).await
    }

    pub async fn get(&self, id: &str) -> Result<SoundRecord, BackendError> {
        self.db
            .find_sound(SoundKey::active(id))
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, metadata: SoundMetadata) -> Result<SoundRecord, BackendError> {
        metadata.validate()?;

        // inactive sounds still hold on to their ID
        if self.db.find_sound(SoundKey::any(&metadata.id)).await?.is_some() {
            return Err(BackendError::SoundAlreadyExists { id: metadata.id });
        }

        self.db
            .insert_sound(NewSound::new(metadata, OffsetDateTime::now_utc()))
            .await
    }

    /// Applies a partial update. Deleted sounds can still be updated.
    pub async fn update(&self, id: &str, patch: SoundPatch) -> Result<SoundRecord, BackendError> {
        let changes = patch.into_changes()?;

        self.mutate(SoundKey::any(id), SoundUpdate::Apply(changes))
            .await
    }

    /// Marks the sound inactive. Repeating it succeeds again.
    pub async fn soft_delete(&self, id: &str) -> Result<SoundRecord, BackendError> {
        self.mutate(SoundKey::any(id), SoundUpdate::Deactivate).await
    }

    /// Records a play of an active sound.
    pub async fn play(&self, id: &str) -> Result<SoundRecord, BackendError> {
        self.mutate(SoundKey::active(id), SoundUpdate::IncrementPopularity)
            .await
    }

    pub async fn popular(&self) -> Result<Vec<SoundRecord>, BackendError> {
        let query = SoundQuery {
            is_active: Some(true),
            order: Order::Popularity,
            limit: Some(POPULAR_LIMIT),
            ..Default::default()
        };

        self.db.find_sounds(query).await
    }

    /// Inserts the built-in catalog, but only into an empty store.
    pub async fn seed(&self) -> Result<Seeding, BackendError> {
        let count = self.db.count_sounds().await?;

        if count > 0 {
            return Ok(Seeding::AlreadySeeded(count));
        }

        self.insert_defaults().await.map(Seeding::Inserted)
    }

    /// Physically removes every sound and reinserts the built-in
    /// catalog. Returns how many sounds were removed alongside the new
    /// records.
    pub async fn reset(&self) -> Result<(u64, Vec<SoundRecord>), BackendError> {
        let removed = self.db.delete_all_sounds().await?;
        let inserted = self.insert_defaults().await?;

        Ok((removed, inserted))
    }

    async fn insert_defaults(&self) -> Result<Vec<SoundRecord>, BackendError> {
        let now = OffsetDateTime::now_utc();
        let sounds = DEFAULT_SOUNDS
            .iter()
            .cloned()
            .map(|metadata| NewSound::new(metadata, now))
            .collect();

        self.db.insert_sounds(sounds).await
    }

    async fn mutate(
        &self,
        key: SoundKey,
        update: SoundUpdate,
    ) -> Result<SoundRecord, BackendError> {
        let id = key.id.clone();

        self.db
            .update_sound(key, update, OffsetDateTime::now_utc())
            .await?
            .ok_or_else(|| not_found(&id))
    }
}

fn not_found(id: &str) -> BackendError {
    BackendError::SoundNotFound { id: id.to_owned() }
}
