use futures::future::BoxFuture;
use time::OffsetDateTime;

use crate::errors::BackendError;
use crate::sound::{NewSound, SoundChanges, SoundRecord};
use crate::user::{NewUser, UserRecord};

pub mod memory;

/// The document store both services share.
pub trait Db {
    fn count_sounds(&self) -> BoxFuture<Result<i64, BackendError>>;

    fn find_sounds(&self, query: SoundQuery) -> BoxFuture<Result<Vec<SoundRecord>, BackendError>>;

    fn find_sound(&self, key: SoundKey) -> BoxFuture<Result<Option<SoundRecord>, BackendError>>;

    fn insert_sound(&self, sound: NewSound) -> BoxFuture<Result<SoundRecord, BackendError>>;

    /// Inserts every sound or none of them.
    fn insert_sounds(
        &self,
        sounds: Vec<NewSound>,
    ) -> BoxFuture<Result<Vec<SoundRecord>, BackendError>>;

    /// Applies `update` to the sound matching `key` in one atomic step
    /// and returns the sound as it is afterwards.
    fn update_sound(
        &self,
        key: SoundKey,
        update: SoundUpdate,
        updated_at: OffsetDateTime,
    ) -> BoxFuture<Result<Option<SoundRecord>, BackendError>>;

    /// Physically removes every sound. Only maintenance tooling calls
    /// this.
    fn delete_all_sounds(&self) -> BoxFuture<Result<u64, BackendError>>;

    fn find_user(&self, uid: &str) -> BoxFuture<Result<Option<UserRecord>, BackendError>>;

    fn insert_user(&self, user: NewUser) -> BoxFuture<Result<UserRecord, BackendError>>;
}

/// Selects a single sound by its business key.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundKey {
    pub id: String,
    pub active_only: bool,
}

impl SoundKey {
    /// Matches the sound whether or not it was deleted.
    pub fn any(id: impl Into<String>) -> Self {
        SoundKey {
            id: id.into(),
            active_only: false,
        }
    }

    /// Matches the sound only while it is active.
    pub fn active(id: impl Into<String>) -> Self {
        SoundKey {
            id: id.into(),
            active_only: true,
        }
    }

    pub fn matches(&self, sound: &SoundRecord) -> bool {
        sound.metadata.id == self.id && (sound.metadata.is_active || !self.active_only)
    }
}

/// A filtered, ordered and optionally limited listing of sounds. Every
/// predicate left as `None` matches anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SoundQuery {
    pub category: Option<String>,
    pub is_premium: Option<bool>,
    pub is_active: Option<bool>,
    pub order: Order,
    pub limit: Option<u32>,
}

impl SoundQuery {
    pub fn matches(&self, sound: &SoundRecord) -> bool {
        let metadata = &sound.metadata;

        self.category
            .as_ref()
            .map_or(true, |c| c == metadata.category.as_str())
            && self.is_premium.map_or(true, |p| p == metadata.is_premium)
            && self.is_active.map_or(true, |a| a == metadata.is_active)
    }
}

/// Result ordering for listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Most played first.
    Popularity,

    /// Most played first, newest first among equals.
    PopularityThenNewest,
}

impl Default for Order {
    fn default() -> Self {
        Order::PopularityThenNewest
    }
}

/// The single-statement mutations the catalog performs.
#[derive(Clone, Debug, PartialEq)]
pub enum SoundUpdate {
    Apply(SoundChanges),
    Deactivate,
    IncrementPopularity,
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgPool, PgRow},
    };
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::{Order, SoundKey, SoundQuery, SoundUpdate};
    use crate::errors::BackendError;
    use crate::sound::{Category, Times, NewSound, SoundMetadata, SoundRecord};
    use crate::user::{NewUser, UserRecord};

    const SOUNDS_ID_CONSTRAINT: &str = "sounds_id_unique";
    const USERS_UID_CONSTRAINT: &str = "users_uid_unique";

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn count_sounds(&self) -> BoxFuture<Result<i64, BackendError>> {
            async move {
                let query = sqlx::query_as::<_, (i64,)>(include_str!("queries/count_sounds.sql"));

                let (count,) = query
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, ""))?;

                Ok(count)
            }
            .boxed()
        }

        fn find_sounds(
            &self,
            query: SoundQuery,
        ) -> BoxFuture<Result<Vec<SoundRecord>, BackendError>> {
            async move {
                let sql = format!(
                    "{} ORDER BY {} LIMIT $4",
                    include_str!("queries/find_sounds.sql").trim_end(),
                    order_by(query.order)
                );

                let sounds = sqlx::query(&sql)
                    .bind(query.category)
                    .bind(query.is_premium)
                    .bind(query.is_active)
                    .bind(query.limit.map(i64::from))
                    .try_map(|row: PgRow| sound_from_row(&row))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, ""))?;

                Ok(sounds)
            }
            .boxed()
        }

        fn find_sound(
            &self,
            key: SoundKey,
        ) -> BoxFuture<Result<Option<SoundRecord>, BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/find_sound.sql"));

                let sound = query
                    .bind(&key.id)
                    .bind(key.active_only)
                    .try_map(|row: PgRow| sound_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, &key.id))?;

                Ok(sound)
            }
            .boxed()
        }

        fn insert_sound(&self, sound: NewSound) -> BoxFuture<Result<SoundRecord, BackendError>> {
            async move {
                let storage_id = Uuid::new_v4();

                let query = sqlx::query(include_str!("queries/insert_sound.sql"));

                bind_new_sound(query, storage_id, &sound)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, &sound.metadata.id))?;

                Ok(SoundRecord::new(storage_id, sound))
            }
            .boxed()
        }

        fn insert_sounds(
            &self,
            sounds: Vec<NewSound>,
        ) -> BoxFuture<Result<Vec<SoundRecord>, BackendError>> {
            async move {
                let mut transaction = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| map_sqlx_error(e, ""))?;
                let mut inserted = Vec::with_capacity(sounds.len());

                // dropping the transaction on error rolls everything back
                for sound in sounds {
                    let storage_id = Uuid::new_v4();

                    let query = sqlx::query(include_str!("queries/insert_sound.sql"));

                    bind_new_sound(query, storage_id, &sound)
                        .execute(&mut transaction)
                        .await
                        .map_err(|e| map_sqlx_error(e, &sound.metadata.id))?;

                    inserted.push(SoundRecord::new(storage_id, sound));
                }

                transaction
                    .commit()
                    .await
                    .map_err(|e| map_sqlx_error(e, ""))?;

                Ok(inserted)
            }
            .boxed()
        }

        fn update_sound(
            &self,
            key: SoundKey,
            update: SoundUpdate,
            updated_at: OffsetDateTime,
        ) -> BoxFuture<Result<Option<SoundRecord>, BackendError>> {
            async move {
                let query = match &update {
                    SoundUpdate::Apply(changes) => {
                        sqlx::query(include_str!("queries/update_sound.sql"))
                            .bind(&key.id)
                            .bind(key.active_only)
                            .bind(updated_at)
                            .bind(changes.id.clone())
                            .bind(changes.title.clone())
                            .bind(changes.subtitle.clone())
                            .bind(changes.category.map(|c| c.as_str()))
                            .bind(changes.audio_path.clone())
                            .bind(changes.image_path.clone())
                            .bind(changes.duration)
                            .bind(changes.is_looping)
                            .bind(changes.is_premium)
                            .bind(changes.description.clone())
                            .bind(changes.tags.clone())
                            .bind(changes.is_active)
                    }
                    SoundUpdate::Deactivate => {
                        sqlx::query(include_str!("queries/deactivate_sound.sql"))
                            .bind(&key.id)
                            .bind(key.active_only)
                            .bind(updated_at)
                    }
                    SoundUpdate::IncrementPopularity => {
                        sqlx::query(include_str!("queries/increment_popularity.sql"))
                            .bind(&key.id)
                            .bind(key.active_only)
                            .bind(updated_at)
                    }
                };

                let conflicting_id = match &update {
                    SoundUpdate::Apply(changes) => changes.id.clone(),
                    _ => None,
                }
                .unwrap_or_else(|| key.id.clone());

                let sound = query
                    .try_map(|row: PgRow| sound_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, &conflicting_id))?;

                Ok(sound)
            }
            .boxed()
        }

        fn delete_all_sounds(&self) -> BoxFuture<Result<u64, BackendError>> {
            async move {
                let count = sqlx::query(include_str!("queries/delete_all_sounds.sql"))
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, ""))?
                    .rows_affected();

                Ok(count)
            }
            .boxed()
        }

        fn find_user(&self, uid: &str) -> BoxFuture<Result<Option<UserRecord>, BackendError>> {
            let uid = uid.to_owned();

            async move {
                let query = sqlx::query(include_str!("queries/find_user.sql"));

                let user = query
                    .bind(&uid)
                    .try_map(|row: PgRow| {
                        Ok(UserRecord {
                            storage_id: try_get(&row, "storage_id")?,
                            uid: try_get(&row, "uid")?,
                            email: try_get(&row, "email")?,
                            display_name: try_get(&row, "display_name")?,
                            created_at: try_get(&row, "created_at")?,
                        })
                    })
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, &uid))?;

                Ok(user)
            }
            .boxed()
        }

        fn insert_user(&self, user: NewUser) -> BoxFuture<Result<UserRecord, BackendError>> {
            async move {
                let storage_id = Uuid::new_v4();

                sqlx::query(include_str!("queries/insert_user.sql"))
                    .bind(storage_id)
                    .bind(&user.uid)
                    .bind(&user.email)
                    .bind(&user.display_name)
                    .bind(user.created_at)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_sqlx_error(e, &user.uid))?;

                Ok(UserRecord::new(storage_id, user))
            }
            .boxed()
        }
    }

    fn order_by(order: Order) -> &'static str {
        match order {
            Order::Popularity => "popularity DESC",
            Order::PopularityThenNewest => "popularity DESC, created_at DESC",
        }
    }

    fn bind_new_sound<'q>(
        query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
        storage_id: Uuid,
        sound: &'q NewSound,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        let metadata = &sound.metadata;

        query
            .bind(storage_id)
            .bind(&metadata.id)
            .bind(&metadata.title)
            .bind(&metadata.subtitle)
            .bind(metadata.category.as_str())
            .bind(&metadata.audio_path)
            .bind(&metadata.image_path)
            .bind(metadata.duration)
            .bind(metadata.is_looping)
            .bind(metadata.is_premium)
            .bind(&metadata.description)
            .bind(&metadata.tags)
            .bind(metadata.popularity)
            .bind(metadata.is_active)
            .bind(sound.times.created_at)
            .bind(sound.times.updated_at)
    }

    fn sound_from_row(row: &PgRow) -> Result<SoundRecord, sqlx::Error> {
        let category: String = try_get(row, "category")?;
        let category: Category = category
            .parse()
            .map_err(|e: BackendError| sqlx::Error::Decode(Box::new(e)))?;

        let metadata = SoundMetadata {
            id: try_get(row, "id")?,
            title: try_get(row, "title")?,
            subtitle: try_get(row, "subtitle")?,
            category,
            audio_path: try_get(row, "audio_path")?,
            image_path: try_get(row, "image_path")?,
            duration: try_get(row, "duration")?,
            is_looping: try_get(row, "is_looping")?,
            is_premium: try_get(row, "is_premium")?,
            description: try_get(row, "description")?,
            tags: try_get(row, "tags")?,
            popularity: try_get(row, "popularity")?,
            is_active: try_get(row, "is_active")?,
        };

        let times = Times {
            created_at: try_get(row, "created_at")?,
            updated_at: try_get(row, "updated_at")?,
        };

        Ok(SoundRecord {
            storage_id: try_get(row, "storage_id")?,
            metadata,
            times,
        })
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    /// `key` names the record a unique-constraint violation refers to.
    fn map_sqlx_error(error: sqlx::Error, key: &str) -> BackendError {
        use sqlx::Error;

        match error {
            Error::Database(ref e) if e.constraint() == Some(SOUNDS_ID_CONSTRAINT) => {
                BackendError::SoundAlreadyExists { id: key.to_owned() }
            }
            Error::Database(ref e) if e.constraint() == Some(USERS_UID_CONSTRAINT) => {
                BackendError::UserAlreadyExists {
                    uid: key.to_owned(),
                }
            }
            _ => BackendError::Sqlx { source: error },
        }
    }
}
