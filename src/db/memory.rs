use futures::future::{BoxFuture, FutureExt};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Order, SoundKey, SoundQuery, SoundUpdate};
use crate::errors::BackendError;
use crate::sound::{NewSound, SoundRecord};
use crate::user::{NewUser, UserRecord};

/// A document store kept in process memory. Every mutation holds the
/// write lock for its whole duration.
#[derive(Default)]
pub struct MemoryDb {
    sounds: RwLock<Vec<SoundRecord>>,
    users: RwLock<Vec<UserRecord>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Default::default()
    }
}

impl super::Db for MemoryDb {
    fn count_sounds(&self) -> BoxFuture<Result<i64, BackendError>> {
        async move { Ok(self.sounds.read().await.len() as i64) }.boxed()
    }

    fn find_sounds(&self, query: SoundQuery) -> BoxFuture<Result<Vec<SoundRecord>, BackendError>> {
        async move {
            let mut found: Vec<SoundRecord> = self
                .sounds
                .read()
                .await
                .iter()
                .filter(|s| query.matches(s))
                .cloned()
                .collect();

            sort(&mut found, query.order);

            if let Some(limit) = query.limit {
                found.truncate(limit as usize);
            }

            Ok(found)
        }
        .boxed()
    }

    fn find_sound(&self, key: SoundKey) -> BoxFuture<Result<Option<SoundRecord>, BackendError>> {
        async move {
            let sounds = self.sounds.read().await;

            Ok(sounds.iter().find(|s| key.matches(s)).cloned())
        }
        .boxed()
    }

    fn insert_sound(&self, sound: NewSound) -> BoxFuture<Result<SoundRecord, BackendError>> {
        async move {
            let mut sounds = self.sounds.write().await;

            if sounds.iter().any(|s| s.metadata.id == sound.metadata.id) {
                return Err(BackendError::SoundAlreadyExists {
                    id: sound.metadata.id,
                });
            }

            let record = SoundRecord::new(Uuid::new_v4(), sound);
            sounds.push(record.clone());

            Ok(record)
        }
        .boxed()
    }

    fn insert_sounds(
        &self,
        batch: Vec<NewSound>,
    ) -> BoxFuture<Result<Vec<SoundRecord>, BackendError>> {
        async move {
            let mut sounds = self.sounds.write().await;

            // check the whole batch before touching anything
            for (i, sound) in batch.iter().enumerate() {
                let id = &sound.metadata.id;
                let clashes = sounds.iter().any(|s| &s.metadata.id == id)
                    || batch[..i].iter().any(|s| &s.metadata.id == id);

                if clashes {
                    return Err(BackendError::SoundAlreadyExists { id: id.clone() });
                }
            }

            let records: Vec<SoundRecord> = batch
                .into_iter()
                .map(|sound| SoundRecord::new(Uuid::new_v4(), sound))
                .collect();
            sounds.extend(records.iter().cloned());

            Ok(records)
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
            let mut sounds = self.sounds.write().await;

            let index = match sounds.iter().position(|s| key.matches(s)) {
                Some(index) => index,
                None => return Ok(None),
            };

            if let SoundUpdate::Apply(changes) = &update {
                if let Some(new_id) = &changes.id {
                    let taken = sounds
                        .iter()
                        .enumerate()
                        .any(|(i, s)| i != index && &s.metadata.id == new_id);

                    if taken {
                        return Err(BackendError::SoundAlreadyExists { id: new_id.clone() });
                    }
                }
            }

            let sound = &mut sounds[index];

            match update {
                SoundUpdate::Apply(changes) => changes.apply(&mut sound.metadata),
                SoundUpdate::Deactivate => sound.metadata.is_active = false,
                SoundUpdate::IncrementPopularity => sound.metadata.popularity += 1,
            }

            sound.times.updated_at = updated_at;

            Ok(Some(sound.clone()))
        }
        .boxed()
    }

    fn delete_all_sounds(&self) -> BoxFuture<Result<u64, BackendError>> {
        async move {
            let mut sounds = self.sounds.write().await;
            let count = sounds.len() as u64;
            sounds.clear();

            Ok(count)
        }
        .boxed()
    }

    fn find_user(&self, uid: &str) -> BoxFuture<Result<Option<UserRecord>, BackendError>> {
        let uid = uid.to_owned();

        async move {
            let users = self.users.read().await;

            Ok(users.iter().find(|u| u.uid == uid).cloned())
        }
        .boxed()
    }

    fn insert_user(&self, user: NewUser) -> BoxFuture<Result<UserRecord, BackendError>> {
        async move {
            let mut users = self.users.write().await;

            if users.iter().any(|u| u.uid == user.uid) {
                return Err(BackendError::UserAlreadyExists { uid: user.uid });
            }

            let record = UserRecord::new(Uuid::new_v4(), user);
            users.push(record.clone());

            Ok(record)
        }
        .boxed()
    }
}

/// Sorts in place. The sort is stable, so equal sounds keep their
/// insertion order.
fn sort(sounds: &mut [SoundRecord], order: Order) {
    match order {
        Order::Popularity => {
            sounds.sort_by(|a, b| b.metadata.popularity.cmp(&a.metadata.popularity))
        }
        Order::PopularityThenNewest => sounds.sort_by(|a, b| {
            b.metadata
                .popularity
                .cmp(&a.metadata.popularity)
                .then_with(|| b.times.created_at.cmp(&a.times.created_at))
        }),
    }
}

#[cfg(test)]
mod test {
    use futures::executor::block_on;
    use serde_json::json;
    use time::OffsetDateTime;

    use super::MemoryDb;
    use crate::db::{Db, Order, SoundKey, SoundQuery, SoundUpdate};
    use crate::errors::BackendError;
    use crate::sound::{NewSound, SoundMetadata};

    fn new_sound(id: &str, category: &str, popularity: i64, created: i64) -> NewSound {
        let metadata: SoundMetadata = serde_json::from_value(json!({
            "id": id,
            "title": id,
            "subtitle": id,
            "category": category,
            "audioPath": format!("audio/{}.mp3", id),
            "duration": 10,
            "popularity": popularity
        }))
        .unwrap();

        NewSound::new(metadata, OffsetDateTime::from_unix_timestamp(created))
    }

    fn ids(sounds: &[crate::sound::SoundRecord]) -> Vec<&str> {
        sounds.iter().map(|s| s.id()).collect()
    }

    #[test]
    fn queries_filter_sort_and_limit() {
        block_on(async {
            let db = MemoryDb::new();
            db.insert_sound(new_sound("a", "Nature", 5, 100)).await.unwrap();
            db.insert_sound(new_sound("b", "Nature", 9, 100)).await.unwrap();
            db.insert_sound(new_sound("c", "Ambient", 7, 100)).await.unwrap();
            db.insert_sound(new_sound("d", "Nature", 5, 200)).await.unwrap();

            let all = db.find_sounds(SoundQuery::default()).await.unwrap();
            assert_eq!(ids(&all), vec!["b", "c", "d", "a"]);

            let nature = db
                .find_sounds(SoundQuery {
                    category: Some("Nature".to_owned()),
                    order: Order::Popularity,
                    limit: Some(2),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_eq!(ids(&nature), vec!["b", "a"]);
        });
    }

    #[test]
    fn duplicate_ids_are_refused() {
        block_on(async {
            let db = MemoryDb::new();
            db.insert_sound(new_sound("a", "Nature", 0, 0)).await.unwrap();

            let result = db.insert_sound(new_sound("a", "Ambient", 0, 0)).await;
            assert!(matches!(result, Err(BackendError::SoundAlreadyExists { .. })));
            assert_eq!(db.count_sounds().await.unwrap(), 1);
        });
    }

    #[test]
    fn batch_inserts_are_all_or_nothing() {
        block_on(async {
            let db = MemoryDb::new();
            db.insert_sound(new_sound("c", "Nature", 0, 0)).await.unwrap();

            let batch = vec![
                new_sound("a", "Nature", 0, 0),
                new_sound("b", "Nature", 0, 0),
                new_sound("c", "Nature", 0, 0),
            ];
            assert!(db.insert_sounds(batch).await.is_err());
            assert_eq!(db.count_sounds().await.unwrap(), 1);

            let batch = vec![new_sound("x", "Nature", 0, 0), new_sound("x", "Nature", 0, 0)];
            assert!(db.insert_sounds(batch).await.is_err());
            assert_eq!(db.count_sounds().await.unwrap(), 1);
        });
    }

    #[test]
    fn updates_respect_the_active_filter() {
        block_on(async {
            let db = MemoryDb::new();
            db.insert_sound(new_sound("a", "Nature", 3, 0)).await.unwrap();
            let later = OffsetDateTime::from_unix_timestamp(50);

            let deactivated = db
                .update_sound(SoundKey::any("a"), SoundUpdate::Deactivate, later)
                .await
                .unwrap()
                .unwrap();
            assert!(!deactivated.metadata.is_active);
            assert_eq!(deactivated.times.updated_at, later);
            assert_eq!(deactivated.times.created_at.unix_timestamp(), 0);

            let played = db
                .update_sound(SoundKey::active("a"), SoundUpdate::IncrementPopularity, later)
                .await
                .unwrap();
            assert!(played.is_none());

            assert!(db.find_sound(SoundKey::active("a")).await.unwrap().is_none());
            assert!(db.find_sound(SoundKey::any("a")).await.unwrap().is_some());
        });
    }

    #[test]
    fn users_are_unique_by_uid() {
        use crate::user::NewUser;

        block_on(async {
            let db = MemoryDb::new();
            let user = NewUser {
                uid: "abc123".to_owned(),
                email: None,
                display_name: None,
                created_at: OffsetDateTime::from_unix_timestamp(0),
            };

            db.insert_user(user.clone()).await.unwrap();
            assert!(db.insert_user(user).await.is_err());
            assert!(db.find_user("abc123").await.unwrap().is_some());
            assert!(db.find_user("abc").await.unwrap().is_none());
        });
    }
}
