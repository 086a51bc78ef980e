use std::sync::Arc;

use time::OffsetDateTime;

use crate::db::Db;
use crate::errors::BackendError;
use crate::normalization::normalize_uid;
use crate::user::{NewUser, Registration, UserRecord};

/// Registration and lookup of users keyed by their identity provider
/// uid.
pub struct UserRegistry {
    db: Arc<dyn Db + Send + Sync>,
}

impl UserRegistry {
    pub fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        UserRegistry { db }
    }

    pub async fn register(&self, registration: Registration) -> Result<UserRecord, BackendError> {
        registration.validate()?;

        if self.db.find_user(&registration.uid).await?.is_some() {
            return Err(BackendError::UserAlreadyExists {
                uid: registration.uid,
            });
        }

        self.db
            .insert_user(NewUser::new(registration, OffsetDateTime::now_utc()))
            .await
    }

    pub async fn lookup(&self, uid: &str) -> Result<UserRecord, BackendError> {
        let uid = normalize_uid(uid);

        self.db
            .find_user(&uid)
            .await?
            .ok_or(BackendError::UserNotFound { uid })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use serde_json::json;

    use super::UserRegistry;
    use crate::db::memory::MemoryDb;
    use crate::errors::ErrorKind;
    use crate::user::Registration;

    fn registration(value: serde_json::Value) -> Registration {
        serde_json::from_value(value).expect("parse registration")
    }

    #[tokio::test]
    async fn lookup_ignores_surrounding_whitespace() {
        let registry = UserRegistry::new(Arc::new(MemoryDb::new()));

        let user = registry
            .register(registration(json!({ "uid": "abc123", "email": "sleepy@example.com" })))
            .await
            .unwrap();
        assert_eq!(user.email.as_deref(), Some("sleepy@example.com"));

        let found = registry.lookup(" abc123 ").await.unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn registered_uids_are_trimmed() {
        let registry = UserRegistry::new(Arc::new(MemoryDb::new()));

        let user = registry
            .register(registration(json!({ "uid": "\tabc123  " })))
            .await
            .unwrap();
        assert_eq!(user.uid, "abc123");
        assert!(registry.lookup("abc123").await.is_ok());
    }

    #[tokio::test]
    async fn uids_are_unique() {
        let registry = UserRegistry::new(Arc::new(MemoryDb::new()));

        registry
            .register(registration(json!({ "uid": "abc123" })))
            .await
            .unwrap();

        let error = registry
            .register(registration(json!({ "uid": " abc123" })))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn unknown_and_blank_uids() {
        let registry = UserRegistry::new(Arc::new(MemoryDb::new()));

        assert_eq!(
            registry.lookup("nobody").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            registry
                .register(registration(json!({ "uid": "  " })))
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::Validation
        );
    }
}
