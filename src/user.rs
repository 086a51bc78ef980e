use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::BackendError;
use crate::normalization;

/// A registration request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// The identity provider's uid, stripped of surrounding whitespace.
    #[serde(deserialize_with = "normalization::deserialize")]
    pub uid: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

impl Registration {
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.uid.is_empty() {
            return Err(BackendError::required("uid"));
        }

        Ok(())
    }
}

/// A user ready to be stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: OffsetDateTime,
}

impl NewUser {
    pub fn new(registration: Registration, now: OffsetDateTime) -> Self {
        NewUser {
            uid: registration.uid,
            email: registration.email,
            display_name: registration.display_name,
            created_at: now,
        }
    }
}

/// A registered user.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub storage_id: Uuid,

    pub uid: String,

    pub email: Option<String>,

    pub display_name: Option<String>,

    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

impl UserRecord {
    pub fn new(storage_id: Uuid, user: NewUser) -> Self {
        UserRecord {
            storage_id,
            uid: user.uid,
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::Registration;

    #[test]
    fn registration_trims_uid() {
        let registration: Registration = serde_json::from_value(json!({
            "uid": "  abc123\t",
            "displayName": "Sleepy"
        }))
        .unwrap();

        assert_eq!(registration.uid, "abc123");
        assert_eq!(registration.display_name.as_deref(), Some("Sleepy"));
        assert_eq!(registration.email, None);
    }

    #[test]
    fn blank_uid_is_rejected() {
        let registration: Registration = serde_json::from_value(json!({ "uid": "   " })).unwrap();

        assert!(registration.validate().is_err());
    }

    #[test]
    fn missing_uid_fails_to_parse() {
        assert!(serde_json::from_value::<Registration>(json!({ "email": "a@b.c" })).is_err());
    }
}
