use serde::Serialize;

use crate::sound::SoundRecord;
use crate::user::UserRecord;

pub const STATUS_MESSAGE: &str = "Sleep Sound API Server is running!";
pub const CREATED_MESSAGE: &str = "Sleep sound created successfully";
pub const UPDATED_MESSAGE: &str = "Sleep sound updated successfully";
pub const DELETED_MESSAGE: &str = "Sleep sound deleted successfully";
pub const PLAYED_MESSAGE: &str = "Popularity updated successfully";
pub const SEEDED_MESSAGE: &str = "Default sounds initialized successfully";
pub const ALREADY_SEEDED_MESSAGE: &str = "Database already contains sounds";
pub const REGISTERED_MESSAGE: &str = "User registered successfully";

/// Wraps every successful reply.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    success: bool,
    #[serde(flatten)]
    body: SuccessResponse<'a>,
}

impl<'a> Envelope<'a> {
    pub fn new(body: SuccessResponse<'a>) -> Self {
        Envelope {
            success: true,
            body,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Category {
        category: String,
        count: usize,
        data: Vec<SoundRecord>,
    },
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Message {
        message: &'a str,
    },
    Seeded {
        message: &'a str,
        count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Vec<SoundRecord>>,
    },
    Sound {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<&'a str>,
        data: SoundRecord,
    },
    Sounds {
        count: usize,
        data: Vec<SoundRecord>,
    },
    User {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<&'a str>,
        data: UserRecord,
    },
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{Envelope, SuccessResponse, DELETED_MESSAGE};

    #[test]
    fn envelopes_flatten_their_body() {
        let envelope = Envelope::new(SuccessResponse::Message {
            message: DELETED_MESSAGE,
        });

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": true, "message": "Sleep sound deleted successfully" })
        );

        let envelope = Envelope::new(SuccessResponse::Sounds {
            count: 0,
            data: vec![],
        });

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": true, "count": 0, "data": [] })
        );
    }
}
