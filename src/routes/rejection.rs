use serde::Serialize;
use warp::reject;

use crate::errors::{BackendError, ErrorKind};

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    /// Renders the error envelope. Storage failures only ever expose
    /// the operation summary.
    pub fn flatten(&self) -> FlattenedRejection {
        let (message, error) = match self.error.kind() {
            ErrorKind::NotFound | ErrorKind::Conflict => (self.error.to_string(), None),
            ErrorKind::Validation => (
                self.context.summary().to_owned(),
                Some(self.error.to_string()),
            ),
            ErrorKind::Storage => (self.context.summary().to_owned(), None),
        };

        FlattenedRejection {
            success: false,
            context: self.context.clone(),
            message,
            error,
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    pub(crate) success: bool,
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Category { category: String },
    Create { id: Option<String> },
    Delete { id: String },
    Initialize,
    List,
    Lookup { uid: String },
    Play { id: String },
    Popular,
    Register { uid: Option<String> },
    Retrieve { id: String },
    Update { id: String },
}

impl Context {
    pub fn category(category: String) -> Context {
        Context::Category { category }
    }

    pub fn create(id: Option<String>) -> Context {
        Context::Create { id }
    }

    pub fn delete(id: String) -> Context {
        Context::Delete { id }
    }

    pub fn initialize() -> Context {
        Context::Initialize
    }

    pub fn list() -> Context {
        Context::List
    }

    pub fn lookup(uid: String) -> Context {
        Context::Lookup { uid }
    }

    pub fn play(id: String) -> Context {
        Context::Play { id }
    }

    pub fn popular() -> Context {
        Context::Popular
    }

    pub fn register(uid: Option<String>) -> Context {
        Context::Register { uid }
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn update(id: String) -> Context {
        Context::Update { id }
    }

    /// What failed, from the client's point of view.
    pub fn summary(&self) -> &'static str {
        match self {
            Context::Category { .. } => "Error fetching sounds by category",
            Context::Create { .. } => "Error creating sleep sound",
            Context::Delete { .. } => "Error deleting sleep sound",
            Context::Initialize => "Error initializing default sounds",
            Context::List => "Error fetching sleep sounds",
            Context::Lookup { .. } => "Error fetching user",
            Context::Play { .. } => "Error updating popularity",
            Context::Popular => "Error fetching popular sounds",
            Context::Register { .. } => "Error registering user",
            Context::Retrieve { .. } => "Error fetching sleep sound",
            Context::Update { .. } => "Error updating sleep sound",
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use warp::reject;

    use super::{Context, Rejection};
    use crate::errors::BackendError;

    #[test]
    fn converts_into_a_warp_rejection() {
        let rejection: reject::Rejection = Rejection::new(
            Context::play("rain_heavy".to_owned()),
            BackendError::SoundNotFound {
                id: "rain_heavy".to_owned(),
            },
        )
        .into();

        let found = rejection.find::<Rejection>().unwrap();
        assert!(matches!(found.context, Context::Play { ref id } if id == "rain_heavy"));
    }

    #[test]
    fn not_found_uses_the_error_description() {
        let rejection = Rejection::new(
            Context::retrieve("rain_heavy".to_owned()),
            BackendError::SoundNotFound {
                id: "rain_heavy".to_owned(),
            },
        );

        assert_eq!(
            serde_json::to_value(rejection.flatten()).unwrap(),
            json!({
                "success": false,
                "id": "rain_heavy",
                "message": "Sleep sound not found"
            })
        );
    }

    #[test]
    fn validation_errors_carry_the_cause() {
        let rejection = Rejection::new(Context::create(None), BackendError::required("title"));

        assert_eq!(
            serde_json::to_value(rejection.flatten()).unwrap(),
            json!({
                "success": false,
                "id": null,
                "message": "Error creating sleep sound",
                "error": "`title` is required"
            })
        );
    }

    #[test]
    fn storage_errors_hide_details() {
        let rejection = Rejection::new(
            Context::popular(),
            BackendError::UnknownCategory("Jazz".to_owned()),
        );

        assert_eq!(
            serde_json::to_value(rejection.flatten()).unwrap(),
            json!({
                "success": false,
                "message": "Error fetching popular sounds"
            })
        );
    }
}
