use thiserror::Error;

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents an SQL error.
    #[error("SQLx error")]
    Sqlx { source: sqlx::Error },

    /// No active sound carries the given ID.
    #[error("Sleep sound not found")]
    SoundNotFound { id: String },

    /// No user carries the given uid.
    #[error("User not found")]
    UserNotFound { uid: String },

    /// A sound with the given ID already exists, active or not.
    #[error("Sleep sound with this ID already exists")]
    SoundAlreadyExists { id: String },

    /// A user with the given uid already exists.
    #[error("User with this uid already exists")]
    UserAlreadyExists { uid: String },

    /// A field is missing or holds a value its constraint rejects.
    #[error("`{field}` {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    /// The request body could not be read as the expected JSON.
    #[error("{0}")]
    MalformedBody(#[source] serde_json::Error),

    /// A path segment was not valid percent-encoded UTF-8.
    #[error("Invalid path segment: {0}")]
    InvalidPathSegment(String),

    /// The store returned a category outside the known set.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Represents an error building an absolute URL.
    #[error("Failed to generate URL")]
    FailedToGenerateUrl { source: url::ParseError },
}

/// The classes of failure callers can distinguish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Storage,
}

impl BackendError {
    pub fn kind(&self) -> ErrorKind {
        use BackendError::*;

        match self {
            SoundNotFound { .. } | UserNotFound { .. } => ErrorKind::NotFound,
            SoundAlreadyExists { .. } | UserAlreadyExists { .. } => ErrorKind::Conflict,
            InvalidField { .. } | MalformedBody(..) | InvalidPathSegment(..) => {
                ErrorKind::Validation
            }
            Sqlx { .. } | UnknownCategory(..) | FailedToGenerateUrl { .. } => ErrorKind::Storage,
        }
    }

    pub(crate) fn required(field: &'static str) -> Self {
        BackendError::InvalidField {
            field,
            reason: "is required",
        }
    }
}

#[cfg(test)]
mod test {
    use super::{BackendError, ErrorKind};

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            BackendError::SoundNotFound { id: "x".into() }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            BackendError::UserAlreadyExists { uid: "x".into() }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(BackendError::required("title").kind(), ErrorKind::Validation);
        assert_eq!(
            BackendError::UnknownCategory("Jazz".into()).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn field_errors_name_the_field() {
        assert_eq!(
            BackendError::required("audioPath").to_string(),
            "`audioPath` is required"
        );
    }
}
