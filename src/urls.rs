use url::{ParseError, Url};

use crate::errors::BackendError;

/// Convenience wrapper for URL generation functions.
#[derive(Clone, Debug)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,
}

impl Urls {
    /// Create a new instance. A trailing slash is added to `base` if
    /// it's missing.
    pub fn new(base: impl AsRef<str>) -> Result<Self, ParseError> {
        let base = base.as_ref();
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{}/", base))?
        };

        Ok(Urls { base })
    }

    pub fn sound(&self, id: &str) -> Result<Url, BackendError> {
        self.resource("sounds", id)
    }

    pub fn user(&self, uid: &str) -> Result<Url, BackendError> {
        self.resource("users", uid)
    }

    fn resource(&self, collection: &str, key: &str) -> Result<Url, BackendError> {
        let mut url = self
            .base
            .join(collection)
            .map_err(|source| BackendError::FailedToGenerateUrl { source })?;

        url.path_segments_mut()
            .map_err(|_| BackendError::FailedToGenerateUrl {
                source: ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .push(key);

        Ok(url)
    }
}

#[cfg(test)]
mod test {
    use super::Urls;

    #[test]
    fn resources_live_under_the_base() {
        let urls = Urls::new("http://localhost:5000/api").unwrap();

        assert_eq!(
            urls.sound("rain_heavy").unwrap().as_str(),
            "http://localhost:5000/api/sounds/rain_heavy"
        );
        assert_eq!(
            urls.user("a b").unwrap().as_str(),
            "http://localhost:5000/api/users/a%20b"
        );
    }

    #[test]
    fn relative_bases_are_refused() {
        assert!(Urls::new("sounds").is_err());
    }
}
