use percent_encoding::percent_decode_str;
use serde::{Deserialize, Deserializer};

use crate::errors::BackendError;

/// Normalizes an external identity uid by stripping surrounding
/// whitespace.
///
/// ```
/// use sleep_sounds::normalization::normalize_uid;
/// assert_eq!(normalize_uid(" abc123 "), "abc123");
/// ```
pub fn normalize_uid(uid: impl AsRef<str>) -> String {
    uid.as_ref().trim().to_owned()
}

/// Deserializes a `String` after running it through `normalize_uid`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(normalize_uid(s))
}

/// Decodes a percent-encoded path segment, so that
/// `White%20Noise` names the `White Noise` category.
pub fn decode_path_segment(raw: &str) -> Result<String, BackendError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| BackendError::InvalidPathSegment(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{decode_path_segment, normalize_uid};

    #[test]
    fn path_segments_are_decoded() {
        assert_eq!(decode_path_segment("White%20Noise").unwrap(), "White Noise");
        assert_eq!(decode_path_segment("rain_heavy").unwrap(), "rain_heavy");
        assert_eq!(decode_path_segment("%20abc123%20").unwrap(), " abc123 ");
        assert!(decode_path_segment("%FF%FE").is_err());
    }

    proptest! {
        #[test]
        fn normalization_only_strips_the_edges(
            uid in "\\S(.*\\S)?",
            space_before in "\\s*",
            space_after in "\\s*"
        ) {
            let normalized = normalize_uid(format!("{}{}{}", space_before, uid, space_after));

            prop_assert_eq!(&normalized, &uid);
            prop_assert_eq!(
                normalize_uid(&normalized),
                normalized.clone(),
                "normalizing {:?} twice changes it",
                normalized
            );
        }
    }
}
