use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::BackendError;

/// Where sounds without artwork point their image.
pub const PLACEHOLDER_IMAGE_PATH: &str = "lib/assets/images/placeholder.jpg";

/// The fixed set of categories a sound can be filed under.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Category {
    Nature,
    #[serde(rename = "White Noise")]
    WhiteNoise,
    Meditation,
    #[serde(rename = "Binaural Beats")]
    BinauralBeats,
    Instrumental,
    Ambient,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Nature,
        Category::WhiteNoise,
        Category::Meditation,
        Category::BinauralBeats,
        Category::Instrumental,
        Category::Ambient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Nature => "Nature",
            Category::WhiteNoise => "White Noise",
            Category::Meditation => "Meditation",
            Category::BinauralBeats => "Binaural Beats",
            Category::Instrumental => "Instrumental",
            Category::Ambient => "Ambient",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| BackendError::UnknownCategory(s.to_owned()))
    }
}

/// The times a record was created and last modified.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Times {
    /// The date and time it was created.
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,

    /// The date and time it was last modified.
    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

impl Times {
    pub fn at(now: OffsetDateTime) -> Self {
        Times {
            created_at: now,
            updated_at: now,
        }
    }
}

/// The client-controlled fields of a sound, with the defaults a
/// submission may leave out.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundMetadata {
    /// The business key. Unique across every sound, active or not.
    pub id: String,

    pub title: String,

    pub subtitle: String,

    pub category: Category,

    /// Path of the audio asset, relative to the client bundle.
    pub audio_path: String,

    #[serde(default = "default_image_path")]
    pub image_path: String,

    /// Length in minutes.
    pub duration: f64,

    #[serde(default = "default_true")]
    pub is_looping: bool,

    #[serde(default)]
    pub is_premium: bool,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// How many times the sound was played.
    #[serde(default)]
    pub popularity: i64,

    /// Cleared instead of removing the sound.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SoundMetadata {
    /// Checks the presence constraints serde can't express: required
    /// text must not be blank.
    pub fn validate(&self) -> Result<(), BackendError> {
        let fields = [
            ("id", &self.id),
            ("title", &self.title),
            ("subtitle", &self.subtitle),
            ("audioPath", &self.audio_path),
        ];

        for (field, value) in fields.iter() {
            if value.trim().is_empty() {
                return Err(BackendError::required(*field));
            }
        }

        Ok(())
    }
}

fn default_image_path() -> String {
    PLACEHOLDER_IMAGE_PATH.to_owned()
}

fn default_true() -> bool {
    true
}

/// A sound ready to be stored, before the store assigns its identity.
#[derive(Clone, Debug, PartialEq)]
pub struct NewSound {
    pub metadata: SoundMetadata,
    pub times: Times,
}

impl NewSound {
    pub fn new(metadata: SoundMetadata, now: OffsetDateTime) -> Self {
        NewSound {
            metadata,
            times: Times::at(now),
        }
    }
}

/// A single sound in the store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SoundRecord {
    /// The identity assigned by the store.
    #[serde(rename = "_id")]
    pub storage_id: Uuid,

    #[serde(flatten)]
    pub metadata: SoundMetadata,

    #[serde(flatten)]
    pub times: Times,
}

impl SoundRecord {
    pub fn new(storage_id: Uuid, sound: NewSound) -> Self {
        SoundRecord {
            storage_id,
            metadata: sound.metadata,
            times: sound.times,
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

/// A partial update as submitted. The outer `Option` tells whether the
/// field was sent at all; the inner one whether it was `null`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPatch {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub subtitle: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<Category>>,

    #[serde(default, deserialize_with = "present")]
    pub audio_path: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub image_path: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub duration: Option<Option<f64>>,

    #[serde(default, deserialize_with = "present")]
    pub is_looping: Option<Option<bool>>,

    #[serde(default, deserialize_with = "present")]
    pub is_premium: Option<Option<bool>>,

    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Option<Vec<String>>>,

    #[serde(default, deserialize_with = "present")]
    pub is_active: Option<Option<bool>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl SoundPatch {
    /// Resolves the patch into concrete changes. Clearing a required
    /// field is rejected; clearing a defaulted one restores its default.
    pub fn into_changes(self) -> Result<SoundChanges, BackendError> {
        Ok(SoundChanges {
            id: required_text("id", self.id)?,
            title: required_text("title", self.title)?,
            subtitle: required_text("subtitle", self.subtitle)?,
            category: required("category", self.category)?,
            audio_path: required_text("audioPath", self.audio_path)?,
            image_path: self
                .image_path
                .map(|v| v.unwrap_or_else(default_image_path)),
            duration: required("duration", self.duration)?,
            is_looping: self.is_looping.map(|v| v.unwrap_or(true)),
            is_premium: self.is_premium.map(|v| v.unwrap_or(false)),
            description: self.description.map(Option::unwrap_or_default),
            tags: self.tags.map(Option::unwrap_or_default),
            is_active: self.is_active.map(|v| v.unwrap_or(true)),
        })
    }
}

fn required<T>(field: &'static str, value: Option<Option<T>>) -> Result<Option<T>, BackendError> {
    match value {
        None => Ok(None),
        Some(Some(value)) => Ok(Some(value)),
        Some(None) => Err(BackendError::required(field)),
    }
}

fn required_text(
    field: &'static str,
    value: Option<Option<String>>,
) -> Result<Option<String>, BackendError> {
    match required(field, value)? {
        Some(text) if text.trim().is_empty() => Err(BackendError::required(field)),
        x => Ok(x),
    }
}

/// Validated field changes. `None` leaves the stored value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SoundChanges {
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub category: Option<Category>,
    pub audio_path: Option<String>,
    pub image_path: Option<String>,
    pub duration: Option<f64>,
    pub is_looping: Option<bool>,
    pub is_premium: Option<bool>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl SoundChanges {
    pub fn apply(&self, metadata: &mut SoundMetadata) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut metadata.id, &self.id);
        set(&mut metadata.title, &self.title);
        set(&mut metadata.subtitle, &self.subtitle);
        set(&mut metadata.category, &self.category);
        set(&mut metadata.audio_path, &self.audio_path);
        set(&mut metadata.image_path, &self.image_path);
        set(&mut metadata.duration, &self.duration);
        set(&mut metadata.is_looping, &self.is_looping);
        set(&mut metadata.is_premium, &self.is_premium);
        set(&mut metadata.description, &self.description);
        set(&mut metadata.tags, &self.tags);
        set(&mut metadata.is_active, &self.is_active);
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn heavy_rain() -> SoundMetadata {
        serde_json::from_value(json!({
            "id": "rain_heavy",
            "title": "Heavy Rain",
            "subtitle": "Intense rainfall sounds",
            "category": "Nature",
            "audioPath": "audio/rain_heavy.mp3",
            "duration": 30
        }))
        .expect("parse minimal sound")
    }

    #[test]
    fn submissions_get_defaults() {
        let sound = heavy_rain();

        assert_eq!(sound.image_path, PLACEHOLDER_IMAGE_PATH);
        assert!(sound.is_looping);
        assert!(!sound.is_premium);
        assert_eq!(sound.description, "");
        assert!(sound.tags.is_empty());
        assert_eq!(sound.popularity, 0);
        assert!(sound.is_active);
        assert!(sound.validate().is_ok());
    }

    #[test]
    fn categories_round_trip_through_their_labels() {
        for category in Category::ALL.iter() {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), *category);
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                json!(category.as_str())
            );
        }

        assert!("white noise".parse::<Category>().is_err());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let result = serde_json::from_value::<SoundMetadata>(json!({
            "id": "x",
            "title": "X",
            "subtitle": "X",
            "category": "Jazz",
            "audioPath": "audio/x.mp3",
            "duration": 1
        }));

        assert!(result.is_err());
    }

    #[test]
    fn blank_required_text_is_rejected() {
        let mut sound = heavy_rain();
        sound.subtitle = "  ".to_owned();

        match sound.validate() {
            Err(BackendError::InvalidField { field, .. }) => assert_eq!(field, "subtitle"),
            x => panic!("expected an invalid field, got {:?}", x),
        }
    }

    #[test]
    fn records_serialize_with_wire_names() {
        let now = OffsetDateTime::from_unix_timestamp(1_600_000_000);
        let record = SoundRecord::new(Uuid::nil(), NewSound::new(heavy_rain(), now));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["_id"], json!(Uuid::nil().to_string()));
        assert_eq!(value["audioPath"], json!("audio/rain_heavy.mp3"));
        assert_eq!(value["isActive"], json!(true));
        assert_eq!(value["createdAt"], json!(1_600_000_000));

        let parsed: SoundRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn patches_distinguish_null_from_absent() {
        let patch: SoundPatch = serde_json::from_value(json!({
            "title": "Heavier Rain",
            "description": null,
            "popularity": 1000,
            "createdAt": 0
        }))
        .unwrap();
        let changes = patch.into_changes().unwrap();

        assert_eq!(changes.title.as_deref(), Some("Heavier Rain"));
        assert_eq!(changes.description.as_deref(), Some(""));
        assert_eq!(changes.subtitle, None);

        let mut sound = heavy_rain();
        sound.description = "Loud".to_owned();
        changes.apply(&mut sound);

        assert_eq!(sound.title, "Heavier Rain");
        assert_eq!(sound.description, "");
        assert_eq!(sound.popularity, 0);
    }

    #[test]
    fn patches_cannot_clear_required_fields() {
        for body in &[
            json!({ "title": null }),
            json!({ "audioPath": "" }),
            json!({ "duration": null }),
            json!({ "category": null }),
        ] {
            let patch: SoundPatch = serde_json::from_value(body.clone()).unwrap();

            assert!(patch.into_changes().is_err(), "{} must be rejected", body);
        }
    }
}
