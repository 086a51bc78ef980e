use lazy_static::lazy_static;

use crate::sound::{Category, SoundMetadata};

struct Entry {
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    category: Category,
    image: &'static str,
    duration: f64,
    is_looping: bool,
    is_premium: bool,
    description: &'static str,
    tags: &'static [&'static str],
    popularity: i64,
}

impl Entry {
    fn to_metadata(&self) -> SoundMetadata {
        SoundMetadata {
            id: self.id.to_owned(),
            title: self.title.to_owned(),
            subtitle: self.subtitle.to_owned(),
            category: self.category,
            audio_path: format!("audio/{}.mp3", self.id),
            image_path: format!("lib/assets/images/{}.jpg", self.image),
            duration: self.duration,
            is_looping: self.is_looping,
            is_premium: self.is_premium,
            description: self.description.to_owned(),
            tags: self.tags.iter().map(|t| (*t).to_owned()).collect(),
            popularity: self.popularity,
            is_active: true,
        }
    }
}

const CATALOG: &[Entry] = &[
    Entry {
        id: "rain_heavy",
        title: "Heavy Rain",
        subtitle: "Intense rainfall sounds",
        category: Category::Nature,
        image: "rain",
        duration: 30.0,
        is_looping: true,
        is_premium: false,
        description: "Relaxing heavy rain sounds for deep sleep",
        tags: &["rain", "nature", "relaxing"],
        popularity: 95,
    },
    Entry {
        id: "rain_light",
        title: "Light Rain",
        subtitle: "Gentle rainfall sounds",
        category: Category::Nature,
        image: "rain",
        duration: 30.0,
        is_looping: true,
        is_premium: false,
        description: "Soft rain sounds for peaceful sleep",
        tags: &["rain", "nature", "gentle"],
        popularity: 88,
    },
    Entry {
        id: "ocean_waves",
        title: "Ocean Waves",
        subtitle: "Calming sea sounds",
        category: Category::Nature,
        image: "ocean",
        duration: 45.0,
        is_looping: true,
        is_premium: false,
        description: "Soothing ocean waves for relaxation",
        tags: &["ocean", "waves", "nature"],
        popularity: 92,
    },
    Entry {
        id: "forest_ambient",
        title: "Forest Ambient",
        subtitle: "Peaceful forest sounds",
        category: Category::Nature,
        image: "forest",
        duration: 40.0,
        is_looping: true,
        is_premium: false,
        description: "Immersive forest ambience for deep rest",
        tags: &["forest", "birds", "nature"],
        popularity: 75,
    },
    Entry {
        id: "white_noise",
        title: "White Noise",
        subtitle: "Pure white noise",
        category: Category::WhiteNoise,
        image: "white_noise",
        duration: 60.0,
        is_looping: true,
        is_premium: false,
        description: "Classic white noise for concentration and sleep",
        tags: &["white_noise", "focus", "sleep"],
        popularity: 90,
    },
    Entry {
        id: "pink_noise",
        title: "Pink Noise",
        subtitle: "Balanced frequency noise",
        category: Category::WhiteNoise,
        image: "pink_noise",
        duration: 60.0,
        is_looping: true,
        is_premium: false,
        description: "Pink noise for improved sleep quality",
        tags: &["pink_noise", "balance", "sleep"],
        popularity: 78,
    },
    Entry {
        id: "brown_noise",
        title: "Brown Noise",
        subtitle: "Deep, rumbling noise",
        category: Category::WhiteNoise,
        image: "brown_noise",
        duration: 60.0,
        is_looping: true,
        is_premium: false,
        description: "Deep brown noise for anxiety relief",
        tags: &["brown_noise", "deep", "calm"],
        popularity: 72,
    },
    Entry {
        id: "meditation_deep",
        title: "Deep Sleep Meditation",
        subtitle: "Guided sleep meditation",
        category: Category::Meditation,
        image: "meditation",
        duration: 25.0,
        is_looping: false,
        is_premium: true,
        description: "Guided meditation for deep, restful sleep",
        tags: &["meditation", "guided", "sleep"],
        popularity: 85,
    },
    Entry {
        id: "body_scan",
        title: "Body Scan Relaxation",
        subtitle: "Progressive muscle relaxation",
        category: Category::Meditation,
        image: "meditation",
        duration: 20.0,
        is_looping: false,
        is_premium: true,
        description: "Body scan meditation for tension release",
        tags: &["body_scan", "relaxation", "tension"],
        popularity: 79,
    },
    Entry {
        id: "delta_waves",
        title: "Delta Wave Binaural",
        subtitle: "0.5-4Hz brainwave entrainment",
        category: Category::BinauralBeats,
        image: "binaural",
        duration: 60.0,
        is_looping: true,
        is_premium: true,
        description: "Delta waves for deep sleep and healing",
        tags: &["binaural", "delta", "healing"],
        popularity: 68,
    },
    Entry {
        id: "theta_waves",
        title: "Theta Wave Binaural",
        subtitle: "4-8Hz brainwave entrainment",
        category: Category::BinauralBeats,
        image: "binaural",
        duration: 45.0,
        is_looping: true,
        is_premium: true,
        description: "Theta waves for REM sleep and creativity",
        tags: &["binaural", "theta", "rem"],
        popularity: 71,
    },
    Entry {
        id: "soft_piano",
        title: "Soft Piano",
        subtitle: "Gentle piano melodies",
        category: Category::Instrumental,
        image: "piano",
        duration: 35.0,
        is_looping: true,
        is_premium: false,
        description: "Peaceful piano music for relaxation",
        tags: &["piano", "instrumental", "peaceful"],
        popularity: 82,
    },
    Entry {
        id: "acoustic_guitar",
        title: "Acoustic Guitar",
        subtitle: "Soothing guitar melodies",
        category: Category::Instrumental,
        image: "guitar",
        duration: 30.0,
        is_looping: true,
        is_premium: false,
        description: "Calming acoustic guitar for sleep",
        tags: &["guitar", "instrumental", "calming"],
        popularity: 77,
    },
    Entry {
        id: "space_ambient",
        title: "Space Ambient",
        subtitle: "Ethereal cosmic sounds",
        category: Category::Ambient,
        image: "space",
        duration: 50.0,
        is_looping: true,
        is_premium: false,
        description: "Journey through space with ambient sounds",
        tags: &["space", "ambient", "ethereal"],
        popularity: 65,
    },
    Entry {
        id: "dream_pad",
        title: "Dream Pad",
        subtitle: "Dreamy synthesizer pad",
        category: Category::Ambient,
        image: "dreams",
        duration: 40.0,
        is_looping: true,
        is_premium: false,
        description: "Dreamy ambient sounds for lucid dreaming",
        tags: &["dreams", "ambient", "synthesizer"],
        popularity: 70,
    },
];

lazy_static! {
    /// The sounds a fresh store is seeded with.
    pub static ref DEFAULT_SOUNDS: Vec<SoundMetadata> =
        CATALOG.iter().map(Entry::to_metadata).collect();
}
