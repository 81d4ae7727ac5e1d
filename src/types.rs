use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// One page of an offset-paginated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub is_local: bool,
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    pub album: Option<TrackAlbum>,
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub explicit: bool,
    pub popularity: Option<u32>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub name: Option<String>,
    pub release_date: Option<String>,
}

impl Track {
    pub fn primary_artist(&self) -> Option<&TrackArtist> {
        self.artists.first()
    }

    pub fn duration_min(&self) -> Option<f64> {
        self.duration_ms.map(|ms| ms as f64 / 60000.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedEpisode {
    pub episode: Episode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    pub show: Show,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub name: String,
    #[serde(default)]
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

/// The eleven per-track metrics, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFeature {
    Danceability,
    Energy,
    Key,
    Loudness,
    Mode,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
}

impl AudioFeature {
    pub const ALL: [AudioFeature; 11] = [
        AudioFeature::Danceability,
        AudioFeature::Energy,
        AudioFeature::Key,
        AudioFeature::Loudness,
        AudioFeature::Mode,
        AudioFeature::Speechiness,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Liveness,
        AudioFeature::Valence,
        AudioFeature::Tempo,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            AudioFeature::Danceability => "danceability",
            AudioFeature::Energy => "energy",
            AudioFeature::Key => "key",
            AudioFeature::Loudness => "loudness",
            AudioFeature::Mode => "mode",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Valence => "valence",
            AudioFeature::Tempo => "tempo",
        }
    }
}

/// Audio features of one track. Every value is NaN when the API had nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub key: f64,
    pub loudness: f64,
    pub mode: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl AudioFeatures {
    pub fn missing() -> Self {
        Self {
            danceability: f64::NAN,
            energy: f64::NAN,
            key: f64::NAN,
            loudness: f64::NAN,
            mode: f64::NAN,
            speechiness: f64::NAN,
            acousticness: f64::NAN,
            instrumentalness: f64::NAN,
            liveness: f64::NAN,
            valence: f64::NAN,
            tempo: f64::NAN,
        }
    }

    pub fn get(&self, feature: AudioFeature) -> f64 {
        match feature {
            AudioFeature::Danceability => self.danceability,
            AudioFeature::Energy => self.energy,
            AudioFeature::Key => self.key,
            AudioFeature::Loudness => self.loudness,
            AudioFeature::Mode => self.mode,
            AudioFeature::Speechiness => self.speechiness,
            AudioFeature::Acousticness => self.acousticness,
            AudioFeature::Instrumentalness => self.instrumentalness,
            AudioFeature::Liveness => self.liveness,
            AudioFeature::Valence => self.valence,
            AudioFeature::Tempo => self.tempo,
        }
    }

    pub fn set(&mut self, feature: AudioFeature, value: f64) {
        let slot = match feature {
            AudioFeature::Danceability => &mut self.danceability,
            AudioFeature::Energy => &mut self.energy,
            AudioFeature::Key => &mut self.key,
            AudioFeature::Loudness => &mut self.loudness,
            AudioFeature::Mode => &mut self.mode,
            AudioFeature::Speechiness => &mut self.speechiness,
            AudioFeature::Acousticness => &mut self.acousticness,
            AudioFeature::Instrumentalness => &mut self.instrumentalness,
            AudioFeature::Liveness => &mut self.liveness,
            AudioFeature::Valence => &mut self.valence,
            AudioFeature::Tempo => &mut self.tempo,
        };
        *slot = value;
    }

    pub fn values(&self) -> [f64; 11] {
        AudioFeature::ALL.map(|f| self.get(f))
    }

    pub fn is_complete(&self) -> bool {
        self.values().iter().all(|v| !v.is_nan())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: Page<SearchArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
}
