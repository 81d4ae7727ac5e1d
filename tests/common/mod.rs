#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    io,
    sync::Mutex,
};

use async_trait::async_trait;
use tuneinsight::{
    error::TuneError,
    spotify::MusicApi,
    types::{
        AudioFeatures, Episode, Page, Playlist, PlaylistItem, SavedEpisode, SearchArtist, Show,
        Track, TrackAlbum, TrackArtist,
    },
};

/// In-memory [`MusicApi`] that records the requests it receives.
#[derive(Default)]
pub struct MockApi {
    pub playlists: Vec<Playlist>,
    pub user_playlists: HashMap<String, Vec<Playlist>>,
    pub playlist_items: HashMap<String, Vec<PlaylistItem>>,
    pub unavailable_playlists: HashSet<String>,
    pub top_tracks: Vec<Track>,
    pub episodes: Vec<SavedEpisode>,
    /// Ids without an entry are answered with `null`.
    pub features: HashMap<String, AudioFeatures>,
    pub fail_features: bool,
    pub genres: HashMap<String, Vec<String>>,

    pub feature_calls: Mutex<Vec<Vec<String>>>,
    pub search_calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn feature_calls(&self) -> Vec<Vec<String>> {
        self.feature_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn add_playlist(&mut self, id: &str, name: &str, tracks: Vec<Track>) {
        self.playlists.push(Playlist {
            id: id.to_string(),
            name: name.to_string(),
        });
        let items = tracks
            .into_iter()
            .map(|track| PlaylistItem {
                is_local: false,
                track: Some(track),
            })
            .collect();
        self.playlist_items.insert(id.to_string(), items);
    }

    /// Registers features and genre tags for `track` so the row is complete.
    pub fn know(&mut self, track: &Track, value: f64, genre: &str) {
        if let Some(id) = &track.id {
            self.features.insert(id.clone(), features(value));
        }
        for artist in &track.artists {
            self.genres.insert(artist.name.clone(), vec![genre.to_string()]);
        }
    }
}

fn unavailable(what: &str) -> TuneError {
    TuneError::Io(io::Error::other(format!("{} unavailable", what)))
}

fn page_of<T: Clone>(items: &[T], limit: u32, offset: u32) -> Page<T> {
    let start = (offset as usize).min(items.len());
    let end = (start + limit as usize).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        next: (end < items.len()).then(|| format!("offset={}", end)),
        total: Some(items.len() as u64),
    }
}

#[async_trait]
impl MusicApi for MockApi {
    async fn current_user_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, TuneError> {
        Ok(page_of(&self.playlists, limit, offset))
    }

    async fn user_playlists(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, TuneError> {
        match self.user_playlists.get(user_id) {
            Some(playlists) => Ok(page_of(playlists, limit, offset)),
            None => Err(unavailable("user")),
        }
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, TuneError> {
        if self.unavailable_playlists.contains(playlist_id) {
            return Err(unavailable("playlist"));
        }
        self.playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned()
            .ok_or_else(|| unavailable("playlist"))
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistItem>, TuneError> {
        match self.playlist_items.get(playlist_id) {
            Some(items) => Ok(page_of(items, limit, offset)),
            None => Err(unavailable("playlist tracks")),
        }
    }

    async fn current_user_top_tracks(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Track>, TuneError> {
        Ok(page_of(&self.top_tracks, limit, offset))
    }

    async fn current_user_saved_episodes(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<SavedEpisode>, TuneError> {
        Ok(page_of(&self.episodes, limit, offset))
    }

    async fn audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, TuneError> {
        self.feature_calls.lock().unwrap().push(ids.to_vec());
        if self.fail_features {
            return Err(unavailable("audio features"));
        }
        Ok(ids.iter().map(|id| self.features.get(id).copied()).collect())
    }

    async fn search_artist(&self, name: &str) -> Result<Vec<SearchArtist>, TuneError> {
        self.search_calls.lock().unwrap().push(name.to_string());
        Ok(vec![SearchArtist {
            id: format!("{}-id", name),
            name: name.to_string(),
            genres: self.genres.get(name).cloned().unwrap_or_default(),
        }])
    }
}

pub fn features(value: f64) -> AudioFeatures {
    let mut features = AudioFeatures::missing();
    for feature in tuneinsight::types::AudioFeature::ALL {
        features.set(feature, value);
    }
    features
}

pub fn track(id: &str, name: &str, artists: &[&str], release_date: &str) -> Track {
    Track {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        artists: artists
            .iter()
            .map(|a| TrackArtist {
                id: Some(format!("{}-id", a)),
                name: a.to_string(),
            })
            .collect(),
        album: Some(TrackAlbum {
            name: Some(format!("{} album", name)),
            release_date: Some(release_date.to_string()),
        }),
        duration_ms: Some(180_000),
        explicit: false,
        popularity: Some(50),
        is_local: false,
    }
}

pub fn episode(name: &str, show: &str) -> SavedEpisode {
    SavedEpisode {
        episode: Episode {
            id: format!("{}-id", name),
            name: name.to_string(),
            duration_ms: 1_800_000,
            language: Some("en".to_string()),
            release_date: Some("2023-01-15".to_string()),
            explicit: false,
            show: Show {
                name: show.to_string(),
                publisher: Some("Publisher".to_string()),
            },
        },
    }
}
