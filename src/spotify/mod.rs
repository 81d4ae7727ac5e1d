//! # Spotify Integration Module
//!
//! This module is the integration layer between TuneInsight and the Spotify Web
//! API. It covers the authorization-code handshake and the read-only endpoints
//! the export pipeline consumes.
//!
//! ## Architecture
//!
//! ```text
//! Pipeline (collection, enrich)
//!          ↓
//! MusicApi trait
//!          ↓
//! SpotifyClient (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! Everything above the trait only sees [`MusicApi`], which keeps the
//! pagination and enrichment logic testable against in-memory fakes.
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorization URL construction and the code-for-token exchange
//!   using HTTP basic client authentication.
//! - [`client`] - [`SpotifyClient`], a bearer-token bound implementation of
//!   [`MusicApi`].
//!
//! ## API Coverage
//!
//! - `GET /me/playlists` - Current user's playlists
//! - `GET /users/{user_id}/playlists` - Another user's public playlists
//! - `GET /playlists/{playlist_id}` - Playlist details (display name)
//! - `GET /playlists/{playlist_id}/tracks` - Playlist items
//! - `GET /me/top/tracks` - Current user's top tracks
//! - `GET /me/episodes` - Current user's saved episodes
//! - `GET /audio-features?ids=` - Audio features for up to 100 tracks
//! - `GET /search?type=artist` - Artist search, used for genre tags
//! - `POST /api/token` - Token exchange
//!
//! ## Error Handling
//!
//! Every call returns [`TuneError`]. There is no retry logic: callers decide
//! whether a failure skips a collection or becomes a sentinel value.

use async_trait::async_trait;

use crate::{
    error::TuneError,
    types::{AudioFeatures, Page, Playlist, PlaylistItem, SavedEpisode, SearchArtist, Track},
};

pub mod auth;
pub mod client;

pub use client::SpotifyClient;

/// The slice of the Spotify Web API used by the export pipeline.
#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn current_user_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, TuneError>;

    async fn user_playlists(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, TuneError>;

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, TuneError>;

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistItem>, TuneError>;

    async fn current_user_top_tracks(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Track>, TuneError>;

    async fn current_user_saved_episodes(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<SavedEpisode>, TuneError>;

    /// One entry per requested id, in request order; `None` when Spotify has
    /// no analysis for that track.
    async fn audio_features(&self, ids: &[String]) -> Result<Vec<Option<AudioFeatures>>, TuneError>;

    /// Artists matching `artist:<name>`, best match first.
    async fn search_artist(&self, name: &str) -> Result<Vec<SearchArtist>, TuneError>;
}
