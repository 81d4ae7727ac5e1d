use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    error::TuneError,
    spotify::MusicApi,
    types::{
        ArtistSearchResponse, AudioFeatures, AudioFeaturesResponse, Page, Playlist, PlaylistItem,
        SavedEpisode, SearchArtist, Track,
    },
};

/// Spotify Web API client bound to one access token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TuneError> {
        let api_url = format!("{uri}/{path}", uri = self.api_url, path = path);

        let response = self
            .http
            .get(&api_url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }
}

fn page_query(limit: u32, offset: u32) -> [(&'static str, String); 2] {
    [("limit", limit.to_string()), ("offset", offset.to_string())]
}

#[async_trait]
impl MusicApi for SpotifyClient {
    async fn current_user_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, TuneError> {
        self.get("me/playlists", &page_query(limit, offset)).await
    }

    async fn user_playlists(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>, TuneError> {
        self.get(&format!("users/{}/playlists", user_id), &page_query(limit, offset))
            .await
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Playlist, TuneError> {
        self.get(
            &format!("playlists/{}", playlist_id),
            &[("fields", "id,name".to_string())],
        )
        .await
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistItem>, TuneError> {
        self.get(
            &format!("playlists/{}/tracks", playlist_id),
            &page_query(limit, offset),
        )
        .await
    }

    async fn current_user_top_tracks(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Track>, TuneError> {
        self.get("me/top/tracks", &page_query(limit, offset)).await
    }

    async fn current_user_saved_episodes(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<SavedEpisode>, TuneError> {
        self.get("me/episodes", &page_query(limit, offset)).await
    }

    async fn audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, TuneError> {
        let res: AudioFeaturesResponse = self
            .get("audio-features", &[("ids", ids.join(","))])
            .await?;
        Ok(res.audio_features)
    }

    async fn search_artist(&self, name: &str) -> Result<Vec<SearchArtist>, TuneError> {
        let res: ArtistSearchResponse = self
            .get(
                "search",
                &[
                    ("q", format!("artist:{}", name)),
                    ("type", "artist".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(res.artists.items)
    }
}
