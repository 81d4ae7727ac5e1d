//! Per-track enrichment: audio features and genre tags.
//!
//! Both passes run over the whole fetched set before the table is built and
//! never fail: whatever Spotify cannot answer becomes a sentinel
//! ([`AudioFeatures::missing`] or a `None` genre) so that row shapes stay
//! uniform. Dropping incomplete rows is the table builder's job.

use std::collections::HashMap;

use crate::{
    spotify::MusicApi,
    types::{AudioFeatures, Track, TrackArtist},
    utils, warning,
};

/// Maximum number of ids sent in one audio-features request.
pub const FEATURE_BATCH_SIZE: usize = 50;

/// Fetches audio features for `ids`, one request per batch of
/// [`FEATURE_BATCH_SIZE`] positions.
///
/// The result is index-aligned with `ids`. Positions without an id (local
/// files), `null` answers and batches whose request failed all get
/// [`AudioFeatures::missing`]. A batch without a single known id is not
/// requested at all.
pub async fn audio_features<A>(api: &A, ids: &[Option<String>]) -> Vec<AudioFeatures>
where
    A: MusicApi + ?Sized,
{
    let pb = utils::progress_bar(
        ids.len().div_ceil(FEATURE_BATCH_SIZE),
        "Retrieving audio features",
    );
    let mut features = Vec::with_capacity(ids.len());

    for batch in ids.chunks(FEATURE_BATCH_SIZE) {
        let known: Vec<String> = batch.iter().flatten().cloned().collect();

        let mut fetched = if known.is_empty() {
            Vec::new().into_iter()
        } else {
            match api.audio_features(&known).await {
                Ok(list) => list.into_iter(),
                Err(e) => {
                    warning!("Audio features unavailable for {} tracks: {}", known.len(), e);
                    vec![None; known.len()].into_iter()
                }
            }
        };

        for id in batch {
            let entry = match id {
                Some(_) => fetched.next().flatten(),
                None => None,
            };
            features.push(entry.unwrap_or_else(AudioFeatures::missing));
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    features
}

/// Memo of artist name → genre tags for one run.
///
/// Disabled by default: every (track, artist) pair then costs one search
/// request, even for artists that appear on many tracks.
#[derive(Debug, Default)]
pub struct GenreCache {
    enabled: bool,
    tags: HashMap<String, Vec<String>>,
}

impl GenreCache {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled() -> Self {
        Self {
            enabled: true,
            tags: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn get(&self, artist: &str) -> Option<&Vec<String>> {
        if self.enabled { self.tags.get(artist) } else { None }
    }

    fn insert(&mut self, artist: &str, tags: Vec<String>) {
        if self.enabled {
            self.tags.insert(artist.to_string(), tags);
        }
    }
}

/// Genre tags of the first search hit for `artist:<name>`.
///
/// A failed search counts as "no tags" and is not cached.
pub async fn artist_genres<A>(api: &A, name: &str, cache: &mut GenreCache) -> Vec<String>
where
    A: MusicApi + ?Sized,
{
    if let Some(tags) = cache.get(name) {
        return tags.clone();
    }

    match api.search_artist(name).await {
        Ok(hits) => {
            let tags = hits.into_iter().next().map(|a| a.genres).unwrap_or_default();
            cache.insert(name, tags.clone());
            tags
        }
        Err(e) => {
            warning!("Artist search for {} failed: {}", name, e);
            Vec::new()
        }
    }
}

/// First tag of the first credited artist that has any tags.
///
/// Every credited artist is looked up, in credit order; tags are never merged
/// across artists.
pub async fn resolve_genre<A>(
    api: &A,
    artists: &[TrackArtist],
    cache: &mut GenreCache,
) -> Option<String>
where
    A: MusicApi + ?Sized,
{
    let mut genre = None;

    for artist in artists {
        let tags = artist_genres(api, &artist.name, cache).await;
        if genre.is_none() {
            genre = tags.into_iter().next();
        }
    }

    genre
}

pub async fn resolve_genres<A>(
    api: &A,
    tracks: &[Track],
    cache: &mut GenreCache,
) -> Vec<Option<String>>
where
    A: MusicApi + ?Sized,
{
    let pb = utils::progress_bar(tracks.len(), "Retrieving track genres");
    let mut genres = Vec::with_capacity(tracks.len());

    for track in tracks {
        genres.push(resolve_genre(api, &track.artists, cache).await);
        pb.inc(1);
    }

    pb.finish_and_clear();
    genres
}

pub fn track_ids(tracks: &[Track]) -> Vec<Option<String>> {
    tracks.iter().map(|t| t.id.clone()).collect()
}
