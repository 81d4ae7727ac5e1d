//! Offset pagination over Spotify collections.
//!
//! Every collection is read completely into memory: pages are requested at
//! offsets `0, n, 2n, ...` until the API reports no `next` page. A failing
//! request aborts only the collection it belongs to and surfaces as
//! [`TuneError::CollectionFetch`].

use std::future::Future;

use crate::{
    error::TuneError,
    spotify::MusicApi,
    types::{Page, Playlist, PlaylistItem, SavedEpisode, Track},
    utils,
};

pub const PLAYLISTS_PAGE_SIZE: u32 = 50;
pub const PLAYLIST_TRACKS_PAGE_SIZE: u32 = 100;
pub const TOP_TRACKS_PAGE_SIZE: u32 = 50;
pub const SAVED_EPISODES_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection<'a> {
    /// Playlists of the current user, or of `user` when given.
    Playlists { user: Option<&'a str> },
    PlaylistTracks { playlist_id: &'a str },
    TopTracks,
    SavedEpisodes,
}

impl Collection<'_> {
    pub fn page_size(&self) -> u32 {
        match self {
            Collection::Playlists { .. } => PLAYLISTS_PAGE_SIZE,
            Collection::PlaylistTracks { .. } => PLAYLIST_TRACKS_PAGE_SIZE,
            Collection::TopTracks => TOP_TRACKS_PAGE_SIZE,
            Collection::SavedEpisodes => SAVED_EPISODES_PAGE_SIZE,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Collection::Playlists { user: Some(user) } => format!("playlists of {}", user),
            Collection::Playlists { user: None } => "your playlists".to_string(),
            Collection::PlaylistTracks { playlist_id } => format!("playlist {}", playlist_id),
            Collection::TopTracks => "top tracks".to_string(),
            Collection::SavedEpisodes => "saved episodes".to_string(),
        }
    }
}

/// Requests successive pages until one reports no further page.
///
/// `fetch_page` receives `(limit, offset)`. Items keep the order in which the
/// pages were returned. An empty page also ends the walk.
pub async fn paginate<T, F, Fut>(page_size: u32, mut fetch_page: F) -> Result<Vec<T>, TuneError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, TuneError>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch_page(page_size, offset).await?;
        let exhausted = page.next.is_none() || page.items.is_empty();
        items.extend(page.items);
        offset += page_size;

        if exhausted {
            break;
        }
    }

    Ok(items)
}

pub async fn fetch_playlists<A>(api: &A, user: Option<&str>) -> Result<Vec<Playlist>, TuneError>
where
    A: MusicApi + ?Sized,
{
    let collection = Collection::Playlists { user };
    let pb = utils::spinner(format!("Fetching {}...", collection.label()));

    let result = match user {
        Some(user) => {
            paginate(collection.page_size(), |limit, offset| {
                api.user_playlists(user, limit, offset)
            })
            .await
        }
        None => {
            paginate(collection.page_size(), |limit, offset| {
                api.current_user_playlists(limit, offset)
            })
            .await
        }
    };

    pb.finish_and_clear();
    result.map_err(|e| TuneError::collection_fetch(collection.label(), e))
}

/// All items of a playlist, skipping entries whose track was removed.
pub async fn fetch_playlist_tracks<A>(
    api: &A,
    playlist_id: &str,
) -> Result<Vec<PlaylistItem>, TuneError>
where
    A: MusicApi + ?Sized,
{
    let collection = Collection::PlaylistTracks { playlist_id };
    let pb = utils::spinner(format!("Fetching {}...", collection.label()));

    let result = paginate(collection.page_size(), |limit, offset| {
        api.playlist_tracks(playlist_id, limit, offset)
    })
    .await;

    pb.finish_and_clear();
    let items = result.map_err(|e| TuneError::collection_fetch(collection.label(), e))?;

    Ok(items.into_iter().filter(|item| item.track.is_some()).collect())
}

pub async fn fetch_top_tracks<A>(api: &A) -> Result<Vec<Track>, TuneError>
where
    A: MusicApi + ?Sized,
{
    let collection = Collection::TopTracks;
    let pb = utils::spinner(format!("Fetching {}...", collection.label()));

    let result = paginate(collection.page_size(), |limit, offset| {
        api.current_user_top_tracks(limit, offset)
    })
    .await;

    pb.finish_and_clear();
    result.map_err(|e| TuneError::collection_fetch(collection.label(), e))
}

pub async fn fetch_saved_episodes<A>(api: &A) -> Result<Vec<SavedEpisode>, TuneError>
where
    A: MusicApi + ?Sized,
{
    let collection = Collection::SavedEpisodes;
    let pb = utils::spinner(format!("Fetching {}...", collection.label()));

    let result = paginate(collection.page_size(), |limit, offset| {
        api.current_user_saved_episodes(limit, offset)
    })
    .await;

    pb.finish_and_clear();
    result.map_err(|e| TuneError::collection_fetch(collection.label(), e))
}
