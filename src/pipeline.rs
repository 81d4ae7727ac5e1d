//! User-facing export operations.
//!
//! Each operation runs the whole chain for one collection:
//!
//! ```text
//! collection → enrich → table (dropna, parse_date) → normalize → export
//! ```
//!
//! and returns the finished table. Nothing is kept on the session.

use crate::{
    collection,
    enrich::{self, GenreCache},
    error::TuneError,
    export::{Exporter, PLAYLIST_FILE, SAVED_EPISODES_FILE, TOP_TRACKS_FILE},
    info,
    normalize::normalize,
    spotify::MusicApi,
    success,
    table::{EpisodeTable, TableOptions, Tabular, TrackTable},
    types::{AudioFeature, Playlist, PlaylistItem, Track},
    utils, warning,
};

/// Which of the listed playlists to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    One(usize),
    All,
}

impl Selection {
    /// Maps a menu index onto a selection; `count` itself stands for "All".
    pub fn from_index(index: usize, count: usize) -> Result<Self, TuneError> {
        match index {
            i if i < count => Ok(Selection::One(i)),
            i if i == count => Ok(Selection::All),
            i => Err(TuneError::InvalidSelection(format!(
                "{} is not between 0 and {}",
                i, count
            ))),
        }
    }
}

/// Enriches `tracks`, builds the table and applies the row and scaling policies.
pub async fn build_track_table<A>(
    api: &A,
    tracks: &[Track],
    playlist: Option<&str>,
    options: &TableOptions,
    cache: &mut GenreCache,
) -> Result<TrackTable, TuneError>
where
    A: MusicApi + ?Sized,
{
    let genres = enrich::resolve_genres(api, tracks, cache).await;
    let features = enrich::audio_features(api, &enrich::track_ids(tracks)).await;

    let mut table = TrackTable::build(tracks, genres, features, playlist);
    table.apply(options)?;

    if let Some(scaler) = options.scale {
        normalize(&mut table, scaler, &AudioFeature::ALL);
    }

    Ok(table)
}

fn item_tracks(items: Vec<PlaylistItem>) -> Vec<Track> {
    items
        .into_iter()
        .filter_map(|item| {
            let is_local = item.is_local;
            item.track.map(|mut track| {
                track.is_local |= is_local;
                track
            })
        })
        .collect()
}

/// Builds the table of one playlist without exporting it.
///
/// `playlist_ref` is a playlist id or an `open.spotify.com/playlist/<id>` URL.
pub async fn build_playlist<A>(
    api: &A,
    playlist_ref: &str,
    options: &TableOptions,
    cache: &mut GenreCache,
) -> Result<TrackTable, TuneError>
where
    A: MusicApi + ?Sized,
{
    let playlist_id = utils::resolve_id(playlist_ref)?;

    let playlist = api
        .playlist(&playlist_id)
        .await
        .map_err(|e| TuneError::collection_fetch(format!("playlist {}", playlist_id), e))?;
    let items = collection::fetch_playlist_tracks(api, &playlist_id).await?;
    let tracks = item_tracks(items);

    info!("Building table for playlist {} ({} tracks)", playlist.name, tracks.len());
    build_track_table(api, &tracks, Some(&playlist.name), options, cache).await
}

pub async fn playlist_table<A>(
    api: &A,
    playlist_ref: &str,
    options: &TableOptions,
    cache: &mut GenreCache,
    exporter: &Exporter,
) -> Result<TrackTable, TuneError>
where
    A: MusicApi + ?Sized,
{
    let table = build_playlist(api, playlist_ref, options, cache).await?;
    save(&table, options.to_csv, exporter, PLAYLIST_FILE)?;
    Ok(table)
}

/// Exports one listed playlist, or all of them merged.
///
/// In `All` mode every playlist is built on its own (failures are logged and
/// skipped), the tables are concatenated in listing order and duplicate song
/// titles are dropped, keeping the first occurrence.
pub async fn user_playlists<A>(
    api: &A,
    user: Option<&str>,
    selection: Selection,
    options: &TableOptions,
    cache: &mut GenreCache,
    exporter: &Exporter,
) -> Result<TrackTable, TuneError>
where
    A: MusicApi + ?Sized,
{
    let playlists = collection::fetch_playlists(api, user).await?;
    select_playlists(api, &playlists, selection, options, cache, exporter).await
}

pub async fn select_playlists<A>(
    api: &A,
    playlists: &[Playlist],
    selection: Selection,
    options: &TableOptions,
    cache: &mut GenreCache,
    exporter: &Exporter,
) -> Result<TrackTable, TuneError>
where
    A: MusicApi + ?Sized,
{
    match selection {
        Selection::One(index) => {
            let playlist = playlists.get(index).ok_or_else(|| {
                TuneError::InvalidSelection(format!(
                    "{} is not between 0 and {}",
                    index,
                    playlists.len()
                ))
            })?;
            playlist_table(api, &playlist.id, options, cache, exporter).await
        }
        Selection::All => {
            let per_playlist = TableOptions {
                to_csv: false,
                ..*options
            };

            let mut tables = Vec::with_capacity(playlists.len());
            for playlist in playlists {
                match build_playlist(api, &playlist.id, &per_playlist, cache).await {
                    Ok(table) => tables.push(table),
                    Err(e @ TuneError::DateParse(_)) => return Err(e),
                    Err(e) => {
                        warning!("{}", e);
                        warning!("Playlist {} can't be retrieved, skipping it.", playlist.name);
                    }
                }
            }

            let mut merged = TrackTable::concat(tables);
            merged.dedup_by_song();
            save(&merged, options.to_csv, exporter, PLAYLIST_FILE)?;
            Ok(merged)
        }
    }
}

pub async fn top_tracks<A>(
    api: &A,
    options: &TableOptions,
    cache: &mut GenreCache,
    exporter: &Exporter,
) -> Result<TrackTable, TuneError>
where
    A: MusicApi + ?Sized,
{
    let tracks = collection::fetch_top_tracks(api).await?;
    info!("Building table for {} top tracks", tracks.len());

    let table = build_track_table(api, &tracks, None, options, cache).await?;
    save(&table, options.to_csv, exporter, TOP_TRACKS_FILE)?;
    Ok(table)
}

pub async fn saved_episodes<A>(
    api: &A,
    to_csv: bool,
    exporter: &Exporter,
) -> Result<EpisodeTable, TuneError>
where
    A: MusicApi + ?Sized,
{
    let episodes = collection::fetch_saved_episodes(api).await?;
    let table = EpisodeTable::build(&episodes);
    save(&table, to_csv, exporter, SAVED_EPISODES_FILE)?;
    Ok(table)
}

fn save<T: Tabular>(
    table: &T,
    to_csv: bool,
    exporter: &Exporter,
    file_name: &str,
) -> Result<(), TuneError> {
    if to_csv {
        let path = exporter.export(table, file_name)?;
        success!("Saved {}", path.display());
    }
    Ok(())
}
