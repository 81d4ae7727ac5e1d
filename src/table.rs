//! Flat tables built from fetched items and their enrichment results.
//!
//! Column order is fixed and explicit, see [`TrackTable::headers`] and
//! [`EpisodeTable::headers`]. Missing values are kept as `None`/NaN until
//! [`TrackTable::drop_missing`] removes the rows that carry them.

use std::{collections::HashSet, fmt};

use chrono::NaiveDate;
use tabled::builder::Builder;

use crate::{
    error::TuneError,
    normalize::Scaler,
    types::{AudioFeature, AudioFeatures, SavedEpisode, Track},
};

/// Placeholder release date Spotify reports for some unreleased albums.
pub const SENTINEL_RELEASE_DATE: &str = "0000";

/// How a fetched collection is turned into its final table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableOptions {
    pub scale: Option<Scaler>,
    pub dropna: bool,
    pub parse_date: bool,
    pub to_csv: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            scale: None,
            dropna: true,
            parse_date: true,
            to_csv: false,
        }
    }
}

/// Anything that can be written as a header row plus records.
pub trait Tabular {
    fn headers(&self) -> Vec<&'static str>;
    fn records(&self) -> Vec<Vec<String>>;
}

/// Renders the first `limit` rows for the terminal.
pub fn preview<T: Tabular>(table: &T, limit: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.headers().into_iter().map(str::to_string));
    for record in table.records().into_iter().take(limit) {
        builder.push_record(record);
    }
    builder.build().to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseDate {
    Raw(String),
    Parsed(NaiveDate),
}

impl ReleaseDate {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, ReleaseDate::Raw(raw) if raw == SENTINEL_RELEASE_DATE)
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseDate::Raw(raw) => write!(f, "{}", raw),
            ReleaseDate::Parsed(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`; a missing month or day is 1.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, TuneError> {
    let invalid = || TuneError::DateParse(raw.to_string());
    let parts: Vec<&str> = raw.trim().split('-').collect();

    let number = |part: &str| -> Result<u32, TuneError> {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse::<u32>().map_err(|_| invalid())
    };

    let (year, month, day) = match parts[..] {
        [y] if y.len() == 4 => (number(y)?, 1, 1),
        [y, m] if y.len() == 4 => (number(y)?, number(m)?, 1),
        [y, m, d] if y.len() == 4 => (number(y)?, number(m)?, number(d)?),
        _ => return Err(invalid()),
    };

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub songs: Option<String>,
    /// Display name of the source playlist; `None` outside playlist tables.
    pub playlist: Option<String>,
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub release_date: Option<ReleaseDate>,
    pub is_local: bool,
    pub explicit: bool,
    pub popularity: Option<u32>,
    pub duration_min: Option<f64>,
    pub features: AudioFeatures,
}

impl TrackRow {
    pub fn from_track(
        track: &Track,
        genre: Option<String>,
        features: AudioFeatures,
        playlist: Option<&str>,
    ) -> Self {
        let album = track.album.as_ref();

        Self {
            songs: track.name.clone(),
            playlist: playlist.map(str::to_string),
            genre,
            artist: track.primary_artist().map(|a| a.name.clone()),
            album: album.and_then(|a| a.name.clone()),
            release_date: album
                .and_then(|a| a.release_date.clone())
                .map(ReleaseDate::Raw),
            is_local: track.is_local,
            explicit: track.explicit,
            popularity: track.popularity,
            duration_min: track.duration_min(),
            features,
        }
    }

    /// `true` when no column of the row holds a missing value.
    pub fn is_complete(&self, kind: TrackTableKind) -> bool {
        let playlist_ok = kind == TrackTableKind::TopTracks || self.playlist.is_some();

        playlist_ok
            && self.songs.is_some()
            && self.genre.is_some()
            && self.artist.is_some()
            && self.album.is_some()
            && self.release_date.is_some()
            && self.popularity.is_some()
            && self.duration_min.is_some_and(|d| !d.is_nan())
            && self.features.is_complete()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackTableKind {
    /// Carries the `playlist` column.
    Playlist,
    TopTracks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackTable {
    kind: TrackTableKind,
    rows: Vec<TrackRow>,
}

impl TrackTable {
    /// Assembles one row per track from index-aligned enrichment results.
    ///
    /// `playlist` selects the table kind: playlist tables get the name as a
    /// constant column.
    pub fn build(
        tracks: &[Track],
        genres: Vec<Option<String>>,
        features: Vec<AudioFeatures>,
        playlist: Option<&str>,
    ) -> Self {
        let kind = match playlist {
            Some(_) => TrackTableKind::Playlist,
            None => TrackTableKind::TopTracks,
        };

        let rows = tracks
            .iter()
            .zip(genres)
            .zip(features)
            .map(|((track, genre), features)| {
                TrackRow::from_track(track, genre, features, playlist)
            })
            .collect();

        Self { kind, rows }
    }

    /// Unions playlist tables in order.
    pub fn concat(tables: Vec<TrackTable>) -> Self {
        let rows = tables.into_iter().flat_map(|t| t.rows).collect();
        Self {
            kind: TrackTableKind::Playlist,
            rows,
        }
    }

    pub fn kind(&self) -> TrackTableKind {
        self.kind
    }

    pub fn rows(&self) -> &[TrackRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drops rows with any missing value, then rows dated `"0000"`.
    pub fn drop_missing(&mut self) {
        let kind = self.kind;
        self.rows.retain(|row| row.is_complete(kind));
        self.rows
            .retain(|row| !row.release_date.as_ref().is_some_and(ReleaseDate::is_sentinel));
    }

    /// Replaces every raw release date with a calendar date.
    ///
    /// `"0000"` and absent dates are left alone.
    ///
    /// # Errors
    ///
    /// [`TuneError::DateParse`] on the first malformed date; the table is left
    /// partially converted in that case.
    pub fn parse_dates(&mut self) -> Result<(), TuneError> {
        for row in self.rows.iter_mut() {
            if let Some(ReleaseDate::Raw(raw)) = &row.release_date {
                if raw == SENTINEL_RELEASE_DATE {
                    continue;
                }
                let date = parse_release_date(raw)?;
                row.release_date = Some(ReleaseDate::Parsed(date));
            }
        }
        Ok(())
    }

    /// Keeps the first row for every song title.
    pub fn dedup_by_song(&mut self) {
        let mut seen = HashSet::new();
        self.rows.retain(|row| seen.insert(row.songs.clone()));
    }

    /// Applies the row policies of `options` (`dropna`, then `parse_date`).
    pub fn apply(&mut self, options: &TableOptions) -> Result<(), TuneError> {
        if options.dropna {
            self.drop_missing();
        }
        if options.parse_date {
            self.parse_dates()?;
        }
        Ok(())
    }

    pub fn column(&self, feature: AudioFeature) -> Vec<f64> {
        self.rows.iter().map(|row| row.features.get(feature)).collect()
    }

    /// Overwrites a feature column. `values` must have one entry per row.
    pub fn set_column(&mut self, feature: AudioFeature, values: &[f64]) {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.features.set(feature, *value);
        }
    }
}

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn float_cell(value: f64) -> String {
    if value.is_nan() { String::new() } else { value.to_string() }
}

impl Tabular for TrackTable {
    fn headers(&self) -> Vec<&'static str> {
        let mut headers = vec!["songs"];
        if self.kind == TrackTableKind::Playlist {
            headers.push("playlist");
        }
        headers.extend([
            "genre",
            "artist",
            "album",
            "release_date",
            "is_local",
            "explicit",
            "popularity",
            "duration_min",
        ]);
        headers.extend(AudioFeature::ALL.iter().map(|f| f.column()));
        headers
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = vec![cell(&row.songs)];
                if self.kind == TrackTableKind::Playlist {
                    record.push(cell(&row.playlist));
                }
                record.extend([
                    cell(&row.genre),
                    cell(&row.artist),
                    cell(&row.album),
                    cell(&row.release_date),
                    row.is_local.to_string(),
                    row.explicit.to_string(),
                    cell(&row.popularity),
                    row.duration_min.map(float_cell).unwrap_or_default(),
                ]);
                record.extend(row.features.values().into_iter().map(float_cell));
                record
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub name: String,
    pub duration_min: f64,
    pub language: Option<String>,
    pub release_date: Option<String>,
    pub show: String,
    pub publisher: Option<String>,
    pub explicit: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpisodeTable {
    rows: Vec<EpisodeRow>,
}

impl EpisodeTable {
    pub fn build(saved: &[SavedEpisode]) -> Self {
        let rows = saved
            .iter()
            .map(|item| {
                let episode = &item.episode;
                EpisodeRow {
                    name: episode.name.clone(),
                    duration_min: episode.duration_ms as f64 / 60000.0,
                    language: episode.language.clone(),
                    release_date: episode.release_date.clone(),
                    show: episode.show.name.clone(),
                    publisher: episode.show.publisher.clone(),
                    explicit: episode.explicit,
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[EpisodeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Tabular for EpisodeTable {
    fn headers(&self) -> Vec<&'static str> {
        vec![
            "name",
            "duration_min",
            "language",
            "release_date",
            "show",
            "publisher",
            "explicit",
        ]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    row.name.clone(),
                    float_cell(row.duration_min),
                    cell(&row.language),
                    cell(&row.release_date),
                    row.show.clone(),
                    cell(&row.publisher),
                    row.explicit.to_string(),
                ]
            })
            .collect()
    }
}
