//! # CLI Module
//!
//! This module provides the command-line interface layer for TuneInsight. Every
//! command receives an [`AuthSession`](crate::session::AuthSession) that was
//! set up once in `main`, runs one [`pipeline`](crate::pipeline) operation and
//! presents the result.
//!
//! ## Commands
//!
//! - [`playlists`] - Lists a user's playlists and exports one or all of them
//! - [`playlist`] - Exports a single playlist given by id or URL
//! - [`top_tracks`] - Exports the user's top tracks
//! - [`episodes`] - Exports the user's saved podcast episodes
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (prompts, previews)
//!     ↓
//! Pipeline Layer (collection → enrich → table → normalize → export)
//!     ↓
//! API Layer (Spotify Integration)
//! ```
//!
//! ## Error Handling
//!
//! - An unauthenticated session or an unusable output directory ends the
//!   program through [`error!`](crate::error!)
//! - A failed collection fetch is reported with [`warning!`](crate::warning!)
//!   and the command returns without output
//! - Unparseable release dates end the program, since the table cannot be
//!   built in its requested shape
//!
//! ## Usage Patterns
//!
//! ```bash
//! tuneinsight playlists                          # pick from your playlists
//! tuneinsight playlists --select all --csv       # merge every playlist
//! tuneinsight playlist 37i9dQZF1DXcBWIGoYBM5M --scale min-max
//! tuneinsight top-tracks --keep-missing --preview 20
//! tuneinsight episodes --csv
//! ```

mod episodes;
mod playlists;
mod tracks;

pub use episodes::episodes;
pub use playlists::{playlist, playlists};
pub use tracks::top_tracks;

use crate::{
    enrich::GenreCache,
    error,
    error::TuneError,
    export::Exporter,
    info,
    session::AuthSession,
    spotify::SpotifyClient,
    table::{self, TableOptions, Tabular},
    warning,
};

/// Settings shared by every track command.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub table: TableOptions,
    pub cache_genres: bool,
    /// Rows shown in the terminal after the table is built; 0 hides the preview.
    pub preview: usize,
}

impl RunOptions {
    fn genre_cache(&self) -> GenreCache {
        if self.cache_genres {
            GenreCache::enabled()
        } else {
            GenreCache::disabled()
        }
    }
}

fn client(session: &AuthSession) -> &SpotifyClient {
    match session.client() {
        Ok(client) => client,
        Err(e) => error!("{}. Please check your credentials and try again.", e),
    }
}

async fn exporter(session: &AuthSession) -> Exporter {
    match Exporter::from_config(session.config()).await {
        Ok(exporter) => exporter,
        Err(e) => error!(
            "Cannot create output directory {}. Err: {}",
            session.config().output_dir.display(),
            e
        ),
    }
}

fn report<T: Tabular>(result: Result<T, TuneError>, preview: usize) {
    match result {
        Ok(t) => {
            let records = t.records();
            info!("Table has {} rows and {} columns", records.len(), t.headers().len());
            if preview > 0 && !records.is_empty() {
                println!("{}", table::preview(&t, preview));
            }
        }
        Err(e @ TuneError::DateParse(_)) => error!("{}", e),
        Err(e) => warning!("{}", e),
    }
}
