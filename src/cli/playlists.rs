use dialoguer::Input;
use tabled::Table;

use super::{RunOptions, client, exporter, report};
use crate::{
    collection,
    error::TuneError,
    pipeline::{self, Selection},
    session::AuthSession,
    types::{Playlist, PlaylistTableRow},
    utils, warning,
};

/// Lists the playlists of the current user (or of the owner of `user_url`)
/// and exports the selected one, or all of them merged.
///
/// Without `select` the user is prompted with the numbered listing.
pub async fn playlists(
    session: &AuthSession,
    user_url: Option<String>,
    select: Option<String>,
    options: RunOptions,
) {
    let api = client(session);

    let user = match user_url.as_deref().map(utils::id_from_url).transpose() {
        Ok(user) => user,
        Err(e) => {
            warning!("{}", e);
            return;
        }
    };

    let listed = match collection::fetch_playlists(api, user.as_deref()).await {
        Ok(listed) => listed,
        Err(e) => {
            warning!("{}", e);
            return;
        }
    };

    if listed.is_empty() {
        warning!("No playlists found.");
        return;
    }

    println!("{}", Table::new(table_rows(&listed)));

    let answer = match select {
        Some(answer) => answer,
        None => match Input::<String>::new()
            .with_prompt("Choose a playlist number")
            .interact_text()
        {
            Ok(answer) => answer,
            Err(e) => {
                warning!("No selection made: {}", e);
                return;
            }
        },
    };

    let selection = match parse_selection(&answer, listed.len()) {
        Ok(selection) => selection,
        Err(e) => {
            warning!("{}", e);
            return;
        }
    };

    let exporter = exporter(session).await;
    let mut cache = options.genre_cache();
    let result = pipeline::select_playlists(
        api,
        &listed,
        selection,
        &options.table,
        &mut cache,
        &exporter,
    )
    .await;
    report(result, options.preview);
}

/// Exports one playlist given by id or `open.spotify.com` URL.
pub async fn playlist(session: &AuthSession, reference: String, options: RunOptions) {
    let api = client(session);
    let exporter = exporter(session).await;
    let mut cache = options.genre_cache();

    let result =
        pipeline::playlist_table(api, &reference, &options.table, &mut cache, &exporter).await;
    report(result, options.preview);
}

fn table_rows(playlists: &[Playlist]) -> Vec<PlaylistTableRow> {
    let mut rows: Vec<PlaylistTableRow> = playlists
        .iter()
        .enumerate()
        .map(|(index, p)| PlaylistTableRow {
            index,
            name: p.name.clone(),
        })
        .collect();
    rows.push(PlaylistTableRow {
        index: playlists.len(),
        name: "All".to_string(),
    });
    rows
}

fn parse_selection(answer: &str, count: usize) -> Result<Selection, TuneError> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }

    let index = answer
        .parse::<usize>()
        .map_err(|_| TuneError::InvalidSelection(format!("{} is not a playlist number", answer)))?;
    Selection::from_index(index, count)
}
