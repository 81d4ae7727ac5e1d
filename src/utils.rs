use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;

use crate::error::TuneError;

/// Spinner for requests of unknown length.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Bar for passes over a known number of items.
pub fn progress_bar(len: usize, message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_message(message.into());
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:30.blue}] {pos}/{len}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

/// Extracts the id from an `open.spotify.com/<kind>/<id>` URL.
///
/// The id is the second path segment; query strings such as `?si=...` are
/// ignored.
pub fn id_from_url(url: &str) -> Result<String, TuneError> {
    let parsed = Url::parse(url).map_err(|e| TuneError::InvalidUrl(format!("{}: {}", url, e)))?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.nth(1))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TuneError::InvalidUrl(format!("{} has no id segment", url)))
}

/// Accepts either a bare id or a Spotify URL.
pub fn resolve_id(reference: &str) -> Result<String, TuneError> {
    let reference = reference.trim();
    if reference.contains("://") {
        id_from_url(reference)
    } else if reference.is_empty() {
        Err(TuneError::InvalidUrl("empty reference".to_string()))
    } else {
        Ok(reference.to_string())
    }
}
