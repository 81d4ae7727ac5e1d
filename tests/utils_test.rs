use tuneinsight::error::TuneError;
use tuneinsight::utils::*;

#[test]
fn test_id_from_playlist_url() {
    let id = id_from_url("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M").unwrap();
    assert_eq!(id, "37i9dQZF1DXcBWIGoYBM5M");
}

#[test]
fn test_id_from_url_ignores_query_string() {
    let id = id_from_url("https://open.spotify.com/user/someone?si=0123abcd").unwrap();
    assert_eq!(id, "someone");
}

#[test]
fn test_id_from_url_without_id_segment() {
    let result = id_from_url("https://open.spotify.com/playlist/");
    assert!(matches!(result, Err(TuneError::InvalidUrl(_))));

    let result = id_from_url("https://open.spotify.com/");
    assert!(matches!(result, Err(TuneError::InvalidUrl(_))));
}

#[test]
fn test_id_from_url_rejects_garbage() {
    let result = id_from_url("not a url");
    assert!(matches!(result, Err(TuneError::InvalidUrl(_))));
}

#[test]
fn test_resolve_id_accepts_bare_ids_and_urls() {
    assert_eq!(resolve_id("  abc123 ").unwrap(), "abc123");
    assert_eq!(
        resolve_id("https://open.spotify.com/playlist/abc123?si=x").unwrap(),
        "abc123"
    );
    assert!(resolve_id("   ").is_err());
}

#[test]
fn test_progress_bar_length() {
    let pb = progress_bar(7, "Working");
    assert_eq!(pb.length(), Some(7));
    pb.finish_and_clear();
}
