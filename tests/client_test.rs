//! HTTP-level tests against a mock Spotify server.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tuneinsight::{
    collection,
    config::Config,
    error::TuneError,
    server::CodeListener,
    session::{AuthSession, Browser},
    spotify::{MusicApi, SpotifyClient, auth},
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn features_json(id: &str, danceability: f64) -> serde_json::Value {
    json!({
        "id": id,
        "danceability": danceability,
        "energy": 0.5,
        "key": 5,
        "loudness": -6.1,
        "mode": 1,
        "speechiness": 0.04,
        "acousticness": 0.2,
        "instrumentalness": 0.0,
        "liveness": 0.1,
        "valence": 0.7,
        "tempo": 120.0,
        "type": "audio_features"
    })
}

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new("user", "pass");
    config.token_url = format!("{}/api/token", server.uri());
    config.api_url = format!("{}/v1", server.uri());
    config
}

// =============================================================================
// Spotify client
// =============================================================================

mod spotify_client {
    use super::*;

    #[tokio::test]
    async fn test_audio_features_keep_request_order_and_nulls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/audio-features"))
            .and(query_param("ids", "a,b,c"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "audio_features": [features_json("a", 0.1), null, features_json("c", 0.3)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            SpotifyClient::new(Client::new(), format!("{}/v1/", server.uri()), "token-123");
        let result = client
            .audio_features(&["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].unwrap().danceability, 0.1);
        assert!(result[1].is_none());
        assert_eq!(result[2].unwrap().key, 5.0);
    }

    #[tokio::test]
    async fn test_top_tracks_follow_next_pages() {
        let server = MockServer::start().await;
        let item = |name: &str| {
            json!({
                "id": format!("{}-id", name),
                "name": name,
                "artists": [{"id": "a1", "name": "Artist"}],
                "album": {"name": "Album", "release_date": "2020-02-02"},
                "duration_ms": 120000,
                "explicit": true,
                "popularity": 42
            })
        };

        Mock::given(method("GET"))
            .and(path("/v1/me/top/tracks"))
            .and(query_param("offset", "0"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [item("one"), item("two")],
                "next": format!("{}/v1/me/top/tracks?offset=50&limit=50", server.uri()),
                "total": 3
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/me/top/tracks"))
            .and(query_param("offset", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [item("three")],
                "next": null,
                "total": 3
            })))
            .mount(&server)
            .await;

        let client = SpotifyClient::new(Client::new(), format!("{}/v1", server.uri()), "token");
        let tracks = collection::fetch_top_tracks(&client).await.unwrap();

        let names: Vec<_> = tracks.iter().map(|t| t.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        assert!(tracks[0].explicit);
        assert_eq!(tracks[2].duration_min(), Some(2.0));
    }

    #[tokio::test]
    async fn test_search_returns_genres_of_first_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "artist:Daft Punk"))
            .and(query_param("type", "artist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "artists": {
                    "items": [{
                        "id": "dp",
                        "name": "Daft Punk",
                        "genres": ["electro", "french house"]
                    }],
                    "next": null
                }
            })))
            .mount(&server)
            .await;

        let client = SpotifyClient::new(Client::new(), format!("{}/v1", server.uri()), "token");
        let hits = client.search_artist("Daft Punk").await.unwrap();

        assert_eq!(hits[0].genres, vec!["electro", "french house"]);
    }

    #[tokio::test]
    async fn test_failed_page_is_a_collection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/playlists"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = SpotifyClient::new(Client::new(), format!("{}/v1", server.uri()), "expired");
        let result = collection::fetch_playlists(&client, None).await;

        assert!(matches!(result, Err(TuneError::CollectionFetch { .. })));
    }
}

// =============================================================================
// Token exchange
// =============================================================================

mod token_exchange {
    use super::*;

    #[tokio::test]
    async fn test_code_is_exchanged_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header("authorization", "Basic dXNlcjpwYXNz"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh",
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": 3600,
                "refresh_token": "refresh"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = auth::exchange_code(&Client::new(), &config_for(&server), Some("abc"))
            .await
            .unwrap();

        assert_eq!(token.access_token, "fresh");
        assert_eq!(token.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_rejected_code_is_an_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code"
            })))
            .mount(&server)
            .await;

        let result = auth::exchange_code(&Client::new(), &config_for(&server), Some("stale")).await;

        match result {
            Err(TuneError::Authentication(msg)) => assert_eq!(msg, "Invalid authorization code"),
            other => panic!("Expected Authentication error, got {:?}", other),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

mod session {
    use super::*;

    struct FixedCode(Option<String>);

    #[async_trait]
    impl CodeListener for FixedCode {
        async fn wait_for_code(&mut self) -> Result<Option<String>, TuneError> {
            Ok(self.0.take())
        }
    }

    #[derive(Default)]
    struct RecordingBrowser {
        opened: Mutex<Vec<String>>,
    }

    impl Browser for RecordingBrowser {
        fn open(&self, url: &str) -> Result<(), String> {
            self.opened.lock().unwrap().push(url.to_string());
            Err("no display".to_string())
        }
    }

    #[tokio::test]
    async fn test_redirect_without_code_leaves_session_unusable() {
        let server = MockServer::start().await;
        let browser = RecordingBrowser::default();

        let session =
            AuthSession::authenticate(config_for(&server), FixedCode(None), &browser).await;

        assert!(!session.is_authenticated());
        assert!(matches!(session.client(), Err(TuneError::Authentication(_))));
        assert_eq!(browser.opened.lock().unwrap().len(), 1);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_captured_code_binds_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;
        let browser = RecordingBrowser::default();

        let session = AuthSession::authenticate(
            config_for(&server),
            FixedCode(Some("abc".into())),
            &browser,
        )
        .await;

        assert!(session.is_authenticated());
        let client = session.client().unwrap();
        assert_eq!(client.api_url(), format!("{}/v1", server.uri()));
        assert!(browser.opened.lock().unwrap()[0].contains("client_id=user"));
    }
}
