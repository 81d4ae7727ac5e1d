use reqwest::Client;

use crate::{
    config::Config,
    error::TuneError,
    info,
    server::CodeListener,
    spotify::{SpotifyClient, auth},
    success, warning,
};

/// Opens the authorization URL for the user.
pub trait Browser {
    fn open(&self, url: &str) -> Result<(), String>;
}

/// The user's default browser.
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        webbrowser::open(url).map_err(|e| e.to_string())
    }
}

/// Result of one authorization-code handshake.
///
/// A session is always constructed, even when the handshake failed. In that
/// case [`AuthSession::client`] reports [`TuneError::Authentication`] to every
/// caller instead of the program crashing halfway.
pub struct AuthSession {
    config: Config,
    client: Option<SpotifyClient>,
}

impl AuthSession {
    /// Runs the authorization-code flow.
    ///
    /// 1. **Authorization URL**: built from the configured client id, redirect
    ///    URI and scopes
    /// 2. **Browser Launch**: opens the URL; on failure the URL is printed for
    ///    manual navigation
    /// 3. **Redirect Capture**: waits on `listener` for the code
    /// 4. **Token Exchange**: trades the code for an access token
    /// 5. **Client Binding**: binds a [`SpotifyClient`] to the token
    ///
    /// Failures in steps 1, 3 and 4 are logged and leave the client unset. The
    /// listener is consumed, so whatever it holds is released before this
    /// returns.
    pub async fn authenticate<L, B>(config: Config, mut listener: L, browser: &B) -> Self
    where
        L: CodeListener,
        B: Browser + ?Sized,
    {
        let http = Client::new();

        let auth_url = match auth::authorize_url(&config) {
            Ok(url) => url,
            Err(e) => {
                warning!("Error during authentication: {}", e);
                return Self::unauthenticated(config);
            }
        };

        if browser.open(auth_url.as_str()).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            );
        }
        info!("Waiting for the authorization redirect...");

        let outcome = match listener.wait_for_code().await {
            Ok(code) => auth::exchange_code(&http, &config, code.as_deref()).await,
            Err(e) => Err(e),
        };
        drop(listener);

        match outcome {
            Ok(token) => {
                success!("Authentication successful.");
                let client = SpotifyClient::new(http, config.api_url.clone(), token.access_token);
                Self {
                    config,
                    client: Some(client),
                }
            }
            Err(e) => {
                warning!("Error during authentication: {}", e);
                warning!("Failed to authenticate. Please check your credentials and try again.");
                Self::unauthenticated(config)
            }
        }
    }

    fn unauthenticated(config: Config) -> Self {
        Self {
            config,
            client: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Result<&SpotifyClient, TuneError> {
        self.client.as_ref().ok_or_else(|| {
            TuneError::Authentication(
                "no access token; run the authorization flow first".to_string(),
            )
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
