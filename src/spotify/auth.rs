use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Url, header};
use serde::Deserialize;

use crate::{config::Config, error::TuneError, types::Token};

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Builds the URL the user visits to grant TuneInsight access.
///
/// The URL points at the configured authorization endpoint and carries the
/// client id, the `code` response type, the redirect URI and the requested
/// scopes, all form-encoded.
///
/// # Errors
///
/// Returns [`TuneError::Config`] when the configured authorization URL is not
/// a valid absolute URL.
///
/// # Example
///
/// ```
/// let config = Config::new("client-id", "client-secret");
/// let url = authorize_url(&config)?;
/// // https://accounts.spotify.com/authorize?client_id=client-id&response_type=code&...
/// ```
pub fn authorize_url(config: &Config) -> Result<Url, TuneError> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope().as_str()),
        ],
    )
    .map_err(|e| TuneError::Config(format!("invalid authorization url {}: {}", config.auth_url, e)))
}

/// Exchanges an authorization code for an access token.
///
/// Completes the authorization-code flow by posting the code captured by the
/// redirect listener to the token endpoint. The client authenticates with HTTP
/// basic auth built from the configured client id and secret.
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `config` - Credentials, redirect URI and token endpoint
/// * `code` - The captured code; `None` when the redirect carried no code
///
/// # Errors
///
/// Every failure is reported as [`TuneError::Authentication`]:
/// - no code was captured
/// - the token endpoint rejected the exchange (the `error_description` is kept)
/// - the request failed on the network or the response was not a token
pub async fn exchange_code(
    http: &Client,
    config: &Config,
    code: Option<&str>,
) -> Result<Token, TuneError> {
    let Some(code) = code else {
        return Err(TuneError::Authentication(
            "the redirect did not carry an authorization code".to_string(),
        ));
    };

    let response = http
        .post(&config.token_url)
        .header(header::AUTHORIZATION, basic_auth_header(&config.client_id, &config.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| TuneError::Authentication(format!("token request failed: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TuneError::Authentication(format!("cannot read token response: {}", e)))?;

    if !status.is_success() {
        let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(err) => err.error_description.unwrap_or(err.error),
            Err(_) => format!("token endpoint answered {}", status),
        };
        return Err(TuneError::Authentication(reason));
    }

    let token: Token = serde_json::from_str(&body)
        .map_err(|e| TuneError::Authentication(format!("malformed token response: {}", e)))?;

    if token.access_token.is_empty() {
        return Err(TuneError::Authentication(
            "token endpoint returned an empty access token".to_string(),
        ));
    }

    Ok(token)
}

pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", STANDARD.encode(credentials))
}
