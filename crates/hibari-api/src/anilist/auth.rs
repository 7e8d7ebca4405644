//! OAuth2 Authorization Code Grant plumbing for AniList.

use std::io::{Read, Write};
use std::net::TcpListener;

use serde::Deserialize;
use url::Url;

use hibari_core::config::AniListConfig;

use super::error::AniListError;

const AUTH_URL: &str = "https://anilist.co/api/v2/oauth/authorize";
const TOKEN_URL: &str = "https://anilist.co/api/v2/oauth/token";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
}

/// Consent-page URL the browser is sent to.
pub fn authorize_url(config: &AniListConfig) -> String {
    format!(
        "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code",
        config.client_id, config.redirect_uri
    )
}

/// Extract the `code` query parameter from a redirect URL.
pub fn extract_code(redirect_url: &str) -> Option<String> {
    let parsed = Url::parse(redirect_url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
}

/// Exchange the authorization code for an access token.
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &AniListConfig,
    code: &str,
) -> Result<String, AniListError> {
    let resp = http
        .post(TOKEN_URL)
        .json(&serde_json::json!({
            "grant_type": "authorization_code",
            "client_id": config.client_id,
            "client_secret": config.client_secret,
            "redirect_uri": config.redirect_uri,
            "code": code,
        }))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(AniListError::Api {
            status,
            message: body,
        });
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| AniListError::Parse(e.to_string()))?;
    Ok(token.access_token)
}

/// Spawn a one-shot TCP listener on the redirect URI's port, wait for the
/// OAuth redirect, and return it as a URL string for
/// [`crate::session::OAuthSession::handle_redirect`].
pub fn listen_for_redirect(config: &AniListConfig) -> Result<String, AniListError> {
    let port = Url::parse(&config.redirect_uri)
        .ok()
        .and_then(|u| u.port())
        .ok_or_else(|| {
            AniListError::Auth(format!(
                "redirect URI has no port to listen on: {}",
                config.redirect_uri
            ))
        })?;

    let listener = TcpListener::bind(("127.0.0.1", port))
        .map_err(|e| AniListError::Auth(format!("failed to bind localhost:{port}: {e}")))?;

    tracing::info!(port, "Waiting for AniList OAuth redirect...");

    let (mut stream, _) = listener
        .accept()
        .map_err(|e| AniListError::Auth(format!("failed to accept connection: {e}")))?;

    let mut buf = [0u8; 4096];
    let n = stream
        .read(&mut buf)
        .map_err(|e| AniListError::Auth(format!("failed to read from stream: {e}")))?;
    let request = String::from_utf8_lossy(&buf[..n]);

    // Request line looks like "GET /?code=... HTTP/1.1".
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| AniListError::Auth("malformed HTTP request from redirect".into()))?;

    let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n\
                    <html><body><h2>Authorization successful!</h2>\
                    <p>You can close this tab and return to hibari.</p></body></html>";
    let _ = stream.write_all(response.as_bytes());

    Ok(format!("http://localhost:{port}{path}"))
}
