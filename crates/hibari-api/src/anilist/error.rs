use thiserror::Error;

#[derive(Debug, Error)]
pub enum AniListError {
    /// Network-level failure (DNS, TLS, connect, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx HTTP response; 401 with a credential present means the
    /// token was rejected.
    #[error("AniList API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not decode into the expected shape.
    #[error("failed to parse AniList response: {0}")]
    Parse(String),

    /// A GraphQL-level error reported inside a 200 response.
    #[error("AniList reported: {0}")]
    Server(String),

    /// OAuth flow plumbing: browser hand-off, redirect capture, malformed
    /// redirect URL.
    #[error("authentication failed: {0}")]
    Auth(String),
}
