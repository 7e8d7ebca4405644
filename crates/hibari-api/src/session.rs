//! OAuth session state machine.
//!
//! Exactly one credential, exactly one exchange in flight. A second
//! exchange requested while one is running is rejected outright, never
//! queued. All exchange failures are terminal for that attempt: the session
//! returns to `NoCredential` and the caller restarts login.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use hibari_core::config::AniListConfig;
use hibari_core::{token, TokenStore};

use crate::anilist::auth;
use crate::anilist::error::AniListError;

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoCredential,
    Exchanging,
    Authorized(String),
}

/// The code-for-token exchange seam. The real implementation talks to the
/// AniList token endpoint; tests inject a counting mock.
pub trait TokenExchange: Send + Sync {
    fn exchange(&self, code: &str) -> impl Future<Output = Result<String, AniListError>> + Send;
}

/// Production exchanger hitting the AniList token endpoint.
pub struct HttpExchange {
    http: reqwest::Client,
    config: AniListConfig,
}

impl HttpExchange {
    pub fn new(config: AniListConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl TokenExchange for HttpExchange {
    async fn exchange(&self, code: &str) -> Result<String, AniListError> {
        auth::exchange_code(&self.http, &self.config, code).await
    }
}

/// Single-user OAuth session over a persisted credential.
pub struct OAuthSession<E> {
    config: AniListConfig,
    store: Mutex<TokenStore>,
    exchanger: E,
    exchanging: AtomicBool,
    state: Mutex<SessionState>,
}

impl OAuthSession<HttpExchange> {
    /// Session with the production exchanger.
    pub fn open(store: TokenStore, config: AniListConfig) -> Self {
        let exchanger = HttpExchange::new(config.clone());
        Self::new(store, config, exchanger)
    }
}

impl<E: TokenExchange> OAuthSession<E> {
    /// Startup: adopt a stored, unexpired credential; clear anything stale.
    pub fn new(store: TokenStore, config: AniListConfig, exchanger: E) -> Self {
        let state = match store.load() {
            Ok(Some(stored)) if !token::is_expired(&stored) => {
                info!("valid stored credential found");
                SessionState::Authorized(stored)
            }
            Ok(Some(_)) => {
                info!("stored credential is expired, clearing");
                if let Err(e) = store.clear() {
                    warn!(error = %e, "failed to clear stale credential");
                }
                SessionState::NoCredential
            }
            Ok(None) => SessionState::NoCredential,
            Err(e) => {
                warn!(error = %e, "failed to load stored credential");
                SessionState::NoCredential
            }
        };

        Self {
            config,
            store: Mutex::new(store),
            exchanger,
            exchanging: AtomicBool::new(false),
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().expect("session state lock poisoned").clone()
    }

    /// The current bearer token, when authorized.
    pub fn token(&self) -> Option<String> {
        match self.state() {
            SessionState::Authorized(token) => Some(token),
            _ => None,
        }
    }

    /// Consent-page URL for the interactive login.
    pub fn login_url(&self) -> String {
        auth::authorize_url(&self.config)
    }

    /// Hand off to the system browser. The redirect comes back through
    /// [`Self::handle_redirect`].
    pub fn start_login(&self) -> Result<(), AniListError> {
        let url = self.login_url();
        info!("Opening AniList authorization URL in browser");
        open::that(&url).map_err(|e| AniListError::Auth(format!("failed to open browser: {e}")))
    }

    /// Process the OAuth redirect. A redirect without a `code` parameter is
    /// logged and ignored; with one, any existing credential is dropped and
    /// the exchange starts.
    pub async fn handle_redirect(&self, redirect_url: &str) -> Result<(), AniListError> {
        let Some(code) = auth::extract_code(redirect_url) else {
            warn!("no auth code found in redirect URL");
            return Ok(());
        };

        self.clear_credential();
        self.exchange_code(&code).await
    }

    /// Exchange an authorization code for a token. Re-entrant calls while
    /// an exchange is in flight are a no-op.
    pub async fn exchange_code(&self, code: &str) -> Result<(), AniListError> {
        if self.exchanging.swap(true, Ordering::SeqCst) {
            debug!("token exchange already in flight, skipping duplicate call");
            return Ok(());
        }
        self.set_state(SessionState::Exchanging);

        let result = self.exchanger.exchange(code).await;
        self.exchanging.store(false, Ordering::SeqCst);

        match result {
            Ok(access_token) => {
                // Persisting is best-effort: a save failure costs the user a
                // re-login next launch, not this session.
                if let Err(e) = self.with_store(|s| s.save(&access_token)) {
                    warn!(error = %e, "failed to persist access token");
                }
                info!("token exchange succeeded");
                self.set_state(SessionState::Authorized(access_token));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "token exchange failed");
                self.set_state(SessionState::NoCredential);
                Err(e)
            }
        }
    }

    /// Drop the credential and return to `NoCredential`, unconditionally.
    pub fn logout(&self) {
        self.clear_credential();
        self.set_state(SessionState::NoCredential);
        info!("logged out");
    }

    fn clear_credential(&self) {
        if let Err(e) = self.with_store(|s| s.clear()) {
            warn!(error = %e, "failed to clear stored credential");
        }
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock().expect("session state lock poisoned") = state;
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&TokenStore) -> Result<T, hibari_core::HibariError>,
    ) -> Result<T, hibari_core::HibariError> {
        let store = self.store.lock().expect("token store lock poisoned");
        f(&store)
    }
}
