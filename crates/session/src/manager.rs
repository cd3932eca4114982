//! Session and token lifecycle
//!
//! [`SessionManager`] is the single owner of authentication state. It keeps
//! the persisted token fields in a [`SessionStore`] and publishes an
//! in-memory [`SessionState`] through a watch channel.

use crate::api::SessionApi;
use crate::error::{Result, SessionError};
use crate::state::{AuthStatus, SessionState};
use async_trait::async_trait;
use reel_core::{Clock, Session, SessionStore, StorageKey, SystemClock, expiry_after};
use reel_http::BearerSource;
use reel_http::types::TokenPair;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Tokens expiring within this window are refreshed before a request
pub const DEFAULT_REFRESH_WINDOW: Duration = Duration::from_secs(60);

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn SessionApi>,
    clock: Arc<dyn Clock>,
    refresh_window_millis: i64,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn SessionApi>) -> Self {
        Self {
            store,
            api,
            clock: Arc::new(SystemClock),
            refresh_window_millis: window_millis(DEFAULT_REFRESH_WINDOW),
            state: watch::Sender::new(SessionState::default()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_refresh_window(mut self, window: Duration) -> Self {
        self.refresh_window_millis = window_millis(window);
        self
    }

    /// Current state snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user_email(&self) -> Option<String> {
        self.state.borrow().user_email.clone()
    }

    /// True until [`check_auth_on_load`](Self::check_auth_on_load) has run
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Persisted session fields as currently stored
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn stored_session(&self) -> Result<Session> {
        Ok(Session::load(self.store.as_ref()).await?)
    }

    /// Record a token pair obtained from the login endpoint
    ///
    /// Makes no network call. State only changes once every field is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn login(&self, email: &str, tokens: &TokenPair) -> Result<()> {
        let expiry = expiry_after(self.clock.now_millis(), tokens.bearer_token.expires_in);
        warn_if_expired(tokens.bearer_token.expires_in);

        self.store
            .set_many(&[
                (StorageKey::BearerToken, tokens.bearer_token.token.clone()),
                (StorageKey::RefreshToken, tokens.refresh_token.token.clone()),
                (StorageKey::TokenExpiry, expiry.to_string()),
                (StorageKey::UserEmail, email.to_string()),
            ])
            .await?;
        debug!(expiry, "Stored token pair");

        self.state
            .send_modify(|state| state.authenticate(Some(email.to_string())));
        info!(email, "Signed in");
        Ok(())
    }

    /// Notify the server (best effort) and clear the local session
    ///
    /// The in-memory state is always reset, even when the remote call or the
    /// local store fails.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store could not be cleared.
    pub async fn logout(&self) -> Result<()> {
        match self.store.get(StorageKey::RefreshToken).await {
            Ok(Some(refresh_token)) => {
                if let Err(e) = self.api.logout(&refresh_token).await {
                    warn!(error = %e, "Remote logout failed, clearing local session anyway");
                }
            }
            Ok(None) => debug!("No refresh token stored, skipping remote logout"),
            Err(e) => warn!(error = %e, "Could not read refresh token for remote logout"),
        }

        let cleared = self.store.remove_many(&StorageKey::ALL).await;
        self.state.send_modify(SessionState::clear);
        info!("Signed out");

        cleared.map_err(SessionError::from)
    }

    /// Exchange the stored refresh token for a new bearer token
    ///
    /// The refresh token itself is kept even if the server sends a new one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoRefreshToken`] without touching any state if
    /// nothing is stored, otherwise propagates remote and storage failures.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self
            .store
            .get(StorageKey::RefreshToken)
            .await?
            .ok_or(SessionError::NoRefreshToken)?;

        let response = self.api.refresh(&refresh_token).await?;
        let expiry = expiry_after(self.clock.now_millis(), response.bearer_token.expires_in);
        warn_if_expired(response.bearer_token.expires_in);

        self.store
            .set_many(&[
                (StorageKey::BearerToken, response.bearer_token.token),
                (StorageKey::TokenExpiry, expiry.to_string()),
            ])
            .await?;

        let email = self.store.get(StorageKey::UserEmail).await?;
        self.state.send_modify(|state| state.authenticate(email));
        info!(expiry, "Bearer token refreshed");
        Ok(())
    }

    /// Restore the session persisted by a previous run
    ///
    /// A live token is trusted without a network call. A stored token that
    /// has expired (or whose expiry cannot be read) is refreshed, and a
    /// failed refresh clears the session. Always ends with `loading = false`.
    pub async fn check_auth_on_load(&self) -> AuthStatus {
        let status = match self.restore().await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Could not read stored session");
                AuthStatus::Unauthenticated
            }
        };

        self.state.send_modify(|state| state.loading = false);
        status
    }

    async fn restore(&self) -> Result<AuthStatus> {
        let session = self.stored_session().await?;

        if session.has_live_token(self.clock.now_millis()) {
            self.state
                .send_modify(|state| state.authenticate(session.user_email));
            debug!("Restored live session");
            return Ok(AuthStatus::Authenticated);
        }

        if session.bearer_token.is_none() {
            return Ok(AuthStatus::Unauthenticated);
        }

        match self.refresh().await {
            Ok(()) => Ok(AuthStatus::Authenticated),
            Err(e) => {
                info!(error = %e, "Stored session could not be refreshed, signing out");
                if let Err(e) = self.logout().await {
                    warn!(error = %e, "Failed to clear stale session");
                }
                Ok(AuthStatus::Unauthenticated)
            }
        }
    }

    /// Refresh the bearer token if it expires within the refresh window
    ///
    /// Failures are logged and swallowed; the caller proceeds with whatever
    /// token is stored and the server decides whether it is still valid.
    pub async fn ensure_fresh_token(&self) {
        let session = match self.stored_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Could not read stored session before request");
                return;
            }
        };

        if !session.expires_within(self.clock.now_millis(), self.refresh_window_millis) {
            return;
        }

        debug!("Bearer token near expiry, refreshing before request");
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Token refresh failed, continuing with stored token");
        }
    }
}

#[async_trait]
impl BearerSource for SessionManager {
    async fn bearer_token(&self) -> Option<String> {
        self.ensure_fresh_token().await;
        self.store
            .get(StorageKey::BearerToken)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Could not read bearer token");
                None
            })
    }
}

/// The session is still recorded; the next request will try to refresh it
fn warn_if_expired(expires_in: i64) {
    if expires_in <= 0 {
        warn!(expires_in, "Server issued a bearer token that is already expired");
    }
}

fn window_millis(window: Duration) -> i64 {
    i64::try_from(window.as_millis()).unwrap_or(i64::MAX)
}
