//! Authentication module
//!
//! `SessionStore` is the single writer of the persisted token and owns the
//! session phase. `AuthContext` wraps it in a signal and is shared through
//! Leptos context; the router only sees the derived phase signal.

use genesis_shared::STORAGE_TOKEN_KEY;
use genesis_shared::token::is_expired;
use leptos::prelude::*;

use crate::api::{GenesisApi, SessionHandle};
use crate::error::ApiError;
use crate::web::{BrowserStorage, KeyValueStore};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Uninitialized,
    /// Reading the persisted token and checking its expiry
    Resolving,
    Authenticated,
    Anonymous,
}

/// Session state machine over a persistent key/value store.
#[derive(Debug)]
pub struct SessionStore<S> {
    /// Where the token survives reloads
    storage: S,
    /// Bearer token of the current session
    token: Option<String>,
    phase: AuthPhase,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            token: None,
            phase: AuthPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn begin_resolve(&mut self) {
        self.phase = AuthPhase::Resolving;
    }

    /// Restores the persisted session; expired tokens are removed.
    ///
    /// # Arguments
    /// * `now_secs` - current time in seconds since the epoch, compared with `exp`
    pub fn resolve(&mut self, now_secs: i64) -> AuthPhase {
        self.begin_resolve();

        match self.storage.get(STORAGE_TOKEN_KEY) {
            Some(saved) if !saved.is_empty() && !is_expired(&saved, now_secs) => {
                self.token = Some(saved);
                self.phase = AuthPhase::Authenticated;
            }
            saved => {
                if saved.is_some() {
                    tracing::info!("persisted token expired, discarding");
                }
                self.clear();
            }
        }

        tracing::info!(phase = ?self.phase, "session resolved");
        self.phase
    }

    pub fn login(&mut self, token: String) {
        if !self.storage.set(STORAGE_TOKEN_KEY, &token) {
            tracing::warn!("could not persist token, session will not survive a reload");
        }
        self.token = Some(token);
        self.phase = AuthPhase::Authenticated;
        tracing::info!("logged in");
    }

    pub fn logout(&mut self) {
        self.clear();
        tracing::info!("logged out");
    }

    /// Handles a server-reported 401 for a request sent with `token_used`.
    ///
    /// Returns `true` if the session was cleared. A 401 for a token that is
    /// no longer current, for a request that carried no token, or arriving
    /// while already anonymous, is ignored.
    pub fn invalidate(&mut self, token_used: Option<&str>) -> bool {
        if self.phase != AuthPhase::Authenticated {
            return false;
        }
        // a request sent without the current token predates this session
        if token_used.is_none() || self.token.as_deref() != token_used {
            tracing::debug!("ignoring 401 for a superseded token");
            return false;
        }
        self.clear();
        tracing::warn!("session invalidated by server");
        true
    }

    fn clear(&mut self) {
        self.storage.delete(STORAGE_TOKEN_KEY);
        self.token = None;
        self.phase = AuthPhase::Anonymous;
    }
}

// =========================================================
// Reactive context
// =========================================================

/// Session context
///
/// Shared through Leptos context; also handed to `GenesisApi` as its
/// `SessionHandle`.
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// Session store (single writer of the token)
    state: RwSignal<SessionStore<BrowserStorage>>,
    /// Phase derived from `state`, fed to the router
    phase: Memo<AuthPhase>,
}

impl AuthContext {
    pub fn new() -> Self {
        let state = RwSignal::new(SessionStore::new(BrowserStorage));
        // memo: only real phase transitions reach the router
        let phase = Memo::new(move |_| state.with(|s| s.phase()));
        Self { state, phase }
    }

    pub fn phase_signal(&self) -> Signal<AuthPhase> {
        self.phase.into()
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle for AuthContext {
    fn token(&self) -> Option<String> {
        self.state
            .try_with_untracked(|s| s.token().map(str::to_string))
            .flatten()
    }

    fn on_unauthorized(&self, token_used: Option<&str>) {
        let token_used = token_used.map(str::to_string);
        self.state
            .try_update(|s| s.invalidate(token_used.as_deref()));
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// Resolves the persisted session once at startup.
pub fn init_auth(ctx: &AuthContext) {
    let now = chrono::Utc::now().timestamp();
    ctx.state.update(|s| {
        s.resolve(now);
    });
}

/// Exchanges credentials for a token and opens the session.
///
/// Navigation away from the login page is done by the router's auth
/// redirect once the phase changes.
///
/// # Arguments
/// * `ctx` - session context
/// * `api` - client used for `POST /Auth/login`
/// * `email` - sent as `username`
/// * `password` - plain password
///
/// # Returns
/// The login error, unchanged, when the server refuses the credentials
pub async fn login(
    ctx: &AuthContext,
    api: &GenesisApi,
    email: String,
    password: String,
) -> Result<(), ApiError> {
    let token = api.login(email, password).await?;
    ctx.state.update(|s| s.login(token));
    Ok(())
}

/// Ends the session; the router redirects to login on the phase change.
pub fn logout(ctx: &AuthContext) {
    ctx.state.update(|s| s.logout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn jwt_with_exp(exp: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        format!("e30.{payload}.sig")
    }

    #[test]
    fn starts_uninitialized_and_resolves_to_anonymous_without_token() {
        let mut store = SessionStore::new(MemoryStorage::default());
        assert_eq!(store.phase(), AuthPhase::Uninitialized);
        store.begin_resolve();
        assert_eq!(store.phase(), AuthPhase::Resolving);
        assert_eq!(store.resolve(100), AuthPhase::Anonymous);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn valid_persisted_token_is_restored() {
        let token = jwt_with_exp(2_000);
        let storage = MemoryStorage::with(STORAGE_TOKEN_KEY, &token);
        let mut store = SessionStore::new(storage.clone());

        assert_eq!(store.resolve(1_000), AuthPhase::Authenticated);
        assert_eq!(store.token(), Some(token.as_str()));
        assert_eq!(storage.get(STORAGE_TOKEN_KEY), Some(token));
    }

    #[test]
    fn expired_token_is_cleared_from_storage() {
        let storage = MemoryStorage::with(STORAGE_TOKEN_KEY, &jwt_with_exp(10));
        let mut store = SessionStore::new(storage.clone());

        assert_eq!(store.resolve(1_000), AuthPhase::Anonymous);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY), None);
    }

    #[test]
    fn login_and_logout_persist_and_clear() {
        let storage = MemoryStorage::default();
        let mut store = SessionStore::new(storage.clone());
        store.resolve(0);

        store.login("opaque-token".to_string());
        assert_eq!(store.phase(), AuthPhase::Authenticated);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("opaque-token"));

        store.logout();
        assert_eq!(store.phase(), AuthPhase::Anonymous);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY), None);
    }

    #[test]
    fn unauthorized_clears_once_and_repeats_are_no_ops() {
        let storage = MemoryStorage::default();
        let mut store = SessionStore::new(storage.clone());
        store.login("t1".to_string());

        assert!(store.invalidate(Some("t1")));
        assert_eq!(store.phase(), AuthPhase::Anonymous);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY), None);

        assert!(!store.invalidate(Some("t1")));
        assert!(!store.invalidate(None));
    }

    #[test]
    fn stale_unauthorized_does_not_undo_a_newer_login() {
        let mut store = SessionStore::new(MemoryStorage::default());
        store.login("old".to_string());
        store.login("new".to_string());

        assert!(!store.invalidate(Some("old")));
        assert_eq!(store.phase(), AuthPhase::Authenticated);
        assert_eq!(store.token(), Some("new"));
    }

    #[test]
    fn unauthorized_without_a_token_keeps_the_session() {
        let storage = MemoryStorage::default();
        let mut store = SessionStore::new(storage.clone());
        store.resolve(0);
        store.login("new".to_string());

        assert!(!store.invalidate(None));
        assert_eq!(store.phase(), AuthPhase::Authenticated);
        assert_eq!(store.token(), Some("new"));
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("new"));
    }
}
