//! Client session store
//!
//! Mirrors the server-side session: who is logged in, with which token,
//! and whether a request is in flight. Only the token is persisted; the
//! rest is rebuilt by `check_auth` on startup.
//!
//! Transitions take `&mut self`, so a store runs one of
//! `login`/`logout`/`check_auth` at a time. Each runs to completion and
//! leaves the state settled (`is_loading == false`). While one is running,
//! the state is still observable through [`SessionStore::subscribe`].

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::storage::TokenStorage;
use college_admin_shared::User;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Shown when a login fails without a server-provided message
pub const LOGIN_FALLBACK_MESSAGE: &str = "Failed to login. Please try again.";

/// Snapshot of the client's view of its session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Session state holder backed by an API client and token storage
pub struct SessionStore<S: TokenStorage> {
    api: ApiClient,
    storage: S,
    state: watch::Sender<SessionState>,
}

impl<S: TokenStorage> SessionStore<S> {
    /// Start a store from whatever token is persisted
    ///
    /// The store begins in the loading state until `check_auth` settles it.
    pub fn new(api: ApiClient, storage: S) -> Self {
        let token = load_token(&storage);
        let (state, _) = watch::channel(SessionState {
            token,
            is_loading: true,
            ..SessionState::default()
        });

        Self {
            api,
            storage,
            state,
        }
    }

    /// Watch state changes, including the loading phase of a transition
    /// that holds the store
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Log in and persist the issued token
    ///
    /// On failure the session is cleared and `error` holds a message fit
    /// for display.
    pub async fn login(&mut self, email: &str, password: &str) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        match self.api.login(email, password).await {
            Ok(response) => {
                if let Err(e) = self.storage.save(&response.token) {
                    warn!(error = %e, "Failed to persist session token");
                }
                self.state.send_replace(SessionState {
                    user: Some(response.user),
                    token: Some(response.token),
                    is_authenticated: true,
                    is_loading: false,
                    error: None,
                });
            }
            Err(e) => {
                debug!(error = %e, "Login failed");
                self.state.send_replace(SessionState {
                    error: Some(login_error_message(&e)),
                    ..SessionState::default()
                });
            }
        }
    }

    /// Log out locally, telling the server on a best-effort basis
    pub async fn logout(&mut self) {
        let token = self.state.borrow().token.clone();
        if let Err(e) = self.api.logout(token.as_deref()).await {
            debug!(error = %e, "Ignoring logout failure");
        }

        self.forget_token();
        self.state.send_replace(SessionState::default());
    }

    /// Re-validate the persisted token
    ///
    /// Any failure silently drops the token and leaves the store
    /// unauthenticated without an error message.
    pub async fn check_auth(&mut self) {
        let Some(token) = load_token(&self.storage) else {
            self.state.send_modify(|state| {
                state.is_loading = false;
                state.is_authenticated = false;
            });
            return;
        };

        self.state.send_modify(|state| state.is_loading = true);

        match self.api.current_user(&token).await {
            Ok(user) => {
                self.state.send_replace(SessionState {
                    user: Some(user),
                    token: Some(token),
                    is_authenticated: true,
                    is_loading: false,
                    error: None,
                });
            }
            Err(e) => {
                debug!(error = %e, "Persisted session is no longer valid");
                self.forget_token();
                self.state.send_replace(SessionState::default());
            }
        }
    }

    /// Drop a stale error message
    pub fn clear_error(&mut self) {
        self.state.send_modify(|state| state.error = None);
    }

    fn forget_token(&self) {
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear persisted session token");
        }
    }
}

fn load_token<S: TokenStorage>(storage: &S) -> Option<String> {
    match storage.load() {
        Ok(token) => token.filter(|t| !t.is_empty()),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted session token");
            None
        }
    }
}

fn login_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
        _ => LOGIN_FALLBACK_MESSAGE.to_string(),
    }
}
