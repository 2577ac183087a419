//! Session Context
//!
//! Who is signed in, and the gateway that acts on their behalf. The
//! session is created once at startup and passed to the router and to
//! every data call; nothing reads auth state from a global.
//!
//! Tokens live in a [`TokenStore`]: a JSON file for the CLI, browser
//! local storage for the web UI, memory for tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::gateway::{AuthTokens, AuthUser, Gateway, GatewayError, SignUpOutcome};
use crate::router::AuthContext;

/// Key the stored tokens are kept under
pub const TOKEN_KEY: &str = "shopdesk_session";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token store unavailable: {0}")]
    Store(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

// ============================================
// Token storage
// ============================================

pub trait TokenStore {
    fn load(&self) -> SessionResult<Option<AuthTokens>>;
    fn save(&self, tokens: &AuthTokens) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Tokens in a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.local/share/shopdesk/session.json` (platform data dir)
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("shopdesk").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> SessionResult<Option<AuthTokens>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, tokens: &AuthTokens) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(tokens)?)?;
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<AuthTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }

    fn slot(&self) -> SessionResult<std::sync::MutexGuard<'_, Option<AuthTokens>>> {
        self.tokens
            .lock()
            .map_err(|_| SessionError::Store("token lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> SessionResult<Option<AuthTokens>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, tokens: &AuthTokens) -> SessionResult<()> {
        *self.slot()? = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

// ============================================
// Session
// ============================================

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated { user: AuthUser, token: String },
}

pub struct Session<S: TokenStore> {
    anonymous: Gateway,
    gateway: Gateway,
    store: S,
    state: AuthState,
}

impl<S: TokenStore> Session<S> {
    /// An unauthenticated session; call [`Session::init`] to pick up a
    /// stored sign-in
    pub fn new(gateway: Gateway, store: S) -> Self {
        Self {
            anonymous: gateway.clone(),
            gateway,
            store,
            state: AuthState::Unauthenticated,
        }
    }

    /// A session already known to be signed in, for hosts that keep the
    /// auth state themselves between calls
    pub fn restored(gateway: Gateway, store: S, user: AuthUser, token: String) -> Self {
        let mut session = Self::new(gateway, store);
        session.set_authenticated(user, token);
        session
    }

    /// Restore the stored sign-in. A token the auth service rejects is
    /// discarded; any other failure leaves the stored sign-in in place.
    pub async fn init(&mut self) -> SessionResult<&AuthState> {
        let Some(tokens) = self.store.load()? else {
            return Ok(&self.state);
        };

        let validated = self.anonymous.auth().current_user(&tokens.access_token).await;
        match validated {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.set_authenticated(user, tokens.access_token);
            }
            Err(e) if e.is_auth_rejection() => {
                tracing::info!(error = %e, "Stored session rejected");
                self.store.clear()?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Auth service failed, trusting stored session");
                self.set_authenticated(tokens.user, tokens.access_token);
            }
        }
        Ok(&self.state)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> SessionResult<&AuthUser> {
        let tokens = self.anonymous.auth().sign_in(email, password).await?;
        self.store.save(&tokens)?;
        self.set_authenticated(tokens.user, tokens.access_token);
        self.user().ok_or_else(|| SessionError::Store("session not established".to_string()))
    }

    /// Register; signs in right away when the backend returns a session
    pub async fn sign_up(&mut self, email: &str, password: &str) -> SessionResult<SignUpOutcome> {
        let outcome = self.anonymous.auth().sign_up(email, password).await?;
        if let SignUpOutcome::SignedIn(tokens) = &outcome {
            self.store.save(tokens)?;
            self.set_authenticated(tokens.user.clone(), tokens.access_token.clone());
        }
        Ok(outcome)
    }

    /// Revoke the token (best effort) and forget everything about the user
    pub async fn sign_out(&mut self) -> SessionResult<()> {
        if let AuthState::Authenticated { token, .. } = &self.state {
            if let Err(e) = self.anonymous.auth().sign_out(token).await {
                tracing::warn!(error = %e, "Sign-out request failed");
            }
        }

        self.store.clear()?;
        self.state = AuthState::Unauthenticated;
        self.gateway = self.anonymous.clone();
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match &self.state {
            AuthState::Authenticated { user, .. } => Some(user),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { token, .. } => Some(token),
            AuthState::Unauthenticated => None,
        }
    }

    /// Gateway authorized as the current user (anonymous when signed out)
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn set_authenticated(&mut self, user: AuthUser, token: String) {
        self.gateway = self.anonymous.authorized(Some(token.clone()));
        self.state = AuthState::Authenticated { user, token };
    }
}

impl<S: TokenStore> AuthContext for Session<S> {
    fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }
}
