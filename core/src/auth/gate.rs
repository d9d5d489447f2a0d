//! The authentication gate state machine.

use std::fmt;

use tracing::{info, warn};

use crate::auth::session::SessionStore;
use crate::client::CredentialVerifier;
use crate::error::{Error, Result};

/// Gate state. The token is present if and only if the state is
/// `Authenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No session; generation is blocked while auth is required.
    Unauthenticated,
    /// A verification call is in flight; further logins are rejected.
    Authenticating,
    /// A verified session token is held.
    Authenticated,
}

impl AuthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::Unauthenticated => "not authenticated",
            AuthState::Authenticating => "authenticating",
            AuthState::Authenticated => "authenticated",
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the session credential and guards access to generation.
///
/// The gate is the only writer of the token; the submission pipeline
/// reads it to attach to requests and signals expiry back through
/// [`AuthGate::invalidate`].
pub struct AuthGate {
    state: AuthState,
    token: Option<String>,
    store: Box<dyn SessionStore>,
}

impl AuthGate {
    /// Build a gate over `store`, resuming `Authenticated` when the
    /// store already holds a session token.
    pub fn new(store: Box<dyn SessionStore>) -> Result<Self> {
        let token = store.load()?;
        let state = if token.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        Ok(Self { state, token, store })
    }

    /// Gate over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self {
            state: AuthState::Unauthenticated,
            token: None,
            store: Box::new(super::MemorySessionStore::new()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// The session token, present iff authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Guarded entry into `Authenticating`. Rejects a second attempt
    /// while a verification call is already in flight.
    fn begin_login(&mut self) -> Result<()> {
        if self.state == AuthState::Authenticating {
            return Err(Error::LoginInProgress);
        }
        self.state = AuthState::Authenticating;
        Ok(())
    }

    /// Dead-session transition: `Unauthenticated`, no token in memory,
    /// nothing left in the store. A fresh gate over the same store must
    /// not resume the old session. A store failure here is logged rather
    /// than surfaced since the session is already gone.
    fn reset(&mut self) {
        self.token = None;
        self.state = AuthState::Unauthenticated;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear session store");
        }
    }

    /// Verify `password` and establish a session.
    ///
    /// Exactly one verification call is issued. On success the token is
    /// persisted and the gate moves to `Authenticated`; on any failure
    /// the gate reverts to `Unauthenticated` with no token kept in
    /// memory or in the store.
    pub async fn login(&mut self, verifier: &dyn CredentialVerifier, password: &str) -> Result<()> {
        self.begin_login()?;
        info!("verifying credential");

        match verifier.verify(password).await {
            Ok(token) => {
                if let Err(e) = self.store.save(&token) {
                    self.reset();
                    return Err(e);
                }
                self.token = Some(token);
                self.state = AuthState::Authenticated;
                info!("session established");
                Ok(())
            }
            Err(e) => {
                self.reset();
                warn!(error = %e, "credential verification failed");
                Err(e)
            }
        }
    }

    /// Drop the session explicitly.
    pub fn logout(&mut self) -> Result<()> {
        self.token = None;
        self.state = AuthState::Unauthenticated;
        info!("logged out");
        self.store.clear()
    }

    /// Session-expired signal from the submission pipeline. Clears the
    /// token and reverts to `Unauthenticated`.
    pub fn invalidate(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("state", &self.state)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}
