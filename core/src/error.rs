//! Error taxonomy for the client core.
//!
//! Every failure is handled at the submission-pipeline or auth-gate
//! boundary and rendered as a user-visible message; nothing here is
//! retried automatically.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Selected template name is absent from the registry.
    #[error("unknown template: {name}")]
    UnknownTemplate { name: String },

    /// Scope-item mutation addressed a slot past the append position.
    #[error("scope item index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The service rejected the submitted credential.
    #[error("credential rejected: {reason}")]
    InvalidCredential { reason: String },

    /// Generation was refused because the session token is stale or
    /// absent. Forces the auth gate back to `Unauthenticated`.
    #[error("authorization expired; log in again")]
    AuthorizationExpired,

    /// Any other generation failure, transport errors on the generation
    /// call included.
    #[error("generation failed: {message}")]
    GenerationFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A credential verification call is already in flight.
    #[error("a login attempt is already in progress")]
    LoginInProgress,

    /// Transport failure outside the generation call.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn unknown_template(name: impl Into<String>) -> Self {
        Error::UnknownTemplate { name: name.into() }
    }

    pub fn invalid_credential(reason: impl Into<String>) -> Self {
        Error::InvalidCredential {
            reason: reason.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Error::GenerationFailure {
            message: message.into(),
            source: None,
        }
    }

    pub fn generation_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::GenerationFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// True when the failure must revert the auth gate.
    pub fn is_authorization_expired(&self) -> bool {
        matches!(self, Error::AuthorizationExpired)
    }
}
