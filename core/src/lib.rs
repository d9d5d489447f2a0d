//! Client core for the bidforge document-generation service.
//!
//! Collects project, owner, and engineer metadata through a
//! template-driven form model and submits it to the generation service,
//! which renders the matching document and returns the bytes. The pieces
//! compose leaf-first: the constant [`TemplateRegistry`] and
//! [`DirectoryTable`], the [`taxonomy`] that groups field identifiers
//! into display sections, the mutable [`FormState`], the [`AuthGate`]
//! state machine owning the session token, and the submission pipeline
//! in [`submit`] tying them together.

pub mod auth;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod form;
pub mod submit;
pub mod taxonomy;
pub mod templates;
pub mod timefmt;

pub use auth::AuthGate;
pub use auth::AuthState;
pub use auth::EphemeralSessionStore;
pub use auth::MemorySessionStore;
pub use auth::SessionStore;
pub use client::CredentialVerifier;
pub use client::ServiceClient;
pub use config::Config;
pub use config::find_bidforge_home;
pub use config::load_config;
pub use directory::DirectoryEntry;
pub use directory::DirectoryTable;
pub use error::Error;
pub use error::Result;
pub use form::FormState;
pub use submit::GeneratedDocument;
pub use submit::build_payload;
pub use submit::save_artifact;
pub use submit::submit;
pub use taxonomy::FieldCategory;
pub use taxonomy::FieldGroup;
pub use templates::TemplateDefinition;
pub use templates::TemplateRegistry;
