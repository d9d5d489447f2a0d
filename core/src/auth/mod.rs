//! Authentication gate and the session stores behind it.
//!
//! The gate is a three-state machine (`Unauthenticated → Authenticating
//! → Authenticated`) and the sole owner of the session token. The token
//! lives behind a swappable [`SessionStore`]: in-memory for tests and
//! embedders, an ephemeral runtime-dir file for the CLI so separate
//! invocations share one session. Nothing outlives the OS login
//! session; the runtime directory is wiped when it ends.

mod gate;
mod session;

pub use gate::{AuthGate, AuthState};
pub use session::{EphemeralSessionStore, MemorySessionStore, SessionStore};
