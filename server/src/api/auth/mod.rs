//! Authentication module

pub mod middleware;

pub use middleware::{AuthError, AuthState, ProjectContext, require_auth};
