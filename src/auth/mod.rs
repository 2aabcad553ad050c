//! Session and credential management.
//!
//! Owns the fixed account table, bcrypt credential verification, session
//! token issuance and storage, and the access gate protecting the rest of
//! the application.

pub mod handlers;
mod middleware;
mod service;
mod session;
mod throttle;

pub use middleware::{session_token, CurrentUser, SESSION_COOKIE};
pub use service::{check_password, hash_password, Account, AuthService, Role};
pub use session::SessionStore;
pub use throttle::{LoginThrottle, ThrottleConfig};
