use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::error::{AppError, AuthError};
use crate::AppState;
use super::Role;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_id";

/// The account behind a live session, extracted from the request cookie.
///
/// Handlers taking `CurrentUser` never run without one: a missing cookie or
/// an unknown token rejects the request with a redirect to `/login`. Role
/// restrictions (demo behavior) stay with the handlers themselves.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_demo(&self) -> bool {
        self.role == Role::Demo
    }
}

/// Pull the raw session token off a request, if any.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    req.cookie(SESSION_COOKIE).map(|c| c.value().to_string())
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::InternalError("application state missing".to_string()))?;

            let cookie = req.cookie(SESSION_COOKIE).ok_or(AuthError::SessionRequired)?;

            let username = state
                .sessions
                .lookup(cookie.value())
                .await
                .ok_or(AuthError::SessionRequired)?;

            // The account table is fixed at startup; a session for a
            // username it doesn't contain is as good as no session.
            let account = state.auth.account(&username).ok_or_else(|| {
                debug!("Session resolved to unknown account '{}'", username);
                AuthError::SessionRequired
            })?;

            Ok(CurrentUser {
                username: account.username.clone(),
                role: account.role,
            })
        })
    }
}
