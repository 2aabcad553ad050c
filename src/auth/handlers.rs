use actix_web::{web, HttpRequest, HttpResponse};
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::http::header;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AuthError};
use crate::web::pages;
use crate::AppState;
use super::middleware::{session_token, CurrentUser, SESSION_COOKIE};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Session cookie for a fresh login: whole-site, week-long, unreadable from
/// script, and only sent on same-site navigations.
fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .max_age(CookieDuration::seconds(max_age_secs))
        .http_only(true)
        .same_site(SameSite::Strict)
        .finish()
}

/// Overwrites the client's session cookie with an immediately-expiring
/// empty value.
fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(CookieDuration::seconds(-1))
        .http_only(true)
        .finish()
}

fn login_page_with(error: Option<&str>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::login_page(error))
}

/// `GET /login` — render the form, or short-circuit home when a valid
/// session is already present.
pub async fn login_form(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(token) = session_token(&req) {
        if state.sessions.lookup(&token).await.is_some() {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .finish();
        }
    }

    login_page_with(None)
}

/// `POST /login` — verify the submitted credentials and issue a session.
/// Both failure causes surface as one generic message.
pub async fn login(
    form: web::Form<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Login attempt for username: {}", form.username);

    if !state.throttle.check(&form.username).await {
        warn!("Login throttled for username: {}", form.username);
        return Ok(login_page_with(Some(
            &AuthError::Throttled.to_string(),
        )));
    }

    match state.auth.verify(&form.username, &form.password) {
        Some(account) => {
            state.throttle.record_success(&account.username).await;
            let token = state.sessions.create(&account.username).await?;
            info!(
                "Login successful for username: {} (role: {})",
                account.username, account.role
            );

            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/"))
                .cookie(session_cookie(
                    token,
                    state.config.auth.cookie_max_age_secs,
                ))
                .finish())
        }
        None => {
            state.throttle.record_failure(&form.username).await;
            info!("Login failed for username: {}", form.username);
            Ok(login_page_with(Some(
                &AuthError::InvalidCredentials.to_string(),
            )))
        }
    }
}

/// `POST /logout` — destroy the presented session and clear the cookie.
pub async fn logout(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> HttpResponse {
    if let Some(token) = session_token(&req) {
        state.sessions.destroy(&token).await;
    }
    info!("Logged out username: {}", user.username);

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .cookie(removal_cookie())
        .finish()
}
