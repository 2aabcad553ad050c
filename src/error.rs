use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode, http::header};
use serde_json::json;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Flight API error: {0}")]
    FlightApiError(#[from] FlightApiError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// Add conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Implement actix_web::ResponseError for AppError
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // A missing/stale session is never a hard error for a browser:
        // it bounces straight back to the login form.
        if matches!(self, AppError::AuthError(AuthError::SessionRequired)) {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish();
        }

        let status = self.status_code();
        let message = self.to_string();
        let response = json!({
            "error": {
                "status": status.as_u16(),
                "message": message
            }
        });
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::SessionRequired => StatusCode::SEE_OTHER,
                AuthError::Throttled => StatusCode::TOO_MANY_REQUESTS,
                AuthError::TokenGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::FlightApiError(FlightApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::FlightApiError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password. One message for both causes.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No session cookie, or the token resolves to nothing.
    #[error("Login required")]
    SessionRequired,

    #[error("Too many failed login attempts, try again later")]
    Throttled,

    /// OS RNG failure or a token collision in the store. Fails the request,
    /// not the process.
    #[error("Session token generation failed: {0}")]
    TokenGeneration(String),
}

#[derive(Error, Debug)]
pub enum FlightApiError {
    #[error("Failed to reach flight API: {0}")]
    RequestFailed(String),

    #[error("Flight {0} not found")]
    NotFound(String),

    #[error("Failed to parse flight API response: {0}")]
    InvalidResponse(String),

    #[error("Flight {0} has no arrival time data available")]
    NoArrivalData(String),
}

impl From<reqwest::Error> for FlightApiError {
    fn from(err: reqwest::Error) -> Self {
        FlightApiError::RequestFailed(err.to_string())
    }
}
