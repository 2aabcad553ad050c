pub mod auth;
pub mod config;
pub mod error;
pub mod flightaware;
pub mod flights;
pub mod web;

use std::sync::Arc;
use actix_web::HttpResponse;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, CurrentUser, LoginThrottle, SessionStore, ThrottleConfig};
pub use flightaware::FlightAwareClient;
pub use flights::FlightBoard;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth: Arc<AuthService>,
    pub sessions: Arc<SessionStore>,
    pub throttle: Arc<LoginThrottle>,
    pub board: Arc<FlightBoard>,
    pub flight_api: Arc<FlightAwareClient>,
}

impl AppState {
    /// Build all shared components. Account secrets are hashed here, once;
    /// an empty secret fails startup with a configuration error.
    pub fn new(config: Settings) -> Result<Self> {
        let auth = AuthService::from_config(&config.auth)?;
        let throttle = LoginThrottle::new(ThrottleConfig::from(&config.auth));
        let flight_api = FlightAwareClient::new(&config.flightaware);

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            sessions: Arc::new(SessionStore::new()),
            throttle: Arc::new(throttle),
            board: Arc::new(FlightBoard::new()),
            flight_api: Arc::new(flight_api),
        })
    }
}
