use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use shuttle_tracker::auth::handlers::{login, login_form, logout};
use shuttle_tracker::web::handlers::{add_flight, home, remove_flight, update_note};
use shuttle_tracker::{health_check, AppError, AppState, Settings};
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> shuttle_tracker::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    // Initialize application state; hashes the account secrets once and
    // fails fast when any of them is missing
    let state = AppState::new(config.clone())?;
    let state = web::Data::new(state);

    // Periodically drop stale login-throttle windows
    let throttle_state = state.clone();
    tokio::spawn(async move {
        loop {
            throttle_state.throttle.cleanup().await;
            tokio::time::sleep(std::time::Duration::from_secs(300)).await;
        }
    });

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    info!(
        "Shuttle tracker listening on http://{}:{}",
        config.server.host, config.server.port
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .route("/login", web::get().to(login_form))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/", web::get().to(home))
            .route("/add", web::post().to(add_flight))
            .route("/remove", web::post().to(remove_flight))
            .route("/update-note", web::post().to(update_note))
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(())
}
