use actix_web::{web, HttpResponse};
use actix_web::http::header;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::flights::TripKind;
use crate::AppState;
use super::pages;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// `GET /` — the flight board, sorted chronologically.
pub async fn home(user: CurrentUser, state: web::Data<AppState>) -> HttpResponse {
    let flights = state.board.snapshot().await;
    html(pages::board_page(&flights, None, user.is_demo()))
}

#[derive(Debug, Deserialize)]
pub struct AddFlightForm {
    #[serde(default)]
    pub flight_number: String,
    // Checkboxes submit "on" when checked and are absent otherwise
    #[serde(default)]
    pub is_pickup: Option<String>,
    #[serde(default)]
    pub is_dropoff: Option<String>,
    #[serde(default)]
    pub crew_count: String,
}

/// `POST /add` — demo accounts get a synthesized flight; everyone else goes
/// through the live flight API. API failures re-render the board with the
/// error inline instead of a hard error page.
pub async fn add_flight(
    user: CurrentUser,
    form: web::Form<AddFlightForm>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let flight_number = form.flight_number.trim();
    if flight_number.is_empty() {
        let flights = state.board.snapshot().await;
        return html(pages::board_page(
            &flights,
            Some("Flight number is required"),
            user.is_demo(),
        ));
    }

    let kind = TripKind::from_flags(
        form.is_pickup.as_deref() == Some("on"),
        form.is_dropoff.as_deref() == Some("on"),
    );
    let crew_count = form.crew_count.trim().parse().unwrap_or(0);

    if user.is_demo() {
        let flight = state.board.add_demo(flight_number, kind, crew_count).await;
        info!("Demo flight added: {} (id {})", flight.flight_number, flight.id);
        return redirect_home();
    }

    match state
        .flight_api
        .flight_status(flight_number, kind, crew_count)
        .await
    {
        Ok(flight) => {
            let flight = state.board.add(flight).await;
            info!("Flight added: {} (id {})", flight.flight_number, flight.id);
            redirect_home()
        }
        Err(e) => {
            warn!("Flight lookup failed for {}: {}", flight_number, e);
            let flights = state.board.snapshot().await;
            let message = format!("{} (Note: Free API tier may not include all flights)", e);
            html(pages::board_page(&flights, Some(&message), user.is_demo()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveFlightForm {
    #[serde(default)]
    pub id: String,
}

/// `POST /remove` — drop a flight from the board.
pub async fn remove_flight(
    _user: CurrentUser,
    form: web::Form<RemoveFlightForm>,
    state: web::Data<AppState>,
) -> HttpResponse {
    if let Ok(id) = form.id.trim().parse() {
        state.board.remove(id).await;
    }
    redirect_home()
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub note: String,
}

/// `POST /update-note` — replace a flight's note. Returns 200 with no body
/// so the form can post in place.
pub async fn update_note(
    _user: CurrentUser,
    form: web::Form<UpdateNoteForm>,
    state: web::Data<AppState>,
) -> HttpResponse {
    if let Ok(id) = form.id.trim().parse() {
        state.board.update_note(id, &form.note).await;
    }
    HttpResponse::Ok().finish()
}
