//! In-memory flight list with shuttle coordination details.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::America::Denver;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Whether the shuttle is picking crew up, dropping them off, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripKind {
    Pickup,
    Dropoff,
    Both,
}

impl TripKind {
    pub fn from_flags(is_pickup: bool, is_dropoff: bool) -> Self {
        match (is_pickup, is_dropoff) {
            (true, true) => TripKind::Both,
            (false, true) => TripKind::Dropoff,
            // Pickup is the default when neither box is checked
            _ => TripKind::Pickup,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripKind::Pickup => "pickup",
            TripKind::Dropoff => "dropoff",
            TripKind::Both => "both",
        }
    }
}

impl fmt::Display for TripKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked flight. Arrival strings are pre-formatted for display in
/// Mountain Time; `sort_time` keeps the board chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: u32,
    pub flight_number: String,
    pub airline: String,
    pub status: String,
    pub scheduled_arrival: String,
    pub expected_arrival: String,
    pub delay_minutes: i64,
    pub is_delayed: bool,
    pub kind: TripKind,
    pub crew_count: u32,
    pub note: String,
    pub sort_time: DateTime<Utc>,
}

/// Display formatting for arrival times: Mountain Time, `3:04 PM` style.
pub fn mountain_display_time(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Denver).format("%-I:%M %p").to_string()
}

struct BoardInner {
    flights: Vec<Flight>,
    next_id: u32,
}

/// The shared flight list. Constructor-built and held in `AppState`.
pub struct FlightBoard {
    inner: RwLock<BoardInner>,
}

impl Default for FlightBoard {
    fn default() -> Self {
        Self {
            inner: RwLock::new(BoardInner {
                flights: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl FlightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flight, assigning it the next id. Returns the stored flight.
    pub async fn add(&self, mut flight: Flight) -> Flight {
        let mut inner = self.inner.write().await;
        flight.id = inner.next_id;
        inner.next_id += 1;
        inner.flights.push(flight.clone());
        flight
    }

    /// Synthesize and add a plausible flight for demo accounts, without
    /// touching the real flight API. Deterministic in the id counter.
    pub async fn add_demo(&self, flight_number: &str, kind: TripKind, crew_count: u32) -> Flight {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let flight = synthesize_demo_flight(id, flight_number, kind, crew_count);
        inner.flights.push(flight.clone());
        flight
    }

    /// Remove by id. No-op when the id is unknown.
    pub async fn remove(&self, id: u32) {
        let mut inner = self.inner.write().await;
        inner.flights.retain(|f| f.id != id);
    }

    /// Replace the note on a flight. No-op when the id is unknown.
    pub async fn update_note(&self, id: u32, note: &str) {
        let mut inner = self.inner.write().await;
        if let Some(flight) = inner.flights.iter_mut().find(|f| f.id == id) {
            flight.note = note.to_string();
        }
    }

    /// The current flights, sorted chronologically by expected arrival.
    pub async fn snapshot(&self) -> Vec<Flight> {
        let inner = self.inner.read().await;
        let mut flights = inner.flights.clone();
        flights.sort_by_key(|f| f.sort_time);
        flights
    }
}

const DEMO_AIRLINES: [&str; 4] = [
    "American Airlines",
    "Delta Air Lines",
    "United Airlines",
    "Southwest Airlines",
];
const DEMO_STATUSES: [&str; 2] = ["scheduled", "active"];

fn synthesize_demo_flight(seed: u32, flight_number: &str, kind: TripKind, crew_count: u32) -> Flight {
    let arrival = Utc::now() + Duration::hours(2 + (seed % 3) as i64);

    let (delay_minutes, is_delayed) = if seed % 3 == 0 {
        (15 + (seed % 30) as i64, true)
    } else {
        (0, false)
    };

    let expected = arrival + Duration::minutes(delay_minutes);

    Flight {
        id: seed,
        flight_number: flight_number.to_string(),
        airline: DEMO_AIRLINES[seed as usize % DEMO_AIRLINES.len()].to_string(),
        status: DEMO_STATUSES[seed as usize % DEMO_STATUSES.len()].to_string(),
        scheduled_arrival: mountain_display_time(arrival),
        expected_arrival: mountain_display_time(expected),
        delay_minutes,
        is_delayed,
        kind,
        crew_count,
        note: String::new(),
        sort_time: expected,
    }
}
