//! FlightAware AeroAPI client for live arrival data.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::FlightAwareConfig;
use crate::error::FlightApiError;
use crate::flights::{mountain_display_time, Flight, TripKind};

pub struct FlightAwareClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    flights: Vec<FlightRecord>,
}

#[derive(Debug, Deserialize)]
struct FlightRecord {
    ident: String,
    #[serde(default)]
    operator_iata: Option<String>,
    #[serde(default)]
    operator: Option<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    scheduled_in: Option<String>,
    #[serde(default)]
    estimated_in: Option<String>,
    #[serde(default)]
    actual_in: Option<String>,
}

impl FlightRecord {
    /// Most accurate arrival available: actual, then estimated, then
    /// scheduled.
    fn best_arrival(&self) -> Option<&str> {
        [&self.actual_in, &self.estimated_in, &self.scheduled_in]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|s| !s.is_empty())
    }

    /// Prefer the full airline name over the IATA code.
    fn airline(&self) -> String {
        self.operator
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.operator_iata.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, FlightApiError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| FlightApiError::InvalidResponse(format!("bad arrival time '{}': {}", s, e)))
}

impl FlightAwareClient {
    pub fn new(config: &FlightAwareConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Fetch the arrival status for one flight and shape it into a board
    /// entry (id left for the board to assign).
    pub async fn flight_status(
        &self,
        flight_number: &str,
        kind: TripKind,
        crew_count: u32,
    ) -> Result<Flight, FlightApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FlightApiError::RequestFailed(format!("bad base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FlightApiError::RequestFailed("bad base url".to_string()))?
            .push("flights")
            .push(flight_number);

        debug!("Fetching flight status: {}", url);

        let response = self
            .http
            .get(url)
            // AeroAPI authenticates with an x-apikey header
            .header("x-apikey", &self.api_key)
            .send()
            .await?;

        let body: FlightsResponse = response
            .json()
            .await
            .map_err(|e| FlightApiError::InvalidResponse(e.to_string()))?;

        let record = body
            .flights
            .into_iter()
            .next()
            .ok_or_else(|| FlightApiError::NotFound(flight_number.to_string()))?;

        let arrival_str = record
            .best_arrival()
            .ok_or_else(|| FlightApiError::NoArrivalData(flight_number.to_string()))?;
        let arrival = parse_rfc3339(arrival_str)?;

        // Delay is the gap between scheduled and estimated arrival, when
        // both are reported.
        let delay_minutes = match (record.scheduled_in.as_deref(), record.estimated_in.as_deref()) {
            (Some(scheduled), Some(estimated)) if !scheduled.is_empty() && !estimated.is_empty() => {
                (parse_rfc3339(estimated)? - parse_rfc3339(scheduled)?).num_minutes()
            }
            _ => 0,
        };

        Ok(Flight {
            id: 0,
            flight_number: record.ident.clone(),
            airline: record.airline(),
            status: record.status.clone(),
            scheduled_arrival: mountain_display_time(arrival),
            expected_arrival: mountain_display_time(arrival),
            delay_minutes,
            is_delayed: delay_minutes > 0,
            kind,
            crew_count,
            note: String::new(),
            sort_time: arrival,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> FlightAwareClient {
        FlightAwareClient::new(&FlightAwareConfig {
            api_key: "test-key".to_string(),
            base_url: format!("{}/aeroapi", server.uri()),
        })
    }

    #[tokio::test]
    async fn test_flight_status_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/aeroapi/flights/AA100"))
            .and(header("x-apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "flights": [{
                    "ident": "AAL100",
                    "operator_iata": "AA",
                    "operator": "American Airlines",
                    "status": "active",
                    "scheduled_in": "2026-08-29T20:00:00Z",
                    "estimated_in": "2026-08-29T20:25:00Z",
                    "actual_in": ""
                }]
            })))
            .mount(&server)
            .await;

        let flight = client_for(&server)
            .flight_status("AA100", TripKind::Pickup, 3)
            .await
            .unwrap();

        assert_eq!(flight.flight_number, "AAL100");
        assert_eq!(flight.airline, "American Airlines");
        assert_eq!(flight.status, "active");
        assert_eq!(flight.delay_minutes, 25);
        assert!(flight.is_delayed);
        assert_eq!(flight.crew_count, 3);
        // 20:25 UTC is 2:25 PM in Denver during DST
        assert_eq!(flight.expected_arrival, "2:25 PM");
    }

    #[tokio::test]
    async fn test_flight_status_prefers_actual_arrival() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/aeroapi/flights/DL200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "flights": [{
                    "ident": "DAL200",
                    "operator": "Delta Air Lines",
                    "status": "landed",
                    "scheduled_in": "2026-08-29T18:00:00Z",
                    "estimated_in": "2026-08-29T18:10:00Z",
                    "actual_in": "2026-08-29T18:12:00Z"
                }]
            })))
            .mount(&server)
            .await;

        let flight = client_for(&server)
            .flight_status("DL200", TripKind::Dropoff, 2)
            .await
            .unwrap();

        assert_eq!(
            flight.sort_time,
            parse_rfc3339("2026-08-29T18:12:00Z").unwrap()
        );
        assert_eq!(flight.delay_minutes, 10);
    }

    #[tokio::test]
    async fn test_flight_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/aeroapi/flights/XX999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "flights": [] })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .flight_status("XX999", TripKind::Pickup, 1)
            .await;
        assert!(matches!(result, Err(FlightApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_no_arrival_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/aeroapi/flights/UA300"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "flights": [{
                    "ident": "UAL300",
                    "operator": "United Airlines",
                    "status": "scheduled"
                }]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .flight_status("UA300", TripKind::Pickup, 1)
            .await;
        assert!(matches!(result, Err(FlightApiError::NoArrivalData(_))));
    }

    #[tokio::test]
    async fn test_invalid_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/aeroapi/flights/AA1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .flight_status("AA1", TripKind::Pickup, 1)
            .await;
        assert!(matches!(result, Err(FlightApiError::InvalidResponse(_))));
    }

    #[test]
    fn test_airline_falls_back_to_iata() {
        let record = FlightRecord {
            ident: "SWA42".to_string(),
            operator_iata: Some("WN".to_string()),
            operator: Some(String::new()),
            status: "scheduled".to_string(),
            scheduled_in: None,
            estimated_in: None,
            actual_in: None,
        };
        assert_eq!(record.airline(), "WN");
    }
}
