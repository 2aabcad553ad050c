//! Server-rendered HTML. Thin presentation glue over the flight board and
//! login flow.

use crate::flights::Flight;

/// Minimal HTML escaping for user-supplied values.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(msg) => format!(r#"<p class="error">{}</p>"#, escape(msg)),
        None => String::new(),
    }
}

pub fn login_page(error: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Shuttle Tracker - Login</title>
</head>
<body>
  <h1>Shuttle Tracker</h1>
  {banner}
  <form method="POST" action="/login">
    <label>Username <input type="text" name="username" autofocus></label>
    <label>Password <input type="password" name="password"></label>
    <button type="submit">Log in</button>
  </form>
</body>
</html>
"#,
        banner = error_banner(error)
    )
}

fn flight_row(flight: &Flight) -> String {
    let delay = if flight.is_delayed {
        format!("+{} min", flight.delay_minutes)
    } else {
        "on time".to_string()
    };

    format!(
        r#"<tr>
  <td>{number}</td>
  <td>{airline}</td>
  <td>{status}</td>
  <td>{scheduled}</td>
  <td>{expected}</td>
  <td>{delay}</td>
  <td>{kind}</td>
  <td>{crew}</td>
  <td>
    <form method="POST" action="/update-note">
      <input type="hidden" name="id" value="{id}">
      <input type="text" name="note" value="{note}">
    </form>
  </td>
  <td>
    <form method="POST" action="/remove">
      <input type="hidden" name="id" value="{id}">
      <button type="submit">Remove</button>
    </form>
  </td>
</tr>"#,
        number = escape(&flight.flight_number),
        airline = escape(&flight.airline),
        status = escape(&flight.status),
        scheduled = escape(&flight.scheduled_arrival),
        expected = escape(&flight.expected_arrival),
        delay = delay,
        kind = flight.kind,
        crew = flight.crew_count,
        id = flight.id,
        note = escape(&flight.note),
    )
}

pub fn board_page(flights: &[Flight], error: Option<&str>, is_demo: bool) -> String {
    let demo_banner = if is_demo {
        r#"<p class="demo">Demo account: flights are simulated, not live data.</p>"#
    } else {
        ""
    };

    let rows: String = flights.iter().map(flight_row).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Shuttle Tracker</title>
</head>
<body>
  <h1>Shuttle Tracker</h1>
  {demo_banner}
  {banner}
  <form method="POST" action="/add">
    <label>Flight number <input type="text" name="flight_number"></label>
    <label><input type="checkbox" name="is_pickup"> Pickup</label>
    <label><input type="checkbox" name="is_dropoff"> Dropoff</label>
    <label>Crew <input type="number" name="crew_count" min="0"></label>
    <button type="submit">Add flight</button>
  </form>
  <table>
    <tr>
      <th>Flight</th><th>Airline</th><th>Status</th><th>Scheduled</th>
      <th>Expected</th><th>Delay</th><th>Type</th><th>Crew</th>
      <th>Note</th><th></th>
    </tr>
    {rows}
  </table>
  <form method="POST" action="/logout">
    <button type="submit">Log out</button>
  </form>
</body>
</html>
"#,
        demo_banner = demo_banner,
        banner = error_banner(error),
        rows = rows,
    )
}
