// External maps deep link for an optimized route

use crate::models::Route;

const BASE_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Encodes one query value: spaces become `+`, unsafe bytes are percent-encoded
fn encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.trim().bytes() {
        match byte {
            b' ' => encoded.push('+'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b',' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Directions link with origin, destination and the stops in visiting order
///
/// Stops are joined with `+to:`; the `waypoints` parameter is left out when the
/// route goes straight from start to end.
pub fn build_link<L: AsRef<str>>(route: &Route<L>) -> String {
    let mut link = format!(
        "{}&origin={}&destination={}",
        BASE_URL,
        encode(route.start().as_ref()),
        encode(route.end().as_ref())
    );

    if !route.stops().is_empty() {
        let waypoints: Vec<String> = route
            .stops()
            .iter()
            .map(|stop| encode(stop.as_ref()))
            .collect();
        link.push_str("&waypoints=");
        link.push_str(&waypoints.join("+to:"));
    }

    link
}
