use std::fmt::Write;

use serde_json::Value;

/// Closed enumeration of the built-in tools. The formatter matches on this
/// exhaustively, so adding a tool forces a formatting branch to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    PlacesSearch,
    PlaceDetails,
    Geocode,
    ReverseGeocode,
    Routes,
    DistanceMatrix,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::PlacesSearch => "places_search",
            ToolKind::PlaceDetails => "place_details",
            ToolKind::Geocode => "geocode",
            ToolKind::ReverseGeocode => "reverse_geocode",
            ToolKind::Routes => "routes",
            ToolKind::DistanceMatrix => "distance_matrix",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "places_search" => Some(ToolKind::PlacesSearch),
            "place_details" => Some(ToolKind::PlaceDetails),
            "geocode" => Some(ToolKind::Geocode),
            "reverse_geocode" => Some(ToolKind::ReverseGeocode),
            "routes" => Some(ToolKind::Routes),
            "distance_matrix" => Some(ToolKind::DistanceMatrix),
            _ => None,
        }
    }
}

/// Render a raw tool payload as display text. Unknown tool names get a
/// structured dump of the payload.
pub fn format_result(tool_name: &str, payload: &Value) -> String {
    match ToolKind::from_name(tool_name) {
        Some(kind) => format_payload(kind, payload),
        None => generic_dump(payload),
    }
}

pub fn format_payload(kind: ToolKind, payload: &Value) -> String {
    match kind {
        ToolKind::PlacesSearch => format_places(payload),
        ToolKind::PlaceDetails => format_place_details(payload),
        ToolKind::Geocode => format_geocode(payload),
        ToolKind::ReverseGeocode => format_reverse_geocode(payload),
        ToolKind::Routes => format_routes(payload),
        ToolKind::DistanceMatrix => format_distance_matrix(payload),
    }
}

fn format_places(payload: &Value) -> String {
    let results = match payload.get("results").and_then(|v| v.as_array()) {
        Some(results) if !results.is_empty() => results,
        _ => return "I found no places matching your search.".to_string(),
    };

    let mut out = String::from("Here is what I found:\n");
    for (i, place) in results.iter().take(5).enumerate() {
        let name = str_field(place, "name").unwrap_or("Unnamed place");
        let _ = write!(out, "{}. {}", i + 1, name);
        if let Some(address) = str_field(place, "formatted_address") {
            let _ = write!(out, ", {}", address);
        }
        if let Some(rating) = place.get("rating").and_then(|v| v.as_f64()) {
            let _ = write!(out, " (rating {rating})");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn format_place_details(payload: &Value) -> String {
    let detail = match payload.get("result") {
        Some(detail) if detail.is_object() => detail,
        _ => return "I could not load details for that place.".to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", str_field(detail, "name").unwrap_or("Unnamed place"));
    if let Some(address) = str_field(detail, "formatted_address") {
        let _ = writeln!(out, "Address: {}", address);
    }
    if let Some(rating) = detail.get("rating").and_then(|v| v.as_f64()) {
        let _ = writeln!(out, "Rating: {rating}");
    }
    if let Some(phone) = str_field(detail, "formatted_phone_number") {
        let _ = writeln!(out, "Phone: {}", phone);
    }
    if let Some(open) = detail
        .pointer("/opening_hours/open_now")
        .and_then(|v| v.as_bool())
    {
        let _ = writeln!(out, "Currently {}", if open { "open" } else { "closed" });
    }
    out.trim_end().to_string()
}

fn format_geocode(payload: &Value) -> String {
    let first = match payload.pointer("/results/0") {
        Some(first) => first,
        None => return "I could not geocode that address.".to_string(),
    };

    let address = str_field(first, "formatted_address").unwrap_or("Unknown address");
    match (
        first.pointer("/geometry/location/lat").and_then(|v| v.as_f64()),
        first.pointer("/geometry/location/lng").and_then(|v| v.as_f64()),
    ) {
        (Some(lat), Some(lng)) => {
            format!("{address} is at coordinates ({lat}, {lng}).")
        }
        _ => format!("{address} (coordinates unavailable)."),
    }
}

fn format_reverse_geocode(payload: &Value) -> String {
    match payload.pointer("/results/0/formatted_address").and_then(|v| v.as_str()) {
        Some(address) => format!("That location is {address}."),
        None => "I could not find an address for those coordinates.".to_string(),
    }
}

fn format_routes(payload: &Value) -> String {
    let leg = match payload.pointer("/routes/0/legs/0") {
        Some(leg) => leg,
        None => return "I could not find a route between those places.".to_string(),
    };

    let distance = leg
        .pointer("/distance/text")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown distance");
    let duration = leg
        .pointer("/duration/text")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown duration");

    let mut out = format!("The route covers {distance} and takes about {duration}.\n");
    if let Some(steps) = leg.get("steps").and_then(|v| v.as_array()) {
        for (i, step) in steps.iter().take(5).enumerate() {
            if let Some(instruction) = str_field(step, "html_instructions") {
                let _ = writeln!(out, "{}. {}", i + 1, strip_markup(instruction));
            }
        }
    }
    out.trim_end().to_string()
}

fn format_distance_matrix(payload: &Value) -> String {
    let element = match payload.pointer("/rows/0/elements/0") {
        Some(element) => element,
        None => return "I could not compute that distance.".to_string(),
    };

    let status = str_field(element, "status").unwrap_or("UNKNOWN");
    if status != "OK" {
        return format!("The distance lookup failed with status {status}.");
    }

    let distance = element
        .pointer("/distance/text")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown distance");
    let duration = element
        .pointer("/duration/text")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown duration");

    format!("The distance is {distance}, taking about {duration}.")
}

fn generic_dump(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(|v| v.as_str())
}

/// Drop anything between angle brackets; route instructions arrive with
/// embedded HTML tags.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_kind_round_trips_names() {
        for kind in [
            ToolKind::PlacesSearch,
            ToolKind::PlaceDetails,
            ToolKind::Geocode,
            ToolKind::ReverseGeocode,
            ToolKind::Routes,
            ToolKind::DistanceMatrix,
        ] {
            assert_eq!(ToolKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("teleport"), None);
    }

    #[test]
    fn empty_places_result() {
        let text = format_result("places_search", &json!({"results": []}));
        assert!(text.contains("no places"));
    }

    #[test]
    fn places_render_caps_at_five() {
        let results: Vec<Value> = (0..8)
            .map(|i| json!({"name": format!("Cafe {i}"), "rating": 4.5}))
            .collect();
        let text = format_result("places_search", &json!({"results": results}));
        assert!(text.contains("Cafe 4"));
        assert!(!text.contains("Cafe 5"));
        assert!(text.contains("rating 4.5"));
    }

    #[test]
    fn places_tolerates_missing_fields() {
        let text = format_result("places_search", &json!({"results": [{}]}));
        assert!(text.contains("Unnamed place"));
    }

    #[test]
    fn geocode_renders_address_and_pair() {
        let payload = json!({"results": [{
            "formatted_address": "1600 Amphitheatre Pkwy",
            "geometry": {"location": {"lat": 37.42, "lng": -122.08}}
        }]});
        let text = format_result("geocode", &payload);
        assert!(text.contains("1600 Amphitheatre Pkwy"));
        assert!(text.contains("37.42"));
        assert!(text.contains("-122.08"));
    }

    #[test]
    fn reverse_geocode_renders_address_only() {
        let payload = json!({"results": [{"formatted_address": "10 Downing St"}]});
        let text = format_result("reverse_geocode", &payload);
        assert!(text.contains("10 Downing St"));
    }

    #[test]
    fn missing_route_is_a_fallback_not_a_panic() {
        let text = format_result("routes", &json!({}));
        assert!(text.contains("could not find a route"));
    }

    #[test]
    fn route_steps_are_capped_and_stripped() {
        let steps: Vec<Value> = (0..7)
            .map(|i| json!({"html_instructions": format!("Turn <b>left {i}</b>")}))
            .collect();
        let payload = json!({"routes": [{"legs": [{
            "distance": {"text": "12 km"},
            "duration": {"text": "15 min"},
            "steps": steps,
        }]}]});
        let text = format_result("routes", &payload);
        assert!(text.contains("12 km"));
        assert!(text.contains("15 min"));
        assert!(text.contains("Turn left 4"));
        assert!(!text.contains("left 5"));
        assert!(!text.contains("<b>"));
    }

    #[test]
    fn distance_matrix_first_pair() {
        let payload = json!({"rows": [{"elements": [{
            "status": "OK",
            "distance": {"text": "1,415 km"},
            "duration": {"text": "24 hours"},
        }]}]});
        let text = format_result("distance_matrix", &payload);
        assert!(text.contains("1,415 km"));
        assert!(text.contains("24 hours"));
    }

    #[test]
    fn distance_matrix_bad_status() {
        let payload = json!({"rows": [{"elements": [{"status": "NOT_FOUND"}]}]});
        let text = format_result("distance_matrix", &payload);
        assert!(text.contains("NOT_FOUND"));
    }

    #[test]
    fn unknown_tool_gets_generic_dump() {
        let text = format_result("mystery", &json!({"a": 1}));
        assert!(text.contains("\"a\": 1"));
    }
}
