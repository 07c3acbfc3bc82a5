use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Value, json};

use crate::agent::formatter::ToolKind;

/// Outcome of classifying one request: either a tool selection with the
/// parameters the tool expects, or text to answer with directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Call { tool: ToolKind, params: Value },
    Direct(String),
}

static COORD_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?\d+(?:\.\d+)?)[,\s]+(-?\d+(?:\.\d+)?)").expect("coordinate pattern is valid")
});

const PLACES_KEYWORDS: &[&str] = &["find", "search", "where", "near"];
const DIRECTIONS_KEYWORDS: &[&str] = &["direction", "route", "how to get", "navigate"];
const GEOCODE_KEYWORDS: &[&str] = &["coordinates", "geocode", "lat", "lng"];
const DISTANCE_KEYWORDS: &[&str] = &["distance", "how far"];

type Rule = fn(&str) -> Option<Intent>;

/// Rules are applied in this order; the first full match wins. A rule whose
/// structural extraction fails is a non-match and the cascade continues.
const RULES: &[Rule] = &[places_rule, directions_rule, geocode_rule, distance_rule];

/// Map free text to a tool selection or a direct answer. Deterministic and
/// stateless; conversation history is deliberately not consulted.
pub fn classify(text: &str) -> Intent {
    for rule in RULES {
        if let Some(intent) = rule(text) {
            return intent;
        }
    }
    Intent::Direct(capability_summary())
}

pub fn capability_summary() -> String {
    "I can help you with location services. Try asking me to:\n\
     - find places (\"find coffee near me\")\n\
     - get directions (\"how to get from Paris to Berlin\")\n\
     - geocode an address (\"geocode 1600 Amphitheatre Parkway\")\n\
     - reverse geocode (\"what address is at lat 59.91, 10.75\")\n\
     - measure distances (\"distance from Delhi to Mumbai\")"
        .to_string()
}

fn places_rule(text: &str) -> Option<Intent> {
    let lower = text.to_lowercase();
    if !contains_any(&lower, PLACES_KEYWORDS) {
        return None;
    }

    let mut stripped = remove_tokens(text, &["find", "search", "where", "near", "me"]);
    if stripped.is_empty() {
        stripped = text.trim().to_string();
    }

    Some(Intent::Call {
        tool: ToolKind::PlacesSearch,
        params: json!({ "query": stripped }),
    })
}

fn directions_rule(text: &str) -> Option<Intent> {
    let lower = text.to_lowercase();
    if !contains_any(&lower, DIRECTIONS_KEYWORDS) {
        return None;
    }

    let remainder = remove_phrases(text, &["how to get", "directions", "direction", "route", "navigate"]);
    let segments = split_on_prepositions(&remainder, &["to", "from"]);
    if segments.len() < 2 {
        return None;
    }

    let mode = if lower.contains("walk") {
        "walking"
    } else if lower.contains("transit") {
        "transit"
    } else {
        "driving"
    };

    Some(Intent::Call {
        tool: ToolKind::Routes,
        params: json!({
            "origin": segments[0],
            "destination": segments[1],
            "mode": mode,
        }),
    })
}

fn geocode_rule(text: &str) -> Option<Intent> {
    let lower = text.to_lowercase();
    if !contains_any(&lower, GEOCODE_KEYWORDS) {
        return None;
    }

    // "address" together with "what" or "reverse" flips the rule to reverse
    // geocoding; without a coordinate pair the rule is a non-match.
    if lower.contains("address") && (lower.contains("what") || lower.contains("reverse")) {
        let caps = COORD_PAIR.captures(text)?;
        let lat: f64 = caps[1].parse().ok()?;
        let lng: f64 = caps[2].parse().ok()?;
        return Some(Intent::Call {
            tool: ToolKind::ReverseGeocode,
            params: json!({ "lat": lat, "lng": lng }),
        });
    }

    let address = remove_tokens(
        text,
        &["coordinates", "geocode", "lat", "lng", "of", "for", "get"],
    );
    if address.is_empty() {
        return None;
    }

    Some(Intent::Call {
        tool: ToolKind::Geocode,
        params: json!({ "address": address }),
    })
}

fn distance_rule(text: &str) -> Option<Intent> {
    let lower = text.to_lowercase();
    if !contains_any(&lower, DISTANCE_KEYWORDS) {
        return None;
    }

    let remainder = remove_phrases(text, &["how far", "distance"]);
    let segments = split_on_prepositions(&remainder, &["to", "from", "between"]);
    if segments.len() < 2 {
        return None;
    }

    Some(Intent::Call {
        tool: ToolKind::DistanceMatrix,
        params: json!({
            "origins": [segments[0]],
            "destinations": [segments[1]],
        }),
    })
}

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}

/// Drop whitespace-delimited tokens whose alphanumeric core matches one of
/// `tokens`, preserving the casing and order of everything else.
fn remove_tokens(text: &str, tokens: &[&str]) -> String {
    text.split_whitespace()
        .filter(|word| {
            let core = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            !tokens.contains(&core.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Remove whole phrases case-insensitively, longest first as given.
fn remove_phrases(text: &str, phrases: &[&str]) -> String {
    let mut out = String::new();
    let mut rest = text;

    'outer: while !rest.is_empty() {
        let lower = rest.to_lowercase();
        for phrase in phrases {
            if lower.starts_with(phrase) {
                rest = &rest[phrase.len()..];
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
            rest = chars.as_str();
        }
    }

    out
}

/// Split on standalone preposition tokens, dropping empty segments.
fn split_on_prepositions(text: &str, prepositions: &[&str]) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        if prepositions.contains(&word.to_lowercase().as_str()) {
            if !current.is_empty() {
                segments.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        segments.push(current.join(" "));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_call(text: &str) -> (ToolKind, Value) {
        match classify(text) {
            Intent::Call { tool, params } => (tool, params),
            Intent::Direct(answer) => panic!("expected a tool call for {text:?}, got {answer:?}"),
        }
    }

    #[test]
    fn find_coffee_near_me() {
        let (tool, params) = expect_call("find coffee near me");
        assert_eq!(tool, ToolKind::PlacesSearch);
        assert_eq!(params["query"], "coffee");
    }

    #[test]
    fn places_query_falls_back_to_original_text() {
        let (tool, params) = expect_call("find me");
        assert_eq!(tool, ToolKind::PlacesSearch);
        assert_eq!(params["query"], "find me");
    }

    #[test]
    fn places_strip_handles_punctuation() {
        let (_, params) = expect_call("where is coffee near me?");
        assert_eq!(params["query"], "is coffee");
    }

    #[test]
    fn directions_with_walking_mode() {
        let (tool, params) = expect_call("how to get from Paris to Berlin by walk");
        assert_eq!(tool, ToolKind::Routes);
        assert!(params["origin"].as_str().unwrap().contains("Paris"));
        assert!(params["destination"].as_str().unwrap().contains("Berlin"));
        assert_eq!(params["mode"], "walking");
    }

    #[test]
    fn directions_transit_mode() {
        let (_, params) = expect_call("route from Oslo to Bergen by transit");
        assert_eq!(params["mode"], "transit");
    }

    #[test]
    fn directions_default_mode_is_driving() {
        let (_, params) = expect_call("directions from Oslo to Bergen");
        assert_eq!(params["mode"], "driving");
        assert_eq!(params["origin"], "Oslo");
        assert_eq!(params["destination"], "Bergen");
    }

    #[test]
    fn walk_beats_transit_when_both_present() {
        let (_, params) = expect_call("route from A to B, walk not transit");
        assert_eq!(params["mode"], "walking");
    }

    #[test]
    fn directions_without_split_falls_through() {
        // "navigate downtown" has the trigger but no to/from split; rule 1
        // does not trigger either, so this lands on the capability summary.
        match classify("navigate downtown") {
            Intent::Direct(answer) => assert!(answer.contains("location services")),
            Intent::Call { tool, .. } => panic!("unexpected call to {tool:?}"),
        }
    }

    #[test]
    fn forward_geocode_strips_filler() {
        let (tool, params) = expect_call("geocode the coordinates of 1600 Amphitheatre Parkway");
        assert_eq!(tool, ToolKind::Geocode);
        assert_eq!(params["address"], "the 1600 Amphitheatre Parkway");
    }

    #[test]
    fn reverse_geocode_extracts_pair() {
        let (tool, params) = expect_call("what address is at lat 59.91, 10.75");
        assert_eq!(tool, ToolKind::ReverseGeocode);
        assert_eq!(params["lat"], 59.91);
        assert_eq!(params["lng"], 10.75);
    }

    #[test]
    fn reverse_geocode_negative_coordinates() {
        let (_, params) = expect_call("reverse geocode this address: -33.86 151.21");
        assert_eq!(params["lat"], -33.86);
        assert_eq!(params["lng"], 151.21);
    }

    #[test]
    fn reverse_without_pair_falls_through_cascade() {
        // Trigger matches but extraction fails, so later rules still get a
        // chance; none match here.
        let intent = classify("what is the reverse address lat");
        assert!(matches!(intent, Intent::Direct(_)));
    }

    #[test]
    fn distance_from_delhi_to_mumbai() {
        let (tool, params) = expect_call("distance from Delhi to Mumbai");
        assert_eq!(tool, ToolKind::DistanceMatrix);
        assert_eq!(params["origins"], json!(["Delhi"]));
        assert_eq!(params["destinations"], json!(["Mumbai"]));
    }

    #[test]
    fn how_far_between() {
        let (tool, params) = expect_call("how far between London and Paris is it to drive");
        assert_eq!(tool, ToolKind::DistanceMatrix);
        assert_eq!(params["origins"], json!(["London and Paris is it"]));
    }

    #[test]
    fn hello_is_a_direct_answer() {
        match classify("hello") {
            Intent::Direct(answer) => {
                assert_eq!(answer, capability_summary());
            }
            Intent::Call { tool, .. } => panic!("unexpected call to {tool:?}"),
        }
    }

    #[test]
    fn earlier_rule_wins_over_later() {
        // "find" (rule 1) and "distance" (rule 4) both trigger; rule order
        // decides.
        let (tool, _) = expect_call("find the distance marker");
        assert_eq!(tool, ToolKind::PlacesSearch);
    }

    #[test]
    fn classification_is_stateless() {
        let a = classify("find coffee near me");
        let b = classify("find coffee near me");
        assert_eq!(a, b);
    }
}
