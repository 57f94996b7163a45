// ABOUTME: API-source parser for Talto project responses. All fields come straight from the
// ABOUTME: structured JSON body and are High confidence; no markup scanning is involved.

use serde::Deserialize;

use crate::error::ParseError;
use crate::sanitize::{sanitize_positive_int, sanitize_text};
use crate::scenario::{ParsedField, ParsedScenario, SourceKind};

const SECONDS_PER_HOUR: u32 = 3600;

/// The subset of the project response the pipeline reads. Unknown fields
/// are ignored; every field is optional so a sparse response still parses.
#[derive(Debug, Deserialize)]
struct TaltoProject {
    title: Option<String>,
    author: Option<String>,
    min_players: Option<f64>,
    max_players: Option<f64>,
    min_playtime_hours: Option<f64>,
    max_playtime_hours: Option<f64>,
}

/// Parse a Talto project API response body.
pub fn parse(body: &str, source_url: &str) -> Result<ParsedScenario, ParseError> {
    let project: TaltoProject = serde_json::from_str(body)?;

    let (min_player, max_player) = ordered_pair(
        player_field(project.min_players),
        player_field(project.max_players),
    );

    Ok(ParsedScenario {
        title: text_field(project.title.as_deref()),
        author: text_field(project.author.as_deref()),
        min_player,
        max_player,
        min_playtime: playtime_field(project.min_playtime_hours),
        max_playtime: playtime_field(project.max_playtime_hours),
        source_type: SourceKind::Talto,
        source_url: source_url.to_string(),
    })
}

fn text_field(raw: Option<&str>) -> Option<ParsedField<String>> {
    let value = sanitize_text(raw?);
    if value.is_empty() {
        None
    } else {
        Some(ParsedField::high(value))
    }
}

/// Player counts are trusted structured data: when the sanitizer rejects a
/// value that was present, keep the raw value (floored at zero) rather than
/// dropping the field.
fn player_field(raw: Option<f64>) -> Option<ParsedField<u32>> {
    let raw = raw?;
    let value = sanitize_positive_int(raw).unwrap_or_else(|| raw.max(0.0).round() as u32);
    Some(ParsedField::high(value))
}

/// The output record guarantees min <= max whenever both bounds are
/// present; a source that reports them inverted gets them swapped.
fn ordered_pair(
    min: Option<ParsedField<u32>>,
    max: Option<ParsedField<u32>>,
) -> (Option<ParsedField<u32>>, Option<ParsedField<u32>>) {
    match (min, max) {
        (Some(a), Some(b)) if a.value > b.value => (Some(b), Some(a)),
        other => other,
    }
}

/// Playtime arrives as whole hours; null stays absent, never zero.
fn playtime_field(raw_hours: Option<f64>) -> Option<ParsedField<u32>> {
    let hours = sanitize_positive_int(raw_hours?)?;
    let seconds = hours.checked_mul(SECONDS_PER_HOUR)?;
    Some(ParsedField::high(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Confidence;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://talto.cc/projects/abc123";

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "title": "消えた提督",
            "author": "Circle Z",
            "min_players": 3,
            "max_players": 5,
            "min_playtime_hours": 2,
            "max_playtime_hours": 3
        }"#;
        let scenario = parse(body, URL).unwrap();

        assert_eq!(scenario.title, Some(ParsedField::high("消えた提督".to_string())));
        assert_eq!(scenario.author, Some(ParsedField::high("Circle Z".to_string())));
        assert_eq!(scenario.player_range(), Some((3, 5)));
        assert_eq!(scenario.playtime_range(), Some((7200, 10800)));
        assert_eq!(scenario.source_type, SourceKind::Talto);
        assert_eq!(scenario.source_url, URL);
    }

    #[test]
    fn test_all_fields_high_confidence() {
        let body = r#"{"title":"T","min_players":4,"min_playtime_hours":1}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.title.unwrap().confidence, Confidence::High);
        assert_eq!(scenario.min_player.unwrap().confidence, Confidence::High);
        assert_eq!(scenario.min_playtime.unwrap().confidence, Confidence::High);
    }

    #[test]
    fn test_hours_normalized_to_seconds() {
        let body = r#"{"min_playtime_hours":5}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.min_playtime, Some(ParsedField::high(18000)));
    }

    #[test]
    fn test_null_hours_stay_absent_not_zero() {
        let body = r#"{"title":"T","min_playtime_hours":null,"max_playtime_hours":null}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.min_playtime, None);
        assert_eq!(scenario.max_playtime, None);
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let scenario = parse("{}", URL).unwrap();
        assert_eq!(scenario.title, None);
        assert_eq!(scenario.author, None);
        assert_eq!(scenario.min_player, None);
        assert_eq!(scenario.max_player, None);
        assert_eq!(scenario.min_playtime, None);
        assert_eq!(scenario.max_playtime, None);
    }

    #[test]
    fn test_strings_are_sanitized() {
        let body = r#"{"title":"<b>Bold</b> &amp; Co","author":"  padded  "}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.title.unwrap().value, "Bold & Co");
        assert_eq!(scenario.author.unwrap().value, "padded");
    }

    #[test]
    fn test_fully_markup_title_becomes_absent() {
        let body = r#"{"title":"<script></script>"}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.title, None);
    }

    #[test]
    fn test_fractional_player_count_rounds() {
        let body = r#"{"min_players":3.7}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.min_player, Some(ParsedField::high(4)));
    }

    #[test]
    fn test_rejected_player_value_falls_back_instead_of_dropping() {
        let body = r#"{"min_players":-2}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.min_player, Some(ParsedField::high(0)));
    }

    #[test]
    fn test_inverted_player_bounds_are_reordered() {
        let body = r#"{"min_players":5,"max_players":2}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.min_player, Some(ParsedField::high(2)));
        assert_eq!(scenario.max_player, Some(ParsedField::high(5)));
        let (min, max) = scenario.player_range().unwrap();
        assert!(min <= max);
    }

    #[test]
    fn test_single_player_bound_passes_through() {
        let body = r#"{"max_players":6}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.min_player, None);
        assert_eq!(scenario.max_player, Some(ParsedField::high(6)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse("not json", URL).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let body = r#"{"title":"T","images":["a.png"],"description":"long text"}"#;
        let scenario = parse(body, URL).unwrap();
        assert_eq!(scenario.title.unwrap().value, "T");
    }
}
