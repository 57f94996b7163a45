// ABOUTME: Markup-source parser for Booth listing pages. Title and author come from the
// ABOUTME: embedded JSON-LD Product block; player count and playtime from description text.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::ParseError;
use crate::patterns::{extract_player_count, extract_playtime};
use crate::sanitize::{collapse_whitespace, sanitize_text};
use crate::scenario::{ParsedField, ParsedScenario, SourceKind};

/// Parse a Booth listing page.
///
/// The JSON-LD Product block is the authoritative field source: its absence
/// (or an empty product name) is a hard failure because the title is
/// mandatory. The description body and any images are deliberately never
/// part of the output record.
pub fn parse(html: &str, source_url: &str) -> Result<ParsedScenario, ParseError> {
    let doc = Html::parse_document(html);

    let product = find_product_block(&doc).ok_or(ParseError::NoStructuredData)?;

    let title = sanitize_text(&product.name);
    if title.is_empty() {
        return Err(ParseError::NoStructuredData);
    }

    let author = product
        .brand
        .as_deref()
        .map(sanitize_text)
        .filter(|a| !a.is_empty())
        .map(ParsedField::high);

    // Numeric extraction works over the raw description text; only digits
    // are captured, so it is not routed through sanitize_text.
    let description = description_text(&doc);
    let (min_player, max_player) = extract_player_count(&description);
    let (min_playtime, max_playtime) = extract_playtime(&description);

    Ok(ParsedScenario {
        title: Some(ParsedField::high(title)),
        author,
        min_player,
        max_player,
        min_playtime,
        max_playtime,
        source_type: SourceKind::Booth,
        source_url: source_url.to_string(),
    })
}

struct ProductBlock {
    name: String,
    brand: Option<String>,
}

/// Scan every JSON-LD script for a Product object. Scripts with malformed
/// JSON are skipped, not fatal; bare objects, top-level arrays, and @graph
/// holders are all accepted.
fn find_product_block(doc: &Html) -> Option<ProductBlock> {
    let selector = Selector::parse("script[type='application/ld+json']").ok()?;
    for script in doc.select(&selector) {
        let text = script.text().collect::<String>();
        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            if let Some(block) = find_product(&value) {
                return Some(block);
            }
        }
    }
    None
}

fn find_product(value: &Value) -> Option<ProductBlock> {
    match value {
        Value::Object(map) => {
            if map.get("@type").map_or(false, |t| matches_type(t, "Product")) {
                if let Some(name) = map.get("name").and_then(Value::as_str) {
                    if !name.trim().is_empty() {
                        return Some(ProductBlock {
                            name: name.to_string(),
                            brand: brand_name(map.get("brand")),
                        });
                    }
                }
            }
            if let Some(graph) = map.get("@graph") {
                return find_product(graph);
            }
            None
        }
        Value::Array(items) => items.iter().find_map(find_product),
        _ => None,
    }
}

fn matches_type(type_value: &Value, expected: &str) -> bool {
    match type_value {
        Value::String(s) => s == expected,
        Value::Array(items) => items.iter().any(|v| v.as_str() == Some(expected)),
        _ => false,
    }
}

/// Brand appears either as a bare string or as an object with a name.
fn brand_name(brand: Option<&Value>) -> Option<String> {
    match brand? {
        Value::String(s) => Some(s.to_string()),
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
        _ => None,
    }
}

/// Plain text of the listing's description container, whitespace collapsed.
/// Missing container degrades to an empty string, which simply yields
/// absent heuristic fields downstream.
fn description_text(doc: &Html) -> String {
    let Ok(selector) = Selector::parse(".description") else {
        return String::new();
    };
    let text = doc
        .select(&selector)
        .flat_map(|el| el.text())
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&text)
}
