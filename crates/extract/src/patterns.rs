// ABOUTME: Regex heuristics that pull player-count and playtime ranges out of free-form
// ABOUTME: Japanese description text. Every value produced here is Low confidence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scenario::ParsedField;

/// Sanity bounds for a heuristic player count. Matches outside this range
/// are discarded as if the pattern had not matched at all.
const PLAYER_MIN: u32 = 1;
const PLAYER_MAX: u32 = 20;

const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 3600;

// The regex crate has no lookahead, so the "must not be followed by
// 分/前/席" rule is realized as an optional trailing capture group that
// disqualifies the candidate when it matched (e.g. "3人分" = 3 servings).
static PL_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PL\s*(\d+)\s*[〜~～\-]\s*(\d+)\s*人").unwrap());
static PLAYER_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[〜~～\-]\s*(\d+)\s*人(?:用)?([分前席])?").unwrap());
static PLAYER_SINGLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*人(?:用)?([分前席])?").unwrap());
static SOLO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"ソロプレイ").unwrap());

static HOUR_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[〜~～\-]\s*(\d+)\s*時間").unwrap());
static MINUTE_TO_HOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*分\s*[〜~～\-]\s*(\d+)\s*時間").unwrap());
// Single bounds need the approx marker; bare "5時間" in running text is
// too often a duration of something other than a session.
static HOUR_SINGLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"約\s*(\d+)\s*時間").unwrap());
static MINUTE_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[〜~～\-]\s*(\d+)\s*分").unwrap());
static MINUTE_SINGLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"約\s*(\d+)\s*分").unwrap());

/// Extract a player-count range from description text.
///
/// Ordered patterns, first hit wins: "PL n〜m人", bare "n〜m人", bare "n人"
/// (optionally "n人用"), then the literal "ソロプレイ" which means a
/// one-player scenario. Returns `(None, None)` when nothing matches.
pub fn extract_player_count(
    text: &str,
) -> (Option<ParsedField<u32>>, Option<ParsedField<u32>>) {
    match player_count_bounds(text) {
        Some((min, max)) => (Some(ParsedField::low(min)), Some(ParsedField::low(max))),
        None => (None, None),
    }
}

fn player_count_bounds(text: &str) -> Option<(u32, u32)> {
    if let Some(caps) = PL_RANGE_RE.captures(text) {
        if let Some(bounds) = accept_range(&caps[1], &caps[2]) {
            return Some(bounds);
        }
    }

    for caps in PLAYER_RANGE_RE.captures_iter(text) {
        if caps.get(3).is_some() {
            continue;
        }
        if let Some(bounds) = accept_range(&caps[1], &caps[2]) {
            return Some(bounds);
        }
    }

    for caps in PLAYER_SINGLE_RE.captures_iter(text) {
        if caps.get(2).is_some() {
            continue;
        }
        if let Some(bounds) = accept_range(&caps[1], &caps[1]) {
            return Some(bounds);
        }
    }

    if SOLO_RE.is_match(text) {
        return Some((1, 1));
    }

    None
}

fn accept_range(min_str: &str, max_str: &str) -> Option<(u32, u32)> {
    let min: u32 = min_str.parse().ok()?;
    let max: u32 = max_str.parse().ok()?;
    let in_range = |n: u32| (PLAYER_MIN..=PLAYER_MAX).contains(&n);
    if min <= max && in_range(min) && in_range(max) {
        Some((min, max))
    } else {
        None
    }
}

/// Extract a playtime range, normalized to seconds, from description text.
///
/// Ordered patterns, first hit wins: "n〜m時間", "n分〜m時間", "約n時間",
/// "n〜m分", "約n分". Returns `(None, None)` when nothing matches -- an
/// absent pair, never a zero.
pub fn extract_playtime(
    text: &str,
) -> (Option<ParsedField<u32>>, Option<ParsedField<u32>>) {
    match playtime_bounds(text) {
        Some((min, max)) => (Some(ParsedField::low(min)), Some(ParsedField::low(max))),
        None => (None, None),
    }
}

fn playtime_bounds(text: &str) -> Option<(u32, u32)> {
    if let Some(caps) = HOUR_RANGE_RE.captures(text) {
        return scaled_bounds(&caps[1], &caps[2], SECONDS_PER_HOUR, SECONDS_PER_HOUR);
    }
    if let Some(caps) = MINUTE_TO_HOUR_RE.captures(text) {
        return scaled_bounds(&caps[1], &caps[2], SECONDS_PER_MINUTE, SECONDS_PER_HOUR);
    }
    if let Some(caps) = HOUR_SINGLE_RE.captures(text) {
        return scaled_bounds(&caps[1], &caps[1], SECONDS_PER_HOUR, SECONDS_PER_HOUR);
    }
    if let Some(caps) = MINUTE_RANGE_RE.captures(text) {
        return scaled_bounds(&caps[1], &caps[2], SECONDS_PER_MINUTE, SECONDS_PER_MINUTE);
    }
    if let Some(caps) = MINUTE_SINGLE_RE.captures(text) {
        return scaled_bounds(&caps[1], &caps[1], SECONDS_PER_MINUTE, SECONDS_PER_MINUTE);
    }
    None
}

fn scaled_bounds(
    min_str: &str,
    max_str: &str,
    min_scale: u32,
    max_scale: u32,
) -> Option<(u32, u32)> {
    let min: u32 = min_str.parse().ok()?;
    let max: u32 = max_str.parse().ok()?;
    Some((min.checked_mul(min_scale)?, max.checked_mul(max_scale)?))
}
