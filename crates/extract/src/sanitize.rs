// ABOUTME: Text and number sanitization applied before extracted values are treated as trusted.
// ABOUTME: Strips markup, decodes common entities, and drops ASCII control characters.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Entity decode table. `&amp;` comes first so that stacked encodings
/// resurface as plain tags before the next strip pass.
const ENTITIES: [(&str, &str); 6] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#039;", "'"),
    ("&nbsp;", " "),
];

/// Control characters removed from sanitized text: 0x00-0x08, 0x0B, 0x0C,
/// 0x0E-0x1F, 0x7F. Tab, LF, and CR fall outside these ranges and survive.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Sanitize untrusted text so no markup or control bytes leave the pipeline.
///
/// Pipeline, in order: strip tag-shaped substrings, then decode the common
/// HTML entities and strip again until the string stops changing (so
/// stacked entity encodings cannot smuggle a tag past a fixed number of
/// passes), drop control characters, trim. Every decode-and-strip round
/// either shortens the string or terminates the loop, so it always ends.
/// Never fails; fully malicious input degrades to an empty string.
pub fn sanitize_text(input: &str) -> String {
    let mut current = TAG_RE.replace_all(input, "").into_owned();

    loop {
        let mut decoded = current.clone();
        for (entity, plain) in &ENTITIES {
            decoded = decoded.replace(entity, plain);
        }
        let restripped = TAG_RE.replace_all(&decoded, "").into_owned();
        if restripped == current {
            break;
        }
        current = restripped;
    }

    let cleaned: String = current
        .chars()
        .filter(|&c| !is_stripped_control(c))
        .collect();

    cleaned.trim().to_string()
}

/// Sanitize a number expected to be a non-negative integer.
///
/// Returns `None` for NaN, infinities, negative values, and values that do
/// not fit in `u32`; otherwise rounds half away from zero. Zero is a valid
/// result, not an absent one.
pub fn sanitize_positive_int(input: f64) -> Option<u32> {
    if !input.is_finite() || input < 0.0 {
        return None;
    }
    let rounded = input.round();
    if rounded > u32::MAX as f64 {
        return None;
    }
    Some(rounded as u32)
}

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result.trim().to_string()
}
