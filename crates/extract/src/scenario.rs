// ABOUTME: Output data model for the extraction pipeline: Confidence, ParsedField, ParsedScenario.
// ABOUTME: A ParsedScenario is a pure immutable value produced once per request and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an extracted field value was obtained.
///
/// `High` means the value was read from a structured, authoritative source
/// field; `Low` means it was inferred by a regex heuristic over free text.
/// Confidence is assigned once at extraction time and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// An extracted value tagged with its confidence.
///
/// Absence of a field is modeled as `Option<ParsedField<T>>` being `None`,
/// which means "could not determine" -- distinct from a present empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedField<T> {
    pub value: T,
    pub confidence: Confidence,
}

impl<T> ParsedField<T> {
    /// Wrap a value read from a structured, authoritative source.
    pub fn high(value: T) -> Self {
        Self {
            value,
            confidence: Confidence::High,
        }
    }

    /// Wrap a value inferred by a text heuristic.
    pub fn low(value: T) -> Self {
        Self {
            value,
            confidence: Confidence::Low,
        }
    }
}

/// The curated sources the pipeline knows how to fetch from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Booth,
    Talto,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Booth => "booth",
            SourceKind::Talto => "talto",
        };
        write!(f, "{}", s)
    }
}

/// The sole output record of the pipeline.
///
/// Playtime fields are always in seconds regardless of the unit used by the
/// source. `source_url` can only be produced after validation succeeds, so
/// its host is guaranteed to belong to the supported-domain whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedScenario {
    pub title: Option<ParsedField<String>>,
    pub author: Option<ParsedField<String>>,
    pub min_player: Option<ParsedField<u32>>,
    pub max_player: Option<ParsedField<u32>>,
    /// Seconds.
    pub min_playtime: Option<ParsedField<u32>>,
    /// Seconds.
    pub max_playtime: Option<ParsedField<u32>>,
    pub source_type: SourceKind,
    pub source_url: String,
}

impl ParsedScenario {
    /// Returns true if a title was extracted.
    pub fn has_title(&self) -> bool {
        self.title.as_ref().map_or(false, |t| !t.value.is_empty())
    }

    /// Returns true if an author was extracted.
    pub fn has_author(&self) -> bool {
        self.author.as_ref().map_or(false, |a| !a.value.is_empty())
    }

    /// Both player-count bounds, when both are present.
    pub fn player_range(&self) -> Option<(u32, u32)> {
        match (&self.min_player, &self.max_player) {
            (Some(min), Some(max)) => Some((min.value, max.value)),
            _ => None,
        }
    }

    /// Both playtime bounds in seconds, when both are present.
    pub fn playtime_range(&self) -> Option<(u32, u32)> {
        match (&self.min_playtime, &self.max_playtime) {
            (Some(min), Some(max)) => Some((min.value, max.value)),
            _ => None,
        }
    }
}
