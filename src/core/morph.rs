// File: src/core/morph.rs
use serde::Serialize;

// Vocalised clitics, longest tried first.
const PREFIXES: &[&str] = &["وَ", "فَ", "بِ", "لِ", "كَ", "أَ", "وَال", "فَال", "بِال", "لِال"];
const SUFFIXES: &[&str] = &[
    "هُمْ", "كُمْ", "هُ", "هَا", "نَا", "كَ", "هِمْ", "تَ", "نَ", "وَا", "ونَ", "ينَ", "انِ", "ينِ", "تُمْ",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Prefix,
    #[serde(rename = "root")]
    Stem,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
}

/// Splits a word into prefix / stem / suffix by plain string stripping.
/// This is a display aid, not a morphological analyser: at most one prefix and
/// one suffix are removed, and only when more than one character remains.
pub fn explode_word(arabic: &str) -> Vec<Segment> {
    let mut stem = arabic;

    let prefix = longest_first(PREFIXES).into_iter().find_map(|p| {
        stem.strip_prefix(p)
            .filter(|rest| rest.chars().count() > 1)
            .map(|rest| (p, rest))
    });
    if let Some((_, rest)) = prefix {
        stem = rest;
    }

    let suffix = longest_first(SUFFIXES).into_iter().find_map(|s| {
        stem.strip_suffix(s)
            .filter(|rest| rest.chars().count() > 1)
            .map(|rest| (s, rest))
    });
    if let Some((_, rest)) = suffix {
        stem = rest;
    }

    let mut segments = Vec::with_capacity(3);
    if let Some((p, _)) = prefix {
        segments.push(Segment { text: p.to_string(), kind: SegmentKind::Prefix });
    }
    segments.push(Segment { text: stem.to_string(), kind: SegmentKind::Stem });
    if let Some((s, _)) = suffix {
        segments.push(Segment { text: s.to_string(), kind: SegmentKind::Suffix });
    }
    segments
}

fn longest_first(affixes: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = affixes.to_vec();
    // stable: equal lengths keep list order
    sorted.sort_by_key(|a| std::cmp::Reverse(a.chars().count()));
    sorted
}
