// File: src/query/search.rs
use crate::core::dictionary::Dictionary;
use crate::core::types::WordEntry;
use serde::Serialize;

pub const MAX_SEARCH_RESULTS: usize = 50;

// Field weights for a substring hit.
const ARABIC_WEIGHT: u32 = 10;
const TRANSLITERATION_WEIGHT: u32 = 8;
const ENGLISH_WEIGHT: u32 = 6;
const ROOT_WEIGHT: u32 = 5;
const CLUSTER_WEIGHT: u32 = 3;
const CATEGORY_WEIGHT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    pub score: u32,
    #[serde(flatten)]
    pub entry: &'a WordEntry,
}

/// Case-insensitive substring search over every text field of the dictionary.
/// Ranked by score, then by frequency rank. A blank query matches nothing.
pub fn search<'a>(dictionary: &'a Dictionary, query: &str) -> Vec<SearchHit<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return vec![];
    }

    let mut hits: Vec<SearchHit<'a>> = dictionary
        .entries()
        .filter_map(|entry| {
            let score = score_entry(entry, &query);
            (score > 0).then_some(SearchHit { score, entry })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then(a.entry.rank.cmp(&b.entry.rank)));
    hits.truncate(MAX_SEARCH_RESULTS);
    hits
}

fn score_entry(entry: &WordEntry, query: &str) -> u32 {
    let fields = [
        (entry.arabic.as_str(), ARABIC_WEIGHT),
        (entry.transliteration.as_str(), TRANSLITERATION_WEIGHT),
        (entry.english.as_str(), ENGLISH_WEIGHT),
        (entry.root.as_str(), ROOT_WEIGHT),
        (entry.cluster.as_str(), CLUSTER_WEIGHT),
        (entry.category.as_str(), CATEGORY_WEIGHT),
    ];
    fields
        .iter()
        .filter(|(text, _)| text.to_lowercase().contains(query))
        .map(|(_, weight)| weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_returns_nothing() {
        let dict = Dictionary::embedded().unwrap();
        assert!(search(&dict, "").is_empty());
        assert!(search(&dict, "   ").is_empty());
        let empty = Dictionary::from_parts(vec![], vec![]).unwrap();
        assert!(search(&empty, "").is_empty());
    }

    #[test]
    fn arabic_match_outranks_gloss_match() {
        let dict = Dictionary::embedded().unwrap();
        let hits = search(&dict, "الرحيم");
        assert_eq!(hits[0].entry.arabic, "الرحيم");
        assert_eq!(hits[0].score, ARABIC_WEIGHT);
    }

    #[test]
    fn case_insensitive_on_latin_fields() {
        let dict = Dictionary::embedded().unwrap();
        let upper = search(&dict, "MERCY");
        let lower = search(&dict, "mercy");
        assert!(!upper.is_empty());
        assert_eq!(upper, lower);
        assert!(upper.iter().any(|h| h.entry.arabic == "رحمة"));
    }

    #[test]
    fn ties_break_on_rank() {
        let dict = Dictionary::embedded().unwrap();
        let hits = search(&dict, "divine");
        assert!(hits.windows(2).all(|w| {
            w[0].score > w[1].score
                || (w[0].score == w[1].score && w[0].entry.rank < w[1].entry.rank)
        }));
    }

    #[test]
    fn results_are_capped() {
        let dict = Dictionary::embedded().unwrap();
        // every transliteration carries a vowel
        let hits = search(&dict, "a");
        assert_eq!(hits.len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn hit_serialises_flat() {
        let dict = Dictionary::embedded().unwrap();
        let hits = search(&dict, "الله");
        let json = serde_json::to_value(&hits[0]).unwrap();
        assert_eq!(json["arabic"], "الله");
        assert!(json["score"].as_u64().unwrap() >= 10);
    }
}
