// src/core/types.rs
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The Arabic surface form, used as the stable identifier into the dictionary.
pub type DbKey = String;

/// Grammatical bucket of a dictionary word. Unlisted values read from data
/// files fall back to `Noun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Particle,
    Pronoun,
    Adj,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 5] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Particle,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Adj,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Particle => "particle",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Adj => "adj",
        }
    }
}

impl From<String> for PartOfSpeech {
    fn from(s: String) -> Self {
        match s.as_str() {
            "verb" => PartOfSpeech::Verb,
            "particle" => PartOfSpeech::Particle,
            "pronoun" => PartOfSpeech::Pronoun,
            "adj" => PartOfSpeech::Adj,
            _ => PartOfSpeech::Noun,
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One word of the static vocabulary. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub arabic: DbKey,
    pub transliteration: String,
    pub english: String,
    pub root: String,
    pub category: String,
    /// Global frequency order, 1 is the most frequent word.
    pub rank: u32,
    /// Approximate number of occurrences in the Quran.
    pub count: u32,
    pub cluster: String,
    pub pos: PartOfSpeech,
    /// Pedagogical tier, 1..=3.
    pub level: u8,
}

/// Thematic grouping shown in the UI and used as an injection override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDefinition {
    pub key: String,
    pub label: String,
    pub color: String,
    pub background: String,
    pub description: String,
}

/// One word of a verse as delivered by the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordOccurrence {
    #[serde(rename = "ar")]
    pub arabic: String,
    #[serde(rename = "en")]
    pub english: String,
    #[serde(rename = "tr", default)]
    pub transliteration: String,
    /// Link into the dictionary; absent when the corpus builder found no match.
    #[serde(default)]
    pub db_key: Option<DbKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub number: u32,
    #[serde(default)]
    pub arabic: String,
    #[serde(default)]
    pub english: String,
    pub words: Vec<WordOccurrence>,
}

/// Exposure counts per dictionary key. Serialises as a flat key -> integer map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamiliarityStore(BTreeMap<DbKey, u64>);

impl FamiliarityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposure count for `key`, 0 when never seen.
    pub fn score(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, key: &str, by: u64) {
        *self.0.entry(key.to_string()).or_insert(0) += by;
    }

    pub fn set(&mut self, key: &str, count: u64) {
        self.0.insert(key.to_string(), count);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<DbKey>> FromIterator<(K, u64)> for FamiliarityStore {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Render decision for a single word occurrence, consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordRender {
    #[serde(rename = "ar")]
    pub arabic: String,
    #[serde(rename = "en")]
    pub english: String,
    #[serde(rename = "tr")]
    pub transliteration: String,
    pub db_key: Option<DbKey>,
    pub show_arabic: bool,
    /// Snapshot of the dictionary entry; serialised as `{}` for unlinked words.
    #[serde(serialize_with = "entry_or_empty")]
    pub data: Option<WordEntry>,
    pub familiarity_score: u64,
    pub freq_band: u8,
    pub root: String,
    pub cluster: String,
    pub pos: Option<PartOfSpeech>,
    pub rank: u32,
    pub count: u32,
    pub is_known: bool,
}

fn entry_or_empty<S: Serializer>(
    entry: &Option<WordEntry>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match entry {
        Some(entry) => entry.serialize(serializer),
        None => BTreeMap::<String, String>::new().serialize(serializer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_part_of_speech_buckets_into_noun() {
        let pos: PartOfSpeech = serde_json::from_str("\"interjection\"").unwrap();
        assert_eq!(pos, PartOfSpeech::Noun);
        let pos: PartOfSpeech = serde_json::from_str("\"pronoun\"").unwrap();
        assert_eq!(pos, PartOfSpeech::Pronoun);
        assert_eq!(serde_json::to_string(&PartOfSpeech::Adj).unwrap(), "\"adj\"");
    }

    #[test]
    fn familiarity_store_is_a_flat_map() {
        let store: FamiliarityStore = serde_json::from_str(r#"{"الله": 3, "رب": 0}"#).unwrap();
        assert_eq!(store.score("الله"), 3);
        assert_eq!(store.score("رب"), 0);
        assert_eq!(store.score("missing"), 0);
        assert_eq!(serde_json::to_string(&store).unwrap(), r#"{"الله":3,"رب":0}"#);
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert!(serde_json::from_str::<FamiliarityStore>(r#"{"w": -1}"#).is_err());
    }

    #[test]
    fn occurrence_without_link_deserialises() {
        let word: WordOccurrence = serde_json::from_str(r#"{"ar": "غَيْرِ", "en": "not"}"#).unwrap();
        assert_eq!(word.db_key, None);
        assert!(word.transliteration.is_empty());
    }
}
