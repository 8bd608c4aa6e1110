// File: src/query/groups.rs
use crate::core::band::frequency_band;
use crate::core::dictionary::Dictionary;
use crate::core::types::{PartOfSpeech, WordEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Cap on example matches listed per pattern.
pub const WAZN_MATCH_LIMIT: usize = 10;

/// Full entries of every word sharing `root`; empty when the root is unknown.
pub fn root_family<'a>(dictionary: &'a Dictionary, root: &str) -> Vec<&'a WordEntry> {
    dictionary
        .root_family(root)
        .iter()
        .filter_map(|key| dictionary.get(key))
        .collect()
}

pub fn cluster_words<'a>(dictionary: &'a Dictionary, cluster: &'a str) -> Vec<&'a WordEntry> {
    dictionary.words_in_cluster(cluster).collect()
}

/// All five parts of speech, each list in rank order. Every bucket is present,
/// even when empty.
pub fn pos_groups(dictionary: &Dictionary) -> BTreeMap<PartOfSpeech, Vec<&WordEntry>> {
    let mut groups: BTreeMap<PartOfSpeech, Vec<&WordEntry>> =
        PartOfSpeech::ALL.iter().map(|pos| (*pos, Vec::new())).collect();
    // entries() yields rank order, so each bucket stays sorted
    for entry in dictionary.entries() {
        groups.entry(entry.pos).or_default().push(entry);
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affix {
    Suffix(&'static str),
    Prefix(&'static str),
}

struct WaznPattern {
    name: &'static str,
    affix: Affix,
    example: &'static str,
}

const fn pattern(name: &'static str, affix: Affix, example: &'static str) -> WaznPattern {
    WaznPattern { name, affix, example }
}

// Shape hints on the unvocalised surface form, not real pattern analysis.
const WAZN_PATTERNS: [WaznPattern; 8] = [
    pattern("فَعَّال (Intense doer)", Affix::Suffix("ال"), "غَفَّار (Ghaffar)"),
    pattern("فَعِيل (Quality noun)", Affix::Suffix("يل"), "رَحِيم (Raheem)"),
    pattern("مَفْعُول (Passive)", Affix::Suffix("ول"), "مَقْتُول"),
    pattern("فَاعِل (Active doer)", Affix::Suffix("عل"), "كَافِر (Kafir)"),
    pattern("فِعَال (Plural pattern)", Affix::Suffix("ال"), "كِتَاب (Kitab)"),
    pattern("أَفْعَال (Broken plural)", Affix::Suffix("اع"), "أَفْعَال"),
    pattern("مَفْعَل (Place/time)", Affix::Suffix("عل"), "مَسْجِد (Masjid)"),
    pattern("إِسْتِفْعَال (Form X)", Affix::Prefix("است"), "اِسْتِغْفَار (Istighfar)"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaznGroup<'a> {
    pub pattern: &'static str,
    pub example: &'static str,
    /// First matches in rank order, at most [`WAZN_MATCH_LIMIT`].
    pub matches: Vec<&'a WordEntry>,
    /// Total number of matching words.
    pub count: usize,
}

/// Groups words by a fixed list of morphological shapes, in pattern order.
pub fn wazn_groups(dictionary: &Dictionary) -> Vec<WaznGroup<'_>> {
    WAZN_PATTERNS
        .iter()
        .map(|pattern| {
            let all: Vec<&WordEntry> = dictionary
                .entries()
                .filter(|e| match pattern.affix {
                    Affix::Suffix(s) => e.arabic.ends_with(s),
                    Affix::Prefix(p) => e.arabic.starts_with(p),
                })
                .collect();
            let count = all.len();
            WaznGroup {
                pattern: pattern.name,
                example: pattern.example,
                matches: all.into_iter().take(WAZN_MATCH_LIMIT).collect(),
                count,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootSummary<'a> {
    pub root: &'a str,
    pub word_count: usize,
    pub words: Vec<&'a WordEntry>,
    /// Rank of the family's most frequent word.
    pub min_rank: u32,
}

/// Every root family, most salient (lowest `min_rank`) first.
pub fn roots_summary(dictionary: &Dictionary) -> Vec<RootSummary<'_>> {
    let mut summary: Vec<RootSummary<'_>> = dictionary
        .roots()
        .map(|(root, keys)| {
            let words: Vec<&WordEntry> = keys.iter().filter_map(|k| dictionary.get(k)).collect();
            let min_rank = words.iter().map(|e| e.rank).min().unwrap_or(u32::MAX);
            RootSummary { root, word_count: keys.len(), words, min_rank }
        })
        .collect();
    summary.sort_by_key(|s| s.min_rank);
    summary
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell<'a> {
    pub arabic: &'a str,
    #[serde(rename = "tr")]
    pub transliteration: &'a str,
    #[serde(rename = "en")]
    pub english: &'a str,
    pub count: u32,
    pub rank: u32,
    pub cluster: &'a str,
    pub pos: PartOfSpeech,
    pub band: u8,
}

/// Every word with its frequency band, in rank order.
pub fn frequency_heatmap(dictionary: &Dictionary) -> Vec<HeatmapCell<'_>> {
    dictionary
        .entries()
        .map(|e| HeatmapCell {
            arabic: &e.arabic,
            transliteration: &e.transliteration,
            english: &e.english,
            count: e.count,
            rank: e.rank,
            cluster: &e.cluster,
            pos: e.pos,
            band: frequency_band(e.count),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_family_returns_entries() {
        let dict = Dictionary::embedded().unwrap();
        let family: Vec<&str> = root_family(&dict, "رحم")
            .iter()
            .map(|e| e.arabic.as_str())
            .collect();
        assert_eq!(family, vec!["الرحمن", "الرحيم", "رحمة"]);
        assert!(root_family(&dict, "xyz").is_empty());
    }

    #[test]
    fn cluster_words_match_key() {
        let dict = Dictionary::embedded().unwrap();
        let prophets = cluster_words(&dict, "prophets");
        assert_eq!(prophets.len(), 8);
        assert!(prophets.iter().all(|e| e.cluster == "prophets"));
        assert!(cluster_words(&dict, "nope").is_empty());
    }

    #[test]
    fn cluster_words_agree_with_dictionary() {
        let dict = Dictionary::embedded().unwrap();
        for key in dict.cluster_keys() {
            let listed: Vec<&WordEntry> = dict.words_in_cluster(key).collect();
            assert_eq!(cluster_words(&dict, key), listed);
        }
    }

    #[test]
    fn pos_groups_are_complete_and_sorted() {
        let dict = Dictionary::embedded().unwrap();
        let groups = pos_groups(&dict);
        assert_eq!(groups.len(), 5);
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), dict.len());
        for words in groups.values() {
            assert!(words.windows(2).all(|w| w[0].rank < w[1].rank));
        }
        assert_eq!(groups[&PartOfSpeech::Adj].len(), 1);
    }

    #[test]
    fn wazn_groups_follow_affixes() {
        let dict = Dictionary::embedded().unwrap();
        let groups = wazn_groups(&dict);
        assert_eq!(groups.len(), WAZN_PATTERNS.len());
        for group in &groups {
            assert!(group.matches.len() <= WAZN_MATCH_LIMIT);
            assert!(group.count >= group.matches.len());
        }
        let form_ten = groups.last().unwrap();
        assert!(form_ten.matches.iter().any(|e| e.arabic == "استغفر"));
        let quality = &groups[1];
        assert!(quality.matches.iter().all(|e| e.arabic.ends_with("يل")));
    }

    #[test]
    fn roots_summary_sorted_by_salience() {
        let dict = Dictionary::embedded().unwrap();
        let summary = roots_summary(&dict);
        assert_eq!(summary[0].root, "أله");
        assert_eq!(summary[0].min_rank, 1);
        assert!(summary.windows(2).all(|w| w[0].min_rank <= w[1].min_rank));
        assert_eq!(summary.iter().map(|s| s.word_count).sum::<usize>(), dict.len());
    }

    #[test]
    fn heatmap_bands() {
        let dict = Dictionary::embedded().unwrap();
        let cells = frequency_heatmap(&dict);
        assert_eq!(cells.len(), dict.len());
        assert_eq!(cells[0].arabic, "الله");
        assert_eq!(cells[0].band, 1);
    }
}
