// File: src/corpus.rs
use crate::core::types::Verse;
use crate::error::{LabError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const EMBEDDED_JSON: &[u8] = include_bytes!("../data/corpus.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surah {
    pub number: u32,
    pub name_ar: String,
    pub name_en: String,
    pub name_tr: String,
    #[serde(default)]
    pub revelation: String,
    pub verses_count: u32,
    #[serde(default)]
    pub description: String,
    pub verses: Vec<Verse>,
}

impl Surah {
    /// Distinct dictionary keys linked anywhere in the surah.
    pub fn db_keys(&self) -> BTreeSet<&str> {
        self.verses
            .iter()
            .flat_map(|v| v.words.iter())
            .filter_map(|w| w.db_key.as_deref())
            .collect()
    }

    pub fn summary(&self) -> SurahSummary {
        SurahSummary {
            number: self.number,
            name_ar: self.name_ar.clone(),
            name_en: self.name_en.clone(),
            name_tr: self.name_tr.clone(),
            verses_count: self.verses_count,
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurahSummary {
    pub number: u32,
    pub name_ar: String,
    pub name_en: String,
    pub name_tr: String,
    pub verses_count: u32,
    pub description: String,
}

/// Supplies verse text to the lab. Read-only.
pub trait CorpusProvider: Send + Sync {
    fn surah(&self, number: u32) -> Option<&Surah>;
    /// Summaries in surah order.
    fn surahs(&self) -> Vec<SurahSummary>;
}

#[derive(Deserialize)]
struct CorpusFile {
    surahs: Vec<Surah>,
}

/// Corpus read from the JSON produced by the offline data builder.
#[derive(Debug, Clone, Default)]
pub struct JsonCorpus {
    surahs: BTreeMap<u32, Surah>,
}

impl JsonCorpus {
    /// The bundled sample (Al-Fatihah and Al-Ikhlas).
    pub fn embedded() -> Result<Self> {
        Self::from_slice(EMBEDDED_JSON)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let file: CorpusFile =
            serde_json::from_slice(bytes).map_err(|e| LabError::InvalidCorpus(e.to_string()))?;
        Self::from_surahs(file.surahs)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| LabError::InvalidCorpus(format!("{}: {}", path.display(), e)))?;
        let file: CorpusFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| LabError::InvalidCorpus(format!("{}: {}", path.display(), e)))?;
        Self::from_surahs(file.surahs)
    }

    pub fn from_surahs(surahs: Vec<Surah>) -> Result<Self> {
        let mut by_number = BTreeMap::new();
        for surah in surahs {
            let number = surah.number;
            if by_number.insert(number, surah).is_some() {
                return Err(LabError::InvalidCorpus(format!("surah {number} appears twice")));
            }
        }
        log::debug!("Corpus loaded: {} surahs", by_number.len());
        Ok(Self { surahs: by_number })
    }
}

impl CorpusProvider for JsonCorpus {
    fn surah(&self, number: u32) -> Option<&Surah> {
        self.surahs.get(&number)
    }

    fn surahs(&self) -> Vec<SurahSummary> {
        self.surahs.values().map(Surah::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_sample_loads() {
        let corpus = JsonCorpus::embedded().unwrap();
        let summaries = corpus.surahs();
        let numbers: Vec<u32> = summaries.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 112]);

        let fatiha = corpus.surah(1).unwrap();
        assert_eq!(fatiha.verses.len(), 7);
        assert_eq!(fatiha.verses_count, 7);
        assert!(fatiha.db_keys().contains("الله"));
        assert!(corpus.surah(2).is_none());
    }

    #[test]
    fn linked_keys_exist_in_the_bundled_dictionary() {
        let dictionary = crate::core::dictionary::Dictionary::embedded().unwrap();
        let corpus = JsonCorpus::embedded().unwrap();
        for summary in corpus.surahs() {
            let surah = corpus.surah(summary.number).unwrap();
            for key in surah.db_keys() {
                assert!(dictionary.contains(key), "{key} missing from dictionary");
            }
        }
    }

    #[test]
    fn duplicate_surah_is_rejected() {
        let surah = Surah {
            number: 3,
            name_ar: String::new(),
            name_en: "Ali 'Imran".into(),
            name_tr: String::new(),
            revelation: String::new(),
            verses_count: 0,
            description: String::new(),
            verses: vec![],
        };
        assert!(JsonCorpus::from_surahs(vec![surah.clone(), surah]).is_err());
    }
}
