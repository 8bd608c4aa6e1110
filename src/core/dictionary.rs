// File: src/core/dictionary.rs
use crate::core::types::{ClusterDefinition, WordEntry};
use crate::error::{LabError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const EMBEDDED_JSON: &[u8] = include_bytes!("../../data/dictionary.json");

#[derive(Deserialize)]
struct DictionaryFile {
    clusters: Vec<ClusterDefinition>,
    words: Vec<WordEntry>,
}

/// The static vocabulary with its derived root index and cluster registry.
/// Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: HashMap<String, WordEntry>,
    /// Keys sorted by ascending frequency rank.
    by_rank: Vec<String>,
    /// Root -> keys sharing it, in load order.
    root_index: BTreeMap<String, Vec<String>>,
    clusters: Vec<ClusterDefinition>,
}

impl Dictionary {
    /// The bundled ~200 word table.
    pub fn embedded() -> Result<Self> {
        Self::from_slice(EMBEDDED_JSON)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let file: DictionaryFile = serde_json::from_slice(bytes)
            .map_err(|e| LabError::InvalidDictionary(e.to_string()))?;
        Self::from_parts(file.clusters, file.words)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| LabError::InvalidDictionary(format!("{}: {}", path.display(), e)))?;
        let file: DictionaryFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| LabError::InvalidDictionary(format!("{}: {}", path.display(), e)))?;
        Self::from_parts(file.clusters, file.words)
    }

    /// Validates the table and derives the indices. Duplicate keys, duplicate
    /// ranks and references to unregistered clusters are rejected.
    pub fn from_parts(clusters: Vec<ClusterDefinition>, words: Vec<WordEntry>) -> Result<Self> {
        let mut cluster_keys = HashSet::new();
        for cluster in &clusters {
            if !cluster_keys.insert(cluster.key.as_str()) {
                return Err(LabError::InvalidDictionary(format!(
                    "duplicate cluster '{}'",
                    cluster.key
                )));
            }
        }

        let mut entries = HashMap::with_capacity(words.len());
        let mut ranks = HashSet::with_capacity(words.len());
        let mut root_index: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for word in words {
            validate_entry(&word)?;
            if !cluster_keys.contains(word.cluster.as_str()) {
                return Err(LabError::InvalidDictionary(format!(
                    "'{}' references unknown cluster '{}'",
                    word.arabic, word.cluster
                )));
            }
            if !ranks.insert(word.rank) {
                return Err(LabError::InvalidDictionary(format!(
                    "'{}' reuses frequency rank {}",
                    word.arabic, word.rank
                )));
            }
            if entries.contains_key(&word.arabic) {
                return Err(LabError::InvalidDictionary(format!(
                    "duplicate word '{}'",
                    word.arabic
                )));
            }
            root_index
                .entry(word.root.clone())
                .or_default()
                .push(word.arabic.clone());
            entries.insert(word.arabic.clone(), word);
        }

        let mut by_rank: Vec<String> = entries.keys().cloned().collect();
        by_rank.sort_by_key(|key| entries[key].rank);

        log::debug!(
            "Dictionary loaded: {} words, {} roots, {} clusters",
            entries.len(),
            root_index.len(),
            clusters.len()
        );

        Ok(Self { entries, by_rank, root_index, clusters })
    }

    pub fn get(&self, key: &str) -> Option<&WordEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in ascending rank order.
    pub fn entries(&self) -> impl Iterator<Item = &WordEntry> + '_ {
        self.by_rank.iter().map(move |key| &self.entries[key])
    }

    pub fn words_by_rank(&self, top_n: usize) -> Vec<&WordEntry> {
        self.entries().take(top_n).collect()
    }

    /// Keys sharing `root`; empty for an unknown root.
    pub fn root_family(&self, root: &str) -> &[String] {
        self.root_index.get(root).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.root_index.iter().map(|(root, keys)| (root.as_str(), keys.as_slice()))
    }

    pub fn clusters(&self) -> &[ClusterDefinition] {
        &self.clusters
    }

    pub fn cluster(&self, key: &str) -> Option<&ClusterDefinition> {
        self.clusters.iter().find(|c| c.key == key)
    }

    pub fn cluster_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.clusters.iter().map(|c| c.key.as_str())
    }

    /// Entries whose thematic cluster is `key`, in rank order.
    pub fn words_in_cluster<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = &'a WordEntry> + 'a {
        self.entries().filter(move |e| e.cluster == key)
    }
}

fn validate_entry(word: &WordEntry) -> Result<()> {
    if word.arabic.trim().is_empty() {
        return Err(LabError::InvalidDictionary("entry with empty key".into()));
    }
    if word.root.trim().is_empty() {
        return Err(LabError::InvalidDictionary(format!("'{}' has no root", word.arabic)));
    }
    if word.rank == 0 {
        return Err(LabError::InvalidDictionary(format!(
            "'{}' has rank 0, ranks start at 1",
            word.arabic
        )));
    }
    if !(1..=3).contains(&word.level) {
        return Err(LabError::InvalidDictionary(format!(
            "'{}' has level {}, expected 1..=3",
            word.arabic, word.level
        )));
    }
    Ok(())
}
