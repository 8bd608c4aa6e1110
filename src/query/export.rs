// File: src/query/export.rs
use crate::core::dictionary::Dictionary;
use crate::core::types::{FamiliarityStore, WordEntry};
use crate::error::{LabError, Result};

pub const CSV_HEADER: [&str; 10] = [
    "Arabic",
    "Transliteration",
    "English Meaning",
    "Root",
    "Category",
    "Cluster",
    "Part of Speech",
    "Frequency Rank",
    "Approx. Count in Quran",
    "Familiarity Score",
];

/// Row filter for exports. Both conditions must hold when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilter {
    pub cluster: Option<String>,
    pub pos: Option<String>,
}

impl ExportFilter {
    /// Blank strings count as "no filter".
    pub fn new(cluster: Option<&str>, pos: Option<&str>) -> Self {
        let non_blank = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self { cluster: non_blank(cluster), pos: non_blank(pos) }
    }

    pub fn matches(&self, entry: &WordEntry) -> bool {
        if let Some(cluster) = &self.cluster {
            if &entry.cluster != cluster {
                return false;
            }
        }
        if let Some(pos) = &self.pos {
            if entry.pos.as_str() != pos.as_str() {
                return false;
            }
        }
        true
    }
}

/// One row per matching entry in rank order, with the learner's score appended.
pub fn export_csv(
    dictionary: &Dictionary,
    filter: &ExportFilter,
    familiarity: &FamiliarityStore,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    let mut rows = 0usize;
    for entry in dictionary.entries().filter(|e| filter.matches(e)) {
        let rank = entry.rank.to_string();
        let count = entry.count.to_string();
        let score = familiarity.score(&entry.arabic).to_string();
        writer.write_record([
            entry.arabic.as_str(),
            entry.transliteration.as_str(),
            entry.english.as_str(),
            entry.root.as_str(),
            entry.category.as_str(),
            entry.cluster.as_str(),
            entry.pos.as_str(),
            rank.as_str(),
            count.as_str(),
            score.as_str(),
        ])?;
        rows += 1;
    }

    let bytes = writer.into_inner().map_err(|e| LabError::Export(e.to_string()))?;
    log::debug!("Exported {rows} rows");
    String::from_utf8(bytes).map_err(|e| LabError::Export(e.to_string()))
}
