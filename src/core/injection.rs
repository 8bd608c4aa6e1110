// File: src/core/injection.rs
use crate::config::InjectionSettings;
use crate::core::dictionary::Dictionary;
use serde::Serialize;
use std::collections::BTreeSet;

/// A set of clusters named by a preset, reading level or profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSelection {
    Listed(&'static [&'static str]),
    /// Every cluster registered in the dictionary.
    All,
}

impl Serialize for ClusterSelection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClusterSelection::Listed(keys) => keys.serialize(serializer),
            ClusterSelection::All => serializer.serialize_str("all"),
        }
    }
}

impl ClusterSelection {
    pub const NONE: ClusterSelection = ClusterSelection::Listed(&[]);

    pub fn resolve(&self, dictionary: &Dictionary) -> BTreeSet<String> {
        match self {
            ClusterSelection::Listed(keys) => keys.iter().map(|k| k.to_string()).collect(),
            ClusterSelection::All => dictionary.cluster_keys().map(str::to_string).collect(),
        }
    }
}

/// One step of the injection slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelPreset {
    pub level: u8,
    pub label: &'static str,
    /// Words ranked at or below this are injected.
    pub rank_threshold: u32,
    /// Clusters the UI suggests enabling at this level.
    pub default_clusters: ClusterSelection,
}

/// Ascending by level; level 0 must stay first.
pub const LEVEL_PRESETS: [LevelPreset; 7] = [
    LevelPreset {
        level: 0,
        label: "Pure English",
        rank_threshold: 0,
        default_clusters: ClusterSelection::NONE,
    },
    LevelPreset {
        level: 10,
        label: "Divine Names Only",
        rank_threshold: 5,
        default_clusters: ClusterSelection::Listed(&["salah_essentials"]),
    },
    LevelPreset {
        level: 25,
        label: "Salah Essentials",
        rank_threshold: 50,
        default_clusters: ClusterSelection::Listed(&["salah_essentials", "divine"]),
    },
    LevelPreset {
        level: 50,
        label: "Top 100 Words",
        rank_threshold: 100,
        default_clusters: ClusterSelection::Listed(&[
            "salah_essentials",
            "divine",
            "guidance",
            "heart",
        ]),
    },
    LevelPreset {
        level: 75,
        label: "Top 200 Words",
        rank_threshold: 200,
        default_clusters: ClusterSelection::Listed(&[
            "salah_essentials",
            "divine",
            "guidance",
            "heart",
            "people",
            "verbs",
            "structure",
        ]),
    },
    LevelPreset {
        level: 90,
        label: "Top 300 Words",
        rank_threshold: 300,
        default_clusters: ClusterSelection::All,
    },
    LevelPreset {
        level: 100,
        label: "Pure Arabic",
        rank_threshold: 9999,
        default_clusters: ClusterSelection::All,
    },
];

/// The preset with the highest level not above `level` (floor match).
pub fn preset_for(level: u8) -> Option<&'static LevelPreset> {
    LEVEL_PRESETS.iter().rev().find(|p| p.level <= level)
}

pub fn rank_threshold(level: u8) -> u32 {
    preset_for(level).map(|p| p.rank_threshold).unwrap_or(0)
}

/// Decides, word by word, whether the learner sees Arabic or English.
pub struct InjectionEngine<'d> {
    dictionary: &'d Dictionary,
}

impl<'d> InjectionEngine<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self { dictionary }
    }

    /// Unlinked or unknown words are never injected. An active cluster
    /// overrides the rank threshold; the threshold itself is inclusive.
    pub fn should_inject(&self, db_key: Option<&str>, settings: &InjectionSettings) -> bool {
        let Some(entry) = db_key.and_then(|key| self.dictionary.get(key)) else {
            return false;
        };

        if settings.active_clusters.contains(&entry.cluster) {
            return true;
        }

        entry.rank <= rank_threshold(settings.injection_level)
    }
}
