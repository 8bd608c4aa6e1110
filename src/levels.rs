// File: src/levels.rs
use crate::config::{InjectionSettings, DEFAULT_KNOWN_THRESHOLD};
use crate::core::dictionary::Dictionary;
use crate::core::injection::ClusterSelection;
use serde::Serialize;

/// Presentation switches that travel with a level or profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayOptions {
    /// Percent of normal word spacing.
    pub word_spacing: u16,
    pub show_tajweed: bool,
    pub show_morpheme_split: bool,
    pub show_translation: bool,
    pub translation_opacity: u8,
    pub hifz_ghost: bool,
    pub heatmap: bool,
    pub color_pos: bool,
}

const PLAIN: DisplayOptions = DisplayOptions {
    word_spacing: 100,
    show_tajweed: false,
    show_morpheme_split: false,
    show_translation: true,
    translation_opacity: 100,
    hifz_ghost: false,
    heatmap: false,
    color_pos: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingLevel {
    pub key: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub injection_level: u8,
    pub active_clusters: ClusterSelection,
    pub display: DisplayOptions,
    pub description: &'static str,
}

impl ReadingLevel {
    pub fn settings(&self, dictionary: &Dictionary) -> InjectionSettings {
        resolve(self.injection_level, &self.active_clusters, dictionary)
    }
}

pub const READING_LEVELS: [ReadingLevel; 6] = [
    ReadingLevel {
        key: "qaida",
        name: "Qaida",
        subtitle: "The Decoder",
        injection_level: 0,
        active_clusters: ClusterSelection::NONE,
        display: DisplayOptions {
            word_spacing: 200,
            show_tajweed: true,
            show_morpheme_split: true,
            show_translation: false,
            translation_opacity: 0,
            ..PLAIN
        },
        description: "Visual recognition. Train your eye to see word boundaries.",
    },
    ReadingLevel {
        key: "tilawah",
        name: "Tilawah",
        subtitle: "The Fluid Reader",
        injection_level: 25,
        active_clusters: ClusterSelection::Listed(&["salah_essentials"]),
        display: PLAIN,
        description: "English with injected Arabic. The immersion begins here.",
    },
    ReadingLevel {
        key: "hifz",
        name: "Hifz",
        subtitle: "The Memoriser",
        injection_level: 75,
        active_clusters: ClusterSelection::All,
        display: DisplayOptions { translation_opacity: 15, hifz_ghost: true, ..PLAIN },
        description: "Root letters bolded as memory hooks. English ghosted.",
    },
    ReadingLevel {
        key: "sarf",
        name: "Sarf",
        subtitle: "The Pattern Recogniser",
        injection_level: 90,
        active_clusters: ClusterSelection::All,
        display: DisplayOptions {
            word_spacing: 150,
            show_morpheme_split: true,
            translation_opacity: 60,
            heatmap: true,
            ..PLAIN
        },
        description: "Word patterns highlighted to show the mathematical structure.",
    },
    ReadingLevel {
        key: "nahw",
        name: "Nahw",
        subtitle: "The Architect",
        injection_level: 90,
        active_clusters: ClusterSelection::All,
        display: DisplayOptions {
            word_spacing: 120,
            translation_opacity: 80,
            color_pos: true,
            ..PLAIN
        },
        description: "Colour-coded by part of speech. Sentence architecture visible.",
    },
    ReadingLevel {
        key: "alim",
        name: "Alim",
        subtitle: "The Researcher",
        injection_level: 100,
        active_clusters: ClusterSelection::All,
        display: DisplayOptions {
            show_tajweed: true,
            show_morpheme_split: true,
            heatmap: true,
            color_pos: true,
            ..PLAIN
        },
        description: "Full corpus view with every variable visible. Deep research mode.",
    },
];

const DEFAULT_READING_LEVEL: usize = 1;

/// Looks a level up by key; unknown keys fall back to Tilawah.
pub fn reading_level(key: &str) -> &'static ReadingLevel {
    READING_LEVELS
        .iter()
        .find(|level| level.key.eq_ignore_ascii_case(key))
        .unwrap_or(&READING_LEVELS[DEFAULT_READING_LEVEL])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LearnerProfile {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub injection_level: u8,
    pub active_clusters: ClusterSelection,
    pub display: DisplayOptions,
}

impl LearnerProfile {
    pub fn settings(&self, dictionary: &Dictionary) -> InjectionSettings {
        resolve(self.injection_level, &self.active_clusters, dictionary)
    }
}

pub const LEARNER_PROFILES: [LearnerProfile; 7] = [
    LearnerProfile {
        key: "contextual",
        label: "The Contextual Learner",
        description: "Learns through story and narrative. Dislikes abstract rules.",
        injection_level: 30,
        active_clusters: ClusterSelection::Listed(&["salah_essentials", "divine"]),
        display: PLAIN,
    },
    LearnerProfile {
        key: "mathematical",
        label: "The Mathematical Learner",
        description: "Loves patterns, root systems, morphological logic.",
        injection_level: 90,
        active_clusters: ClusterSelection::All,
        display: DisplayOptions {
            word_spacing: 150,
            translation_opacity: 60,
            heatmap: true,
            show_morpheme_split: true,
            ..PLAIN
        },
    },
    LearnerProfile {
        key: "visual",
        label: "The Visual Learner",
        description: "Remembers by spatial position, colour, and shape.",
        injection_level: 50,
        active_clusters: ClusterSelection::Listed(&[
            "salah_essentials",
            "divine",
            "heart",
            "nature",
        ]),
        display: DisplayOptions {
            word_spacing: 180,
            translation_opacity: 80,
            heatmap: true,
            color_pos: true,
            ..PLAIN
        },
    },
    LearnerProfile {
        key: "scaffolded",
        label: "The Scaffolded Learner",
        description: "Easily overwhelmed. Prefers gradual, low-pressure exposure.",
        injection_level: 10,
        active_clusters: ClusterSelection::Listed(&["salah_essentials"]),
        display: PLAIN,
    },
    LearnerProfile {
        key: "memoriser",
        label: "The Memoriser",
        description: "Active recall and structural anchoring for Hifz.",
        injection_level: 75,
        active_clusters: ClusterSelection::All,
        display: DisplayOptions { translation_opacity: 15, hifz_ghost: true, ..PLAIN },
    },
    LearnerProfile {
        key: "researcher",
        label: "The Researcher",
        description: "Wants data, cross-references, and full corpus access.",
        injection_level: 100,
        active_clusters: ClusterSelection::All,
        display: DisplayOptions {
            heatmap: true,
            color_pos: true,
            show_morpheme_split: true,
            ..PLAIN
        },
    },
    LearnerProfile {
        key: "busy_parent",
        label: "The Busy Parent",
        description: "Limited time. Immediate Salah impact only.",
        injection_level: 10,
        active_clusters: ClusterSelection::Listed(&["salah_essentials"]),
        display: PLAIN,
    },
];

pub fn learner_profile(key: &str) -> Option<&'static LearnerProfile> {
    LEARNER_PROFILES.iter().find(|p| p.key == key)
}

fn resolve(level: u8, clusters: &ClusterSelection, dictionary: &Dictionary) -> InjectionSettings {
    InjectionSettings {
        injection_level: level,
        active_clusters: clusters.resolve(dictionary),
        known_threshold: DEFAULT_KNOWN_THRESHOLD,
        whats_left_mode: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_falls_back_to_tilawah() {
        assert_eq!(reading_level("nonsense").key, "tilawah");
        assert_eq!(reading_level("HIFZ").key, "hifz");
    }

    #[test]
    fn level_settings_expand_all_clusters() {
        let dict = Dictionary::embedded().unwrap();
        let settings = reading_level("alim").settings(&dict);
        assert_eq!(settings.injection_level, 100);
        assert_eq!(settings.active_clusters.len(), dict.clusters().len());

        let qaida = reading_level("qaida").settings(&dict);
        assert!(qaida.active_clusters.is_empty());
        assert!(!reading_level("qaida").display.show_translation);
    }

    #[test]
    fn profile_lookup() {
        let dict = Dictionary::embedded().unwrap();
        let parent = learner_profile("busy_parent").unwrap();
        let settings = parent.settings(&dict);
        assert_eq!(settings.injection_level, 10);
        assert!(settings.active_clusters.contains("salah_essentials"));
        assert!(learner_profile("nobody").is_none());
    }

    #[test]
    fn levels_serialise_cluster_selection() {
        let json = serde_json::to_value(reading_level("sarf")).unwrap();
        assert_eq!(json["active_clusters"], "all");
        let json = serde_json::to_value(reading_level("tilawah")).unwrap();
        assert_eq!(json["active_clusters"], serde_json::json!(["salah_essentials"]));
    }
}
