// File: src/config.rs
use crate::core::types::FamiliarityStore;
use crate::error::{LabError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_INJECTION_LEVEL: u8 = 25;
pub const DEFAULT_KNOWN_THRESHOLD: u64 = 50;
pub const DEFAULT_FAMILIARITY_PATH: &str = "exports/familiarity.json";

/// Where the lab reads its data and keeps the learner's familiarity file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabConfig {
    pub familiarity_path: PathBuf,
    /// `None` uses the bundled dictionary.
    pub dictionary_path: Option<PathBuf>,
    /// `None` uses the bundled sample corpus.
    pub corpus_path: Option<PathBuf>,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            familiarity_path: PathBuf::from(DEFAULT_FAMILIARITY_PATH),
            dictionary_path: None,
            corpus_path: None,
        }
    }
}

impl LabConfig {
    /// Reads `QURAN_LAB_FAMILIARITY`, `QURAN_LAB_DICTIONARY` and `QURAN_LAB_CORPUS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = env_path("QURAN_LAB_FAMILIARITY") {
            config.familiarity_path = path;
        }
        config.dictionary_path = env_path("QURAN_LAB_DICTIONARY");
        config.corpus_path = env_path("QURAN_LAB_CORPUS");
        config
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Settings as they arrive from a client: every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsRequest {
    pub injection_level: Option<i64>,
    pub active_clusters: Option<Vec<String>>,
    pub known_threshold: Option<u64>,
    pub whats_left_mode: Option<bool>,
}

impl SettingsRequest {
    /// Fills every default in one place. Levels outside 0..=100 are clamped.
    pub fn resolve(&self) -> InjectionSettings {
        let injection_level = self
            .injection_level
            .map(|level| level.clamp(0, 100) as u8)
            .unwrap_or(DEFAULT_INJECTION_LEVEL);
        InjectionSettings {
            injection_level,
            active_clusters: self
                .active_clusters
                .iter()
                .flatten()
                .cloned()
                .collect(),
            known_threshold: self.known_threshold.unwrap_or(DEFAULT_KNOWN_THRESHOLD),
            whats_left_mode: self.whats_left_mode.unwrap_or(false),
        }
    }
}

/// Fully resolved per-request settings. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionSettings {
    pub injection_level: u8,
    pub active_clusters: BTreeSet<String>,
    pub known_threshold: u64,
    pub whats_left_mode: bool,
}

impl Default for InjectionSettings {
    fn default() -> Self {
        SettingsRequest::default().resolve()
    }
}

impl InjectionSettings {
    pub fn with_level(level: u8) -> Self {
        Self { injection_level: level.min(100), ..Self::default() }
    }

    pub fn with_clusters<I, S>(mut self, clusters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_clusters = clusters.into_iter().map(Into::into).collect();
        self
    }

    pub fn whats_left(mut self, enabled: bool) -> Self {
        self.whats_left_mode = enabled;
        self
    }
}

/// Body of a render or book-view request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    pub settings: SettingsRequest,
    /// Client-held familiarity; `None` means use the persisted store.
    pub familiarity: Option<FamiliarityStore>,
}

impl RenderRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Err(LabError::malformed("empty request body"));
        }
        serde_json::from_str(body).map_err(|e| LabError::malformed(e.to_string()))
    }
}
