// File: src/core/render.rs
use crate::config::InjectionSettings;
use crate::core::band::{frequency_band, RAREST_BAND};
use crate::core::dictionary::Dictionary;
use crate::core::injection::InjectionEngine;
use crate::core::types::{FamiliarityStore, Verse, WordRender};

/// Rank reported for words without a dictionary link.
pub const UNLINKED_RANK: u32 = 999;

/// Produces one render per word occurrence, in verse order. Pure: exposure
/// recording is left to the caller.
pub fn render_verse(
    dictionary: &Dictionary,
    verse: &Verse,
    settings: &InjectionSettings,
    familiarity: &FamiliarityStore,
) -> Vec<WordRender> {
    let engine = InjectionEngine::new(dictionary);

    verse
        .words
        .iter()
        .map(|word| {
            let db_key = word.db_key.as_deref();
            let entry = db_key.and_then(|key| dictionary.get(key));
            let familiarity_score = db_key.map(|key| familiarity.score(key)).unwrap_or(0);
            let is_known = familiarity_score >= settings.known_threshold;

            let mut show_arabic = engine.should_inject(db_key, settings);
            // What's-left mode collapses mastered words back to English.
            if settings.whats_left_mode && is_known {
                show_arabic = false;
            }

            WordRender {
                arabic: word.arabic.clone(),
                english: word.english.clone(),
                transliteration: word.transliteration.clone(),
                db_key: word.db_key.clone(),
                show_arabic,
                data: entry.cloned(),
                familiarity_score,
                freq_band: entry.map(|e| frequency_band(e.count)).unwrap_or(RAREST_BAND),
                root: entry.map(|e| e.root.clone()).unwrap_or_default(),
                cluster: entry.map(|e| e.cluster.clone()).unwrap_or_default(),
                pos: entry.map(|e| e.pos),
                rank: entry.map(|e| e.rank).unwrap_or(UNLINKED_RANK),
                count: entry.map(|e| e.count).unwrap_or(0),
                is_known,
            }
        })
        .collect()
}

/// Every non-null key shown, duplicates kept, ready for exposure recording.
pub fn exposure_keys<'a, I>(renders: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a WordRender>,
{
    renders
        .into_iter()
        .filter_map(|render| render.db_key.clone())
        .collect()
}
