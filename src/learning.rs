// File: src/learning.rs
use crate::core::dictionary::Dictionary;
use crate::core::types::FamiliarityStore;
use crate::error::Result;
use crate::persistence::{FamiliarityStorage, JsonFileStorage, MemoryStorage};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::path::Path;

/// Exposure count at which a word counts as known.
pub const KNOWN_THRESHOLD: u64 = 50;

/// Owns the familiarity store's persistence. Every load -> mutate -> persist
/// cycle runs inside a [`TrackerSession`], so at most one writer touches the
/// storage at a time.
pub struct ExposureTracker {
    storage: Box<dyn FamiliarityStorage>,
    exposure_increment: u64,
    writer: Mutex<()>,
}

impl ExposureTracker {
    pub fn new(storage: impl FamiliarityStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            exposure_increment: 1,
            writer: Mutex::new(()),
        }
    }

    pub fn with_file(path: &Path) -> Self {
        Self::new(JsonFileStorage::new(path))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Blocks until no other writer holds the storage.
    pub fn session(&self) -> TrackerSession<'_> {
        TrackerSession { tracker: self, _guard: self.writer.lock() }
    }

    /// Snapshot of the persisted store. Mutations go through [`session`](Self::session)
    /// so the load they start from cannot go stale.
    pub fn load(&self) -> FamiliarityStore {
        self.session().load()
    }

    pub fn reset(&self) -> Result<FamiliarityStore> {
        self.session().reset()
    }
}

/// Exclusive access to the tracker's storage for the lifetime of the value.
pub struct TrackerSession<'a> {
    tracker: &'a ExposureTracker,
    _guard: MutexGuard<'a, ()>,
}

impl TrackerSession<'_> {
    /// Current persisted state. Missing storage gives an empty store; so does
    /// unreadable storage, with a warning, since tracking is secondary to rendering.
    pub fn load(&self) -> FamiliarityStore {
        match self.tracker.storage.load() {
            Ok(Some(store)) => store,
            Ok(None) => FamiliarityStore::new(),
            Err(e) => {
                log::warn!("Familiarity store unreadable, starting empty: {e}");
                FamiliarityStore::new()
            }
        }
    }

    /// Adds one exposure per non-null key, duplicates included, then persists.
    pub fn record_exposure<I, S>(&self, store: &mut FamiliarityStore, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut recorded = 0usize;
        for key in keys.into_iter().flatten() {
            store.increment(key.as_ref(), self.tracker.exposure_increment);
            recorded += 1;
        }
        log::debug!("Recorded {recorded} exposures");
        self.tracker.storage.save(store)
    }

    pub fn mark_known(&self, store: &mut FamiliarityStore, key: &str) -> Result<()> {
        store.set(key, KNOWN_THRESHOLD);
        self.tracker.storage.save(store)
    }

    pub fn mark_unknown(&self, store: &mut FamiliarityStore, key: &str) -> Result<()> {
        store.set(key, 0);
        self.tracker.storage.save(store)
    }

    /// Drops all stored exposure data. Nothing is written afterwards.
    pub fn reset(&self) -> Result<FamiliarityStore> {
        self.tracker.storage.remove()?;
        log::info!("Familiarity data reset");
        Ok(FamiliarityStore::new())
    }
}

/// Learner progress over the dictionary's key set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamiliarityStats {
    pub total_words: usize,
    pub seen: usize,
    pub known: usize,
    pub unseen: usize,
    pub pct_seen: f64,
    pub pct_known: f64,
}

impl FamiliarityStats {
    /// Keys in the store that the dictionary does not know are ignored.
    pub fn compute(store: &FamiliarityStore, dictionary: &Dictionary) -> Self {
        let total_words = dictionary.len();
        let (seen, known) = dictionary.entries().fold((0, 0), |(seen, known), entry| {
            let score = store.score(&entry.arabic);
            (
                seen + usize::from(score > 0),
                known + usize::from(score >= KNOWN_THRESHOLD),
            )
        });
        Self {
            total_words,
            seen,
            known,
            unseen: total_words - seen,
            pct_seen: percentage(seen, total_words),
            pct_known: percentage(known, total_words),
        }
    }
}

/// One decimal place; 0 for an empty dictionary.
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dictionary::tests::{cluster, word};

    fn dictionary() -> Dictionary {
        Dictionary::from_parts(
            vec![cluster("divine")],
            vec![
                word("w1", "r1", 1, 100, "divine"),
                word("w2", "r2", 2, 50, "divine"),
                word("w3", "r3", 3, 10, "divine"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn record_counts_duplicates() {
        let tracker = ExposureTracker::in_memory();
        let session = tracker.session();
        let mut store = session.load();
        session
            .record_exposure(&mut store, [Some("w1"), Some("w1"), None, Some("w2")])
            .unwrap();
        drop(session);
        let expected: FamiliarityStore = [("w1", 2), ("w2", 1)].into_iter().collect();
        assert_eq!(store, expected);
        assert_eq!(tracker.load(), expected);
    }

    #[test]
    fn record_is_additive() {
        let tracker = ExposureTracker::in_memory();
        let session = tracker.session();
        let mut store = session.load();
        session.record_exposure(&mut store, [Some("w1")]).unwrap();
        session.record_exposure(&mut store, [Some("w1"), Some("w3")]).unwrap();
        assert_eq!(store.score("w1"), 2);
        assert_eq!(store.score("w3"), 1);
    }

    #[test]
    fn mark_known_adds_exactly_one_known_word() {
        let dict = dictionary();
        let tracker = ExposureTracker::in_memory();
        let session = tracker.session();
        let mut store = session.load();
        session.record_exposure(&mut store, [Some("w2")]).unwrap();
        let before = FamiliarityStats::compute(&store, &dict);

        session.mark_known(&mut store, "w2").unwrap();
        let after = FamiliarityStats::compute(&store, &dict);
        assert_eq!(after.known, before.known + 1);
        assert_eq!(store.score("w2"), KNOWN_THRESHOLD);

        session.mark_known(&mut store, "w2").unwrap();
        assert_eq!(FamiliarityStats::compute(&store, &dict), after);
    }

    #[test]
    fn mark_unknown_zeroes_the_count() {
        let tracker = ExposureTracker::in_memory();
        let mut store: FamiliarityStore = [("w1", 80)].into_iter().collect();
        {
            let session = tracker.session();
            session.mark_unknown(&mut store, "w1").unwrap();
            session.mark_unknown(&mut store, "w1").unwrap();
        }
        assert_eq!(store.score("w1"), 0);
        assert_eq!(tracker.load().score("w1"), 0);
    }

    #[test]
    fn reset_then_load_is_empty() {
        let tracker = ExposureTracker::in_memory();
        {
            let session = tracker.session();
            let mut store = session.load();
            session.record_exposure(&mut store, [Some("w1")]).unwrap();
        }
        assert!(tracker.reset().unwrap().is_empty());
        assert!(tracker.load().is_empty());
    }

    #[test]
    fn session_holds_the_writer_lock() {
        let tracker = ExposureTracker::in_memory();
        let session = tracker.session();
        assert!(tracker.writer.try_lock().is_none());
        drop(session);
        assert!(tracker.writer.try_lock().is_some());
    }

    #[test]
    fn stats_cover_dictionary_keys_only() {
        let dict = dictionary();
        let store: FamiliarityStore =
            [("w1", 60), ("w2", 3), ("stray", 900)].into_iter().collect();
        let stats = FamiliarityStats::compute(&store, &dict);
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.seen, 2);
        assert_eq!(stats.known, 1);
        assert_eq!(stats.unseen, 1);
        assert_eq!(stats.pct_seen, 66.7);
        assert_eq!(stats.pct_known, 33.3);
    }

    #[test]
    fn stats_on_empty_dictionary() {
        let dict = Dictionary::from_parts(vec![], vec![]).unwrap();
        let stats = FamiliarityStats::compute(&FamiliarityStore::new(), &dict);
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.pct_seen, 0.0);
        assert_eq!(stats.pct_known, 0.0);
    }
}
