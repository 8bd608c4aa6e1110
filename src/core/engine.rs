use crate::config::{InjectionSettings, LabConfig};
use crate::core::band::{frequency_band, heatmap_class};
use crate::core::dictionary::Dictionary;
use crate::core::morph::{explode_word, Segment};
use crate::core::render::{exposure_keys, render_verse};
use crate::core::types::{FamiliarityStore, WordEntry, WordRender};
use crate::corpus::{CorpusProvider, JsonCorpus, Surah, SurahSummary};
use crate::error::{LabError, Result};
use crate::learning::{ExposureTracker, FamiliarityStats, TrackerSession};
use crate::query::{self, ExportFilter};
use serde::Serialize;

const SALAH_CLUSTER: &str = "salah_essentials";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurahMeta {
    pub number: u32,
    pub name_ar: String,
    pub name_en: String,
    pub name_tr: String,
    pub description: String,
}

impl From<&Surah> for SurahMeta {
    fn from(surah: &Surah) -> Self {
        Self {
            number: surah.number,
            name_ar: surah.name_ar.clone(),
            name_en: surah.name_en.clone(),
            name_tr: surah.name_tr.clone(),
            description: surah.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedVerse {
    pub number: u32,
    pub arabic: String,
    pub english: String,
    pub words: Vec<WordRender>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSurah {
    pub surah: SurahMeta,
    pub verses: Vec<RenderedVerse>,
    pub familiarity: FamiliarityStore,
    pub stats: FamiliarityStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookVerse {
    pub number: u32,
    pub words: Vec<WordRender>,
}

/// Flowing hybrid-text variant of a render, without verse-level text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    pub surah: SurahMeta,
    pub verses: Vec<BookVerse>,
    pub familiarity: FamiliarityStore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordDetail<'a> {
    #[serde(flatten)]
    pub entry: &'a WordEntry,
    pub root_family: &'a [String],
    pub root_family_details: Vec<&'a WordEntry>,
    pub freq_band: String,
    pub exploded: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamiliarityOverview {
    pub familiarity: FamiliarityStore,
    pub stats: FamiliarityStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetWord<'a> {
    #[serde(flatten)]
    pub entry: &'a WordEntry,
    pub familiarity: u64,
}

/// Printable list of the prayer vocabulary with the learner's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalahSheet<'a> {
    pub cluster: &'static str,
    pub words: Vec<SheetWord<'a>>,
}

/// The lab: dictionary, corpus and exposure tracker wired together.
pub struct QuranLab {
    dictionary: Dictionary,
    corpus: Box<dyn CorpusProvider>,
    tracker: ExposureTracker,
}

impl QuranLab {
    pub fn new(
        dictionary: Dictionary,
        corpus: impl CorpusProvider + 'static,
        tracker: ExposureTracker,
    ) -> Self {
        Self { dictionary, corpus: Box::new(corpus), tracker }
    }

    /// Loads data sources named by `config`, falling back to the bundled ones.
    pub fn from_config(config: &LabConfig) -> Result<Self> {
        let dictionary = match &config.dictionary_path {
            Some(path) => Dictionary::from_path(path)?,
            None => Dictionary::embedded()?,
        };
        let corpus = match &config.corpus_path {
            Some(path) => JsonCorpus::from_path(path)?,
            None => JsonCorpus::embedded()?,
        };
        log::info!(
            "Lab ready: {} words, {} surahs, familiarity at {}",
            dictionary.len(),
            corpus.surahs().len(),
            config.familiarity_path.display()
        );
        Ok(Self::new(dictionary, corpus, ExposureTracker::with_file(&config.familiarity_path)))
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn tracker(&self) -> &ExposureTracker {
        &self.tracker
    }

    pub fn surahs(&self) -> Vec<SurahSummary> {
        self.corpus.surahs()
    }

    pub fn surah(&self, number: u32) -> Result<&Surah> {
        self.corpus
            .surah(number)
            .ok_or_else(|| LabError::not_found(format!("surah {number}")))
    }

    /// Renders every verse of a surah and silently records one exposure per
    /// linked word shown. `familiarity` is the client's copy; `None` loads the
    /// persisted store.
    pub fn render(
        &self,
        number: u32,
        settings: &InjectionSettings,
        familiarity: Option<FamiliarityStore>,
    ) -> Result<RenderedSurah> {
        let surah = self.surah(number)?;
        let session = self.tracker.session();
        let mut store = familiarity.unwrap_or_else(|| session.load());

        let verses: Vec<RenderedVerse> = surah
            .verses
            .iter()
            .map(|verse| RenderedVerse {
                number: verse.number,
                arabic: verse.arabic.clone(),
                english: verse.english.clone(),
                words: render_verse(&self.dictionary, verse, settings, &store),
            })
            .collect();

        let keys = exposure_keys(verses.iter().flat_map(|v| v.words.iter()));
        record_silently(&session, &mut store, keys);

        let stats = FamiliarityStats::compute(&store, &self.dictionary);
        Ok(RenderedSurah { surah: SurahMeta::from(surah), verses, familiarity: store, stats })
    }

    /// Renders one verse (zero-based `index`) and records only its exposures.
    /// `None` once `index` is past the last verse.
    pub fn render_single(
        &self,
        number: u32,
        index: usize,
        settings: &InjectionSettings,
    ) -> Result<Option<RenderedVerse>> {
        let surah = self.surah(number)?;
        let Some(verse) = surah.verses.get(index) else {
            return Ok(None);
        };
        let session = self.tracker.session();
        let mut store = session.load();

        let rendered = RenderedVerse {
            number: verse.number,
            arabic: verse.arabic.clone(),
            english: verse.english.clone(),
            words: render_verse(&self.dictionary, verse, settings, &store),
        };
        record_silently(&session, &mut store, exposure_keys(&rendered.words));
        Ok(Some(rendered))
    }

    /// Same as [`render`](Self::render) but shaped for the book view.
    pub fn book_view(
        &self,
        number: u32,
        settings: &InjectionSettings,
        familiarity: Option<FamiliarityStore>,
    ) -> Result<BookView> {
        let surah = self.surah(number)?;
        let session = self.tracker.session();
        let mut store = familiarity.unwrap_or_else(|| session.load());

        let verses: Vec<BookVerse> = surah
            .verses
            .iter()
            .map(|verse| BookVerse {
                number: verse.number,
                words: render_verse(&self.dictionary, verse, settings, &store),
            })
            .collect();

        let keys = exposure_keys(verses.iter().flat_map(|v| v.words.iter()));
        record_silently(&session, &mut store, keys);

        Ok(BookView { surah: SurahMeta::from(surah), verses, familiarity: store })
    }

    pub fn word(&self, key: &str) -> Result<&WordEntry> {
        self.dictionary
            .get(key)
            .ok_or_else(|| LabError::not_found(format!("word '{key}'")))
    }

    pub fn word_detail(&self, key: &str) -> Result<WordDetail<'_>> {
        let entry = self.word(key)?;
        let root_family = self.dictionary.root_family(&entry.root);
        Ok(WordDetail {
            entry,
            root_family,
            root_family_details: query::root_family(&self.dictionary, &entry.root),
            freq_band: heatmap_class(frequency_band(entry.count)),
            exploded: explode_word(&entry.arabic),
        })
    }

    pub fn familiarity(&self) -> FamiliarityOverview {
        let familiarity = self.tracker.load();
        let stats = FamiliarityStats::compute(&familiarity, &self.dictionary);
        FamiliarityOverview { familiarity, stats }
    }

    pub fn mark_known(&self, key: &str) -> Result<FamiliarityStore> {
        self.check_markable(key)?;
        let session = self.tracker.session();
        let mut store = session.load();
        session.mark_known(&mut store, key)?;
        Ok(store)
    }

    pub fn mark_unknown(&self, key: &str) -> Result<FamiliarityStore> {
        self.check_markable(key)?;
        let session = self.tracker.session();
        let mut store = session.load();
        session.mark_unknown(&mut store, key)?;
        Ok(store)
    }

    pub fn reset_familiarity(&self) -> Result<FamiliarityStore> {
        self.tracker.reset()
    }

    pub fn export_csv(&self, filter: &ExportFilter) -> Result<String> {
        let familiarity = self.tracker.load();
        query::export_csv(&self.dictionary, filter, &familiarity)
    }

    pub fn salah_sheet(&self) -> SalahSheet<'_> {
        let familiarity = self.tracker.load();
        let words = self
            .dictionary
            .words_in_cluster(SALAH_CLUSTER)
            .map(|entry| SheetWord { entry, familiarity: familiarity.score(&entry.arabic) })
            .collect();
        SalahSheet { cluster: SALAH_CLUSTER, words }
    }

    fn check_markable(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(LabError::malformed("db_key is required"));
        }
        self.word(key).map(|_| ())
    }
}

/// Exposure tracking is secondary to rendering: a failed persist keeps the
/// in-memory counts and is only logged.
fn record_silently(session: &TrackerSession<'_>, store: &mut FamiliarityStore, keys: Vec<String>) {
    let count = keys.len();
    if let Err(e) = session.record_exposure(store, keys.into_iter().map(Some)) {
        log::warn!("Could not persist {count} exposures: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab() -> QuranLab {
        QuranLab::new(
            Dictionary::embedded().unwrap(),
            JsonCorpus::embedded().unwrap(),
            ExposureTracker::in_memory(),
        )
    }

    #[test]
    fn unknown_surah_is_not_found() {
        let lab = lab();
        let err = lab.render(999, &InjectionSettings::default(), None).unwrap_err();
        assert!(matches!(err, LabError::NotFound(_)));
        assert!(lab.book_view(2, &InjectionSettings::default(), None).is_err());
    }

    #[test]
    fn render_records_each_shown_word() {
        let lab = lab();
        let rendered = lab.render(1, &InjectionSettings::default(), None).unwrap();
        assert_eq!(rendered.verses.len(), 7);
        // "الله" appears in verses 1 and 2, "على" twice in verse 7
        assert_eq!(rendered.familiarity.score("الله"), 2);
        assert_eq!(rendered.familiarity.score("على"), 2);
        assert_eq!(lab.familiarity().familiarity, rendered.familiarity);

        let again = lab.render(1, &InjectionSettings::default(), None).unwrap();
        assert_eq!(again.familiarity.score("الله"), 4);
        assert_eq!(again.verses[0].words[1].familiarity_score, 2);
    }

    #[test]
    fn client_familiarity_is_used_when_given() {
        let lab = lab();
        let client: FamiliarityStore = [("الله", 49)].into_iter().collect();
        let view = lab.book_view(112, &InjectionSettings::default(), Some(client)).unwrap();
        assert_eq!(view.verses.len(), 4);
        assert!(!view.verses[0].words[2].is_known);
        // two occurrences in Al-Ikhlas: 1:3 and 2:1
        assert_eq!(view.familiarity.score("الله"), 51);
    }

    #[test]
    fn single_verse_records_only_that_verse() {
        let lab = lab();
        let verse = lab.render_single(1, 1, &InjectionSettings::default()).unwrap().unwrap();
        assert_eq!(verse.number, 2);
        assert_eq!(lab.familiarity().familiarity.score("الله"), 1);
        assert_eq!(lab.familiarity().familiarity.score("على"), 0);
        assert!(lab.render_single(1, 7, &InjectionSettings::default()).unwrap().is_none());
    }

    #[test]
    fn stats_follow_the_render() {
        let lab = lab();
        let rendered = lab.render(112, &InjectionSettings::default(), None).unwrap();
        assert_eq!(rendered.stats.total_words, lab.dictionary().len());
        assert_eq!(rendered.stats.seen, rendered.familiarity.len());
    }

    #[test]
    fn marking_requires_known_key() {
        let lab = lab();
        assert!(matches!(lab.mark_known(" "), Err(LabError::MalformedInput(_))));
        assert!(matches!(lab.mark_known("zzz"), Err(LabError::NotFound(_))));

        let before = lab.familiarity().stats.known;
        let store = lab.mark_known("رب").unwrap();
        assert_eq!(store.score("رب"), 50);
        assert_eq!(lab.familiarity().stats.known, before + 1);

        let store = lab.mark_unknown("رب").unwrap();
        assert_eq!(store.score("رب"), 0);
    }

    #[test]
    fn reset_clears_persisted_counts() {
        let lab = lab();
        lab.render(1, &InjectionSettings::default(), None).unwrap();
        assert!(lab.reset_familiarity().unwrap().is_empty());
        assert!(lab.familiarity().familiarity.is_empty());
    }

    #[test]
    fn word_detail_includes_family_and_split() {
        let lab = lab();
        let detail = lab.word_detail("الرحيم").unwrap();
        assert_eq!(detail.root_family.len(), 3);
        assert_eq!(detail.root_family_details.len(), 3);
        assert_eq!(detail.freq_band, "freq-3");
        assert!(!detail.exploded.is_empty());
        assert!(lab.word_detail("nothing").is_err());
    }

    #[test]
    fn salah_sheet_lists_prayer_words() {
        let lab = lab();
        lab.mark_known("رب").unwrap();
        let sheet = lab.salah_sheet();
        assert!(sheet.words.iter().all(|w| w.entry.cluster == SALAH_CLUSTER));
        let rabb = sheet.words.iter().find(|w| w.entry.arabic == "رب").unwrap();
        assert_eq!(rabb.familiarity, 50);
    }

    #[test]
    fn export_uses_persisted_scores() {
        let lab = lab();
        lab.mark_known("الله").unwrap();
        let csv_text = lab.export_csv(&ExportFilter::new(Some("divine"), None)).unwrap();
        assert!(csv_text.lines().nth(1).unwrap().ends_with(",50"));
    }
}
