//! This module provides [`TmStore`], an in-memory translation memory backed
//! by a TMX file.
//!
//! Units are kept in insertion order and addressed by index. The store
//! tracks whether it has unsaved changes: every mutation sets the flag, and
//! a successful load or save clears it. Persisting is always explicit.
//!
//! A store is meant for one caller at a time. Callers that share one across
//! threads must serialize access themselves, and [`TmStore::search`], the
//! most expensive operation, has no cancellation.
//!
use std::{
    collections::{BTreeSet, HashSet},
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use crate::{
    adapters,
    error::Error,
    formats::TmxFormat,
    options::{FilterCriteria, ImportOptions},
    similarity,
    traits::{Decode, Encode},
    types::{DEFAULT_SOURCE_LANG, DedupKey, SearchHit, Stats, TranslationUnit},
};

/// Threshold used by callers that have no preference.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// An ordered collection of translation units with load/save/search/merge.
#[derive(Debug, Clone, PartialEq)]
pub struct TmStore {
    units: Vec<TranslationUnit>,
    source_lang: String,
    path: Option<PathBuf>,
    modified: bool,
}

impl Default for TmStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TmStore {
    /// Creates a new, empty store with `en` as its source language.
    pub fn new() -> Self {
        TmStore {
            units: Vec::new(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            path: None,
            modified: false,
        }
    }

    /// Opens the memory at `path`.
    ///
    /// If the file does not exist yet the store starts empty but remembers
    /// `path`, so a later [`TmStore::save`] without an argument creates it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut store = TmStore::new();
        if path.exists() {
            store.load(path)?;
        } else {
            store.path = Some(path.to_path_buf());
        }
        Ok(store)
    }

    /// Replaces the contents with the TMX document at `path`.
    ///
    /// On error the store is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let document = TmxFormat::read_from(path)?;
        self.apply_document(document);
        self.path = Some(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            units = self.units.len(),
            source_lang = %self.source_lang,
            "loaded translation memory"
        );
        Ok(())
    }

    /// Replaces the contents with a TMX document read from `reader`.
    ///
    /// The remembered path is kept as it was.
    pub fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<(), Error> {
        let document = TmxFormat::from_reader(reader)?;
        self.apply_document(document);
        Ok(())
    }

    fn apply_document(&mut self, document: TmxFormat) {
        if let Some(srclang) = document.declared_source_lang() {
            self.source_lang = srclang.to_string();
        }
        self.units = document.to_units(&self.source_lang);
        self.modified = false;
    }

    /// Writes the memory as TMX to `path`, or to the remembered path.
    ///
    /// Fails with [`Error::Configuration`] when neither is available. On
    /// success `path` becomes the remembered path and the store is clean.
    pub fn save(&mut self, path: Option<&Path>) -> Result<(), Error> {
        let target = path
            .map(Path::to_path_buf)
            .or_else(|| self.path.clone())
            .ok_or_else(|| {
                Error::Configuration("no path specified for saving the memory".to_string())
            })?;

        self.to_document().write_to(&target)?;
        tracing::debug!(path = %target.display(), units = self.units.len(), "saved translation memory");

        self.path = Some(target);
        self.modified = false;
        Ok(())
    }

    /// Writes the memory as TMX to `writer` without touching the dirty flag.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), Error> {
        self.to_document().to_writer(writer)
    }

    fn to_document(&self) -> TmxFormat {
        TmxFormat::from_units(&self.units, &self.source_lang)
    }

    /// Fuzzy search over source and target texts.
    ///
    /// A unit scores the better of its source and target similarity to
    /// `query`; units scoring at least `threshold` are returned best first.
    /// Equal scores keep store order. `threshold` must lie in `(0, 1]`.
    pub fn search(&self, query: &str, threshold: f64) -> Result<Vec<SearchHit<'_>>, Error> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::validation_error(format!(
                "search threshold must be in (0, 1], got {threshold}"
            )));
        }

        let mut hits: Vec<SearchHit> = self
            .units
            .iter()
            .enumerate()
            .filter_map(|(index, unit)| {
                let score = similarity::ratio(query, &unit.source)
                    .max(similarity::ratio(query, &unit.target));
                (score >= threshold).then_some(SearchHit { index, unit, score })
            })
            .collect();

        // stable: ties stay in store order
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(hits)
    }

    /// Units matching every supplied criterion, in store order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&TranslationUnit> {
        criteria.apply(&self.units)
    }

    /// Appends the units of `other` that this store does not already hold.
    ///
    /// Duplicates are decided by [`TranslationUnit::dedup_key`] only; near
    /// matches are added and existing units are never rewritten. Returns the
    /// number of units added.
    pub fn merge(&mut self, other: &TmStore) -> usize {
        let added = self.append_new(other.units.iter().cloned());
        tracing::debug!(added, skipped = other.units.len() - added, "merged translation memory");
        added
    }

    /// Appends every unit from `units`, duplicates included.
    ///
    /// Returns how many were appended.
    pub fn import_units<I: IntoIterator<Item = TranslationUnit>>(&mut self, units: I) -> usize {
        let before = self.units.len();
        self.units.extend(units);
        let added = self.units.len() - before;
        if added > 0 {
            self.modified = true;
        }
        added
    }

    /// Imports a PO, XLIFF or Qt TS file, chosen by extension, and appends
    /// its units.
    pub fn import_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        options: &ImportOptions,
    ) -> Result<usize, Error> {
        let units = adapters::import_file(path, options)?;
        Ok(self.import_units(units))
    }

    /// Exports all units as a `.po` catalog.
    pub fn export_po<P: AsRef<Path>>(&self, path: P, target_lang: &str) -> Result<(), Error> {
        adapters::export_po(&self.units, path, target_lang)
    }

    fn append_new<I: IntoIterator<Item = TranslationUnit>>(&mut self, units: I) -> usize {
        let mut existing: HashSet<DedupKey> =
            self.units.iter().map(TranslationUnit::dedup_key).collect();
        let mut added = 0;
        for unit in units {
            if existing.insert(unit.dedup_key()) {
                self.units.push(unit);
                added += 1;
            }
        }
        if added > 0 {
            self.modified = true;
        }
        added
    }

    /// Appends a unit.
    pub fn add_unit(&mut self, unit: TranslationUnit) {
        self.units.push(unit);
        self.modified = true;
    }

    /// Removes the unit at `index`.
    ///
    /// An index past the end is ignored and returns `None`; removing from a
    /// list the caller rendered a moment ago should not fail because the
    /// list changed underneath it.
    pub fn remove_unit(&mut self, index: usize) -> Option<TranslationUnit> {
        if index >= self.units.len() {
            return None;
        }
        self.modified = true;
        Some(self.units.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&TranslationUnit> {
        self.units.get(index)
    }

    /// Mutable access to the unit at `index`. Marks the store modified.
    ///
    /// Edited units are not re-validated.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut TranslationUnit> {
        let unit = self.units.get_mut(index)?;
        self.modified = true;
        Some(unit)
    }

    pub fn units(&self) -> &[TranslationUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranslationUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Default source language, written to the TMX header on save.
    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn set_source_lang(&mut self, lang: impl Into<String>) {
        self.source_lang = lang.into();
        self.modified = true;
    }

    /// Where the store was last loaded from or saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether there are changes since the last load or save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Sorted language codes used on either side of any unit.
    pub fn languages(&self) -> Vec<String> {
        let langs: BTreeSet<&str> = self
            .units
            .iter()
            .flat_map(|u| [u.source_lang.as_str(), u.target_lang.as_str()])
            .filter(|l| !l.is_empty())
            .collect();
        langs.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct `(source_lang, target_lang)` pairs where both are set.
    pub fn language_pairs(&self) -> Vec<(String, String)> {
        let pairs: BTreeSet<(&str, &str)> = self
            .units
            .iter()
            .filter(|u| !u.source_lang.is_empty() && !u.target_lang.is_empty())
            .map(|u| (u.source_lang.as_str(), u.target_lang.as_str()))
            .collect();
        pairs
            .into_iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect()
    }

    /// Sorted distinct non-empty project tags.
    pub fn projects(&self) -> Vec<String> {
        let projects: BTreeSet<&str> = self
            .units
            .iter()
            .map(|u| u.project.as_str())
            .filter(|p| !p.is_empty())
            .collect();
        projects.into_iter().map(str::to_string).collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_units: self.units.len(),
            translated_units: self.units.iter().filter(|u| u.is_translated()).count(),
            languages: self.languages(),
            language_pairs: self.language_pairs(),
            projects: self.projects(),
        }
    }
}

impl<'a> IntoIterator for &'a TmStore {
    type Item = &'a TranslationUnit;
    type IntoIter = std::slice::Iter<'a, TranslationUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str, target: &str, src: &str, tgt: &str) -> TranslationUnit {
        TranslationUnit::new(source, target, src, tgt)
    }

    fn store_with(units: Vec<TranslationUnit>) -> TmStore {
        let mut store = TmStore::new();
        store.import_units(units);
        store
    }

    #[test]
    fn test_new_store_is_clean() {
        let store = TmStore::new();
        assert!(store.is_empty());
        assert_eq!(store.source_lang(), "en");
        assert!(store.path().is_none());
        assert!(!store.is_modified());
    }

    #[test]
    fn test_add_and_remove_mark_modified() {
        let mut store = TmStore::new();
        store.add_unit(unit("Hello", "Hej", "en", "sv"));
        assert!(store.is_modified());
        assert_eq!(store.len(), 1);

        store.modified = false;
        let removed = store.remove_unit(0).unwrap();
        assert_eq!(removed.target, "Hej");
        assert!(store.is_modified());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut store = store_with(vec![unit("Hello", "Hej", "en", "sv")]);
        store.modified = false;
        assert!(store.remove_unit(1).is_none());
        assert!(store.remove_unit(usize::MAX).is_none());
        assert_eq!(store.len(), 1);
        assert!(!store.is_modified());
    }

    #[test]
    fn test_get_mut_marks_modified() {
        let mut store = store_with(vec![unit("Hello", "", "en", "")]);
        store.modified = false;
        store.get_mut(0).unwrap().target = "Hej".to_string();
        assert!(store.is_modified());
        assert!(store.get_mut(5).is_none());
        assert_eq!(store.get(0).unwrap().target, "Hej");
    }

    #[test]
    fn test_load_multi_language_record() {
        let xml = r#"<tmx version="1.4"><header srclang="en"/><body>
            <tu><tuv xml:lang="en"><seg>Hello</seg></tuv><tuv xml:lang="sv"><seg>Hej</seg></tuv><tuv xml:lang="fr"><seg>Bonjour</seg></tuv></tu>
        </body></tmx>"#;
        let mut store = TmStore::new();
        store.add_unit(unit("stale", "", "en", ""));
        store.load_from_reader(xml.as_bytes()).unwrap();

        assert!(!store.is_modified());
        let pairs: Vec<_> = store
            .iter()
            .map(|u| (u.source.as_str(), u.target.as_str(), u.target_lang.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Hello", "Hej", "sv"), ("Hello", "Bonjour", "fr")]);
    }

    #[test]
    fn test_load_without_srclang_keeps_previous_default() {
        let xml = r#"<tmx><header/><body>
            <tu><tuv xml:lang="sv"><seg>Hej</seg></tuv><tuv xml:lang="de"><seg>Hallo</seg></tuv></tu>
        </body></tmx>"#;
        let mut store = TmStore::new();
        store.source_lang = "de".to_string();
        store.load_from_reader(xml.as_bytes()).unwrap();
        assert_eq!(store.source_lang(), "de");
        assert_eq!(store.get(0).unwrap().source, "Hallo");
        assert_eq!(store.get(0).unwrap().target_lang, "sv");
    }

    #[test]
    fn test_failed_load_leaves_store_untouched() {
        let mut store = store_with(vec![unit("Hello", "Hej", "en", "sv")]);
        let err = store.load_from_reader("<tmx><body>".as_bytes()).unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(store.len(), 1);
        assert!(store.is_modified());
    }

    #[test]
    fn test_save_without_path_is_configuration_error() {
        let mut store = store_with(vec![unit("Hello", "Hej", "en", "sv")]);
        let err = store.save(None).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(store.is_modified());
    }

    #[test]
    fn test_search_orders_by_score_then_store_order() {
        let store = store_with(vec![
            unit("Hello world", "Hej världen", "en", "sv"),
            unit("Open file", "Öppna fil", "en", "sv"),
            unit("hello world", "", "en", ""),
            unit("Hello", "Hej", "en", "sv"),
        ]);
        let hits = store.search("Hello World", 0.6).unwrap();
        let indices: Vec<_> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(hits[0].score, 1.0);
        assert_eq!(hits[1].score, 1.0);
        assert!(hits[2].score < 1.0);
    }

    #[test]
    fn test_search_matches_target_text() {
        let store = store_with(vec![unit("Cancel", "Avbryt", "en", "sv")]);
        let hits = store.search("avbryt", 0.9).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 1.0);
    }

    #[test]
    fn test_search_ignores_query_case() {
        let store = store_with(vec![unit("öppna fil", "", "sv", "")]);
        let hits = store.search("ÖPPNA FIL", 1.0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 1.0);
    }

    #[test]
    fn test_search_rejects_bad_threshold() {
        let store = TmStore::new();
        assert!(store.search("x", 0.0).is_err());
        assert!(store.search("x", 1.5).is_err());
        assert!(store.search("x", f64::NAN).is_err());
        assert!(store.search("x", 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_merge_skips_duplicates() {
        let mut a = store_with(vec![
            unit("Hello", "Hej", "en", "sv"),
            unit("Bye", "Hej då", "en", "sv"),
        ]);
        let b = store_with(vec![
            unit("Hello", "Hej", "en", "sv").with_note("from b"),
            unit("Yes", "Ja", "en", "sv"),
            unit("No", "Nej", "en", "sv"),
        ]);
        a.modified = false;

        assert_eq!(a.merge(&b), 2);
        assert_eq!(a.len(), 4);
        assert!(a.is_modified());
        assert!(a.get(0).unwrap().note.is_empty());
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_merge_with_nothing_new_stays_clean() {
        let mut a = store_with(vec![unit("Hello", "Hej", "en", "sv")]);
        let b = a.clone();
        a.modified = false;
        assert_eq!(a.merge(&b), 0);
        assert!(!a.is_modified());
    }

    #[test]
    fn test_merge_dedups_within_other() {
        let mut a = TmStore::new();
        let b = store_with(vec![
            unit("Hello", "Hej", "en", "sv"),
            unit("Hello", "Hej", "en", "sv"),
        ]);
        assert_eq!(a.merge(&b), 1);
    }

    #[test]
    fn test_derived_views() {
        let store = store_with(vec![
            unit("Hello", "Hej", "en", "sv").with_project("web"),
            unit("Hello", "Hallo", "en", "de").with_project("app"),
            unit("Hej", "", "sv", "").with_project("web"),
            unit("Salut", "Hi", "fr", "en"),
        ]);
        assert_eq!(store.languages(), vec!["de", "en", "fr", "sv"]);
        assert_eq!(
            store.language_pairs(),
            vec![
                ("en".to_string(), "de".to_string()),
                ("en".to_string(), "sv".to_string()),
                ("fr".to_string(), "en".to_string()),
            ]
        );
        let stats = store.stats();
        assert_eq!(stats.total_units, 4);
        assert_eq!(stats.translated_units, 3);
        assert_eq!(stats.projects, vec!["app", "web"]);
    }

    #[test]
    fn test_filter_does_not_mutate() {
        let store = store_with(vec![
            unit("Hello", "Hej", "en", "sv"),
            unit("Hello", "Hallo", "en", "de"),
        ]);
        let hits = store.filter(&FilterCriteria::new().with_target_lang("de"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, "Hallo");
        assert_eq!(store.len(), 2);
    }
}
