//! Core, format-agnostic types for tmcodec.
//! Format adapters decode into these; encoders serialize these.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Language assumed for the source side when nothing else says otherwise.
pub const DEFAULT_SOURCE_LANG: &str = "en";

/// Timestamp layout used for `created`, e.g. `2024-05-01T09:30:12.000451`.
const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current local time in the layout stored on new units.
pub fn now_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format(CREATED_FORMAT)
        .to_string()
}

/// One source/target segment pair plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationUnit {
    /// Source text.
    pub source: String,

    /// Target text; empty means untranslated.
    #[serde(default)]
    pub target: String,

    /// Source language code (e.g. "en").
    pub source_lang: String,

    /// Target language code; empty when there is no target.
    #[serde(default)]
    pub target_lang: String,

    /// ISO-8601 creation timestamp.
    #[serde(default)]
    pub created: String,

    /// Free-form project tag. Stored as the TMX `tuid`.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub project: String,

    /// Free-form note for translators.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub note: String,
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self {
            source: String::new(),
            target: String::new(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: String::new(),
            created: now_timestamp(),
            project: String::new(),
            note: String::new(),
        }
    }
}

impl TranslationUnit {
    /// Creates a unit stamped with the current time.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            ..Self::default()
        }
    }

    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = created.into();
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Whether the unit carries a non-empty target.
    pub fn is_translated(&self) -> bool {
        !self.target.is_empty()
    }

    /// The identity used when deduplicating units.
    ///
    /// `created`, `project` and `note` are deliberately left out: two units
    /// with the same text in the same languages are the same unit.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            source: self.source.clone(),
            target: self.target.clone(),
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
        }
    }
}

impl Display for TranslationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} -> {}] {} => {}",
            self.source_lang, self.target_lang, self.source, self.target
        )
    }
}

/// `(source, target, source_lang, target_lang)`; see [`TranslationUnit::dedup_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub source: String,
    pub target: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// A search result: the unit, where it sits in the store, and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub index: usize,
    pub unit: &'a TranslationUnit,
    pub score: f64,
}

/// Summary of a store's contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total_units: usize,
    pub translated_units: usize,
    pub languages: Vec<String>,
    pub language_pairs: Vec<(String, String)>,
    pub projects: Vec<String>,
}
