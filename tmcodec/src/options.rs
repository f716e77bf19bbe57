//! Option structs for importing files and filtering a store.

use crate::types::{DEFAULT_SOURCE_LANG, TranslationUnit};

/// Language codes applied by importers whose format does not carry them.
///
/// Only PO catalogs use these; XLIFF and Qt TS files declare their own
/// languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: String::new(),
        }
    }
}

impl ImportOptions {
    /// Creates default import options (`en` source, no target language).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source language.
    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = source_lang.into();
        self
    }

    /// Sets the target language.
    pub fn with_target_lang(mut self, target_lang: impl Into<String>) -> Self {
        self.target_lang = target_lang.into();
        self
    }
}

/// Criteria for [`crate::TmStore::filter`].
///
/// Every supplied criterion narrows the result; `None` or empty values are
/// ignored. Dates are compared as ISO-8601 strings, which order
/// lexicographically, and both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Exact source language.
    pub source_lang: Option<String>,
    /// Exact target language.
    pub target_lang: Option<String>,
    /// Exact language on either side.
    pub language: Option<String>,
    /// Case-insensitive substring of the project tag.
    pub project: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_lang(mut self, lang: impl Into<String>) -> Self {
        self.source_lang = Some(lang.into());
        self
    }

    pub fn with_target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = Some(lang.into());
        self
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_date_from(mut self, date: impl Into<String>) -> Self {
        self.date_from = Some(date.into());
        self
    }

    pub fn with_date_to(mut self, date: impl Into<String>) -> Self {
        self.date_to = Some(date.into());
        self
    }

    /// Narrows `units` by each supplied criterion in turn.
    pub fn apply<'a>(&self, units: &'a [TranslationUnit]) -> Vec<&'a TranslationUnit> {
        units.iter().filter(|u| self.matches(u)).collect()
    }

    /// Whether `unit` passes every supplied criterion.
    pub fn matches(&self, unit: &TranslationUnit) -> bool {
        if let Some(lang) = non_empty(&self.source_lang) {
            if unit.source_lang != lang {
                return false;
            }
        }
        if let Some(lang) = non_empty(&self.target_lang) {
            if unit.target_lang != lang {
                return false;
            }
        }
        if let Some(lang) = non_empty(&self.language) {
            if unit.source_lang != lang && unit.target_lang != lang {
                return false;
            }
        }
        if let Some(project) = non_empty(&self.project) {
            if !unit.project.to_lowercase().contains(&project.to_lowercase()) {
                return false;
            }
        }
        if let Some(from) = non_empty(&self.date_from) {
            if unit.created.as_str() < from {
                return false;
            }
        }
        if let Some(to) = non_empty(&self.date_to) {
            if unit.created.as_str() > to {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
