//! Import support for XLIFF 1.2 files.
//!
//! Real-world XLIFF is frequently sloppy about namespaces, so elements are
//! looked up in tiers: the XLIFF 1.2 namespace first, then unqualified
//! names. If neither tier yields a single translation unit the whole
//! document is scanned once more for `file`/`trans-unit` elements under any
//! namespace and at any depth.

use std::io::BufRead;

use crate::{
    error::Error,
    formats::xml::{self, Element, Lookup},
    traits::Decode,
    types::{DEFAULT_SOURCE_LANG, TranslationUnit},
};

pub const XLIFF_NS: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// Qualified lookup, then bare names.
const SCOPED: [Lookup<'static>; 2] = [Lookup::Namespace(XLIFF_NS), Lookup::Bare];

/// Matches a local name regardless of namespace.
const ANY: [Lookup<'static>; 1] = [Lookup::AnyName];

/// The translatable content of an XLIFF document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub files: Vec<File>,
}

/// One `<file>` element with the units that yielded a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub source_language: String,
    pub target_language: String,
    pub units: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub source: String,
    /// Empty when the unit has no `<target>` yet.
    pub target: String,
}

impl Format {
    pub fn unit_count(&self) -> usize {
        self.files.iter().map(|f| f.units.len()).sum()
    }

    pub fn to_units(&self) -> Vec<TranslationUnit> {
        self.files
            .iter()
            .flat_map(|file| {
                file.units.iter().map(|seg| {
                    TranslationUnit::new(
                        &seg.source,
                        &seg.target,
                        &file.source_language,
                        &file.target_language,
                    )
                })
            })
            .collect()
    }
}

impl Decode for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Self::from_root(xml::parse(reader)?)
    }

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_root(xml::parse_str(s)?)
    }
}

impl Format {
    fn from_root(root: Element) -> Result<Self, Error> {
        let scoped = Format {
            files: root
                .find_all("file", &SCOPED)
                .into_iter()
                .map(|file| extract_file(file, file.find_all("trans-unit", &SCOPED), &SCOPED))
                .collect(),
        };
        if scoped.unit_count() > 0 {
            return Ok(scoped);
        }

        tracing::debug!("no XLIFF units found by namespace lookup, scanning whole document");
        Ok(Format {
            files: root
                .iter()
                .into_iter()
                .filter(|e| Lookup::AnyName.matches(e, "file"))
                .map(|file| {
                    let units = file
                        .iter()
                        .into_iter()
                        .filter(|e| Lookup::AnyName.matches(e, "trans-unit"))
                        .collect();
                    extract_file(file, units, &ANY)
                })
                .collect(),
        })
    }
}

fn extract_file(file: &Element, trans_units: Vec<&Element>, strategies: &[Lookup<'_>]) -> File {
    File {
        source_language: file
            .attr("source-language")
            .unwrap_or(DEFAULT_SOURCE_LANG)
            .to_string(),
        target_language: file.attr("target-language").unwrap_or_default().to_string(),
        units: trans_units
            .into_iter()
            .filter_map(|tu| {
                let source = tu.find_child("source", strategies)?;
                if source.text.is_empty() {
                    return None;
                }
                Some(Segment {
                    source: source.text.clone(),
                    target: tu
                        .find_child("target", strategies)
                        .map(|t| t.text.clone())
                        .unwrap_or_default(),
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_xliff() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
          <file source-language="en" target-language="sv" datatype="plaintext" original="app">
            <body>
              <trans-unit id="1"><source>Open</source><target>Öppna</target></trans-unit>
              <trans-unit id="2"><source>Close</source></trans-unit>
              <trans-unit id="3"><source></source><target>Tom</target></trans-unit>
            </body>
          </file>
        </xliff>"#;
        let format = Format::from_str(xml).unwrap();
        let units = format.to_units();
        assert_eq!(units.len(), 2);
        assert_eq!((units[0].source.as_str(), units[0].target.as_str()), ("Open", "Öppna"));
        assert_eq!(units[0].source_lang, "en");
        assert_eq!(units[0].target_lang, "sv");
        assert_eq!(units[1].source, "Close");
        assert!(units[1].target.is_empty());
    }

    #[test]
    fn test_unqualified_xliff_and_defaults() {
        let xml = r#"<xliff version="1.2">
          <file><body><trans-unit id="a"><source>Yes</source><target>Ja</target></trans-unit></body></file>
        </xliff>"#;
        let units = Format::from_str(xml).unwrap().to_units();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].source_lang, "en");
        assert_eq!(units[0].target_lang, "");
        assert_eq!(units[0].target, "Ja");
    }

    #[test]
    fn test_foreign_namespace_falls_back_to_deep_scan() {
        let xml = r#"<xliff version="2.0" xmlns="urn:oasis:names:tc:xliff:document:2.0">
          <file source-language="de" target-language="fr">
            <group><trans-unit><source>Hallo</source><target>Salut</target></trans-unit></group>
          </file>
        </xliff>"#;
        let units = Format::from_str(xml).unwrap().to_units();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].source_lang, "de");
        assert_eq!(units[0].target_lang, "fr");
        assert_eq!(units[0].target, "Salut");
    }

    #[test]
    fn test_file_as_root_is_found_by_deep_scan() {
        let xml = r#"<file source-language="en" target-language="nb">
          <trans-unit><source>Save</source><target>Lagre</target></trans-unit>
        </file>"#;
        let units = Format::from_str(xml).unwrap().to_units();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].target_lang, "nb");
    }

    #[test]
    fn test_no_units_is_empty_not_error() {
        let format = Format::from_str("<xliff version=\"1.2\"/>").unwrap();
        assert!(format.to_units().is_empty());
    }

    #[test]
    fn test_malformed_xliff_is_format_error() {
        let err = Format::from_str("<xliff><file></xliff>").unwrap_err();
        assert!(err.is_format_error());
    }
}
