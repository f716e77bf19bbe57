//! Import support for Qt Linguist `.ts` files.
//!
//! The target language comes from the root `<TS language="...">` attribute
//! and applies to every message. The source language is always `en`; the
//! file's own `sourcelanguage` attribute is not consulted.

use std::io::BufRead;

use crate::{
    error::Error,
    formats::xml::{self, Element},
    traits::Decode,
    types::TranslationUnit,
};

/// Source language given to every unit imported from a `.ts` file.
pub const TS_SOURCE_LANG: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub language: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub source: String,
    /// Empty for missing or unfinished translations.
    pub translation: String,
}

impl Format {
    pub fn to_units(&self) -> Vec<TranslationUnit> {
        self.messages
            .iter()
            .map(|m| TranslationUnit::new(&m.source, &m.translation, TS_SOURCE_LANG, &self.language))
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
        let messages = root
            .children_named("context")
            .flat_map(|context| context.children_named("message"))
            .filter_map(|message| {
                let source = message.child("source").filter(|s| !s.text.is_empty())?;
                let translation = message
                    .child("translation")
                    .filter(|t| t.attr("type") != Some("unfinished"))
                    .map(|t| t.text.clone())
                    .unwrap_or_default();
                Some(Message {
                    source: source.text.clone(),
                    translation,
                })
            })
            .collect();

        Ok(Format {
            language: root.attr("language").unwrap_or_default().to_string(),
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="sv_SE" sourcelanguage="de">
<context>
    <name>MainWindow</name>
    <message>
        <location filename="mainwindow.ui" line="14"/>
        <source>File</source>
        <translation>Arkiv</translation>
    </message>
    <message>
        <source>Edit</source>
        <translation type="unfinished">Redigera</translation>
    </message>
    <message>
        <source>View</source>
    </message>
    <message>
        <source></source>
        <translation>Tom</translation>
    </message>
</context>
<context>
    <name>Dialog</name>
    <message>
        <source>Cancel</source>
        <translation type="vanished">Avbryt</translation>
    </message>
</context>
</TS>"#;

    #[test]
    fn test_parse_messages() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.language, "sv_SE");
        let sources: Vec<_> = format.messages.iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["File", "Edit", "View", "Cancel"]);
    }

    #[test]
    fn test_unfinished_translation_is_empty() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.messages[0].translation, "Arkiv");
        assert_eq!(format.messages[1].translation, "");
        assert_eq!(format.messages[2].translation, "");
        assert_eq!(format.messages[3].translation, "Avbryt");
    }

    #[test]
    fn test_units_use_fixed_source_language() {
        let units = Format::from_str(SAMPLE).unwrap().to_units();
        assert_eq!(units.len(), 4);
        assert!(units.iter().all(|u| u.source_lang == "en"));
        assert!(units.iter().all(|u| u.target_lang == "sv_SE"));
    }
}
