//! Support for the TMX 1.4 translation memory exchange format.
//!
//! A TMX `<tu>` record may hold any number of language variants (`<tuv>`),
//! while a [`TranslationUnit`] pairs exactly one source with one target.
//! Reading therefore splits a record with N languages into N-1 units, and
//! writing emits one record per unit. Round-trips keep the set of units,
//! not the layout of the original document.

use std::io::{BufRead, Write};

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    formats::xml::{self, Element},
    traits::{Decode, Encode},
    types::{DEFAULT_SOURCE_LANG, TranslationUnit},
};

pub const TMX_VERSION: &str = "1.4";
pub const CREATION_TOOL: &str = "tmcodec";
pub const CREATION_TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A parsed TMX document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub header: Header,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    /// Declared source language, if the header has one.
    pub srclang: Option<String>,
    pub creation_tool: Option<String>,
    pub creation_tool_version: Option<String>,
}

/// One `<tu>` record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub tuid: String,
    pub creation_date: String,
    pub note: String,
    /// `<tuv>` children in document order.
    pub tuvs: Vec<Tuv>,
}

/// One `<tuv>`: a language code and its segment text, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuv {
    pub lang: String,
    pub text: Option<String>,
}

/// Language → text mapping for one record, in first-seen document order.
///
/// Inserting a language that is already present replaces its text but keeps
/// its original position, so "first language encountered" stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variants(Vec<(String, String)>);

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        let lang = lang.into();
        let text = text.into();
        match self.0.iter_mut().find(|(l, _)| *l == lang) {
            Some(slot) => slot.1 = text,
            None => self.0.push((lang, text)),
        }
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == lang)
            .map(|(_, t)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Languages in first-seen order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }
}

/// Chooses which variant language acts as the source of a record.
///
/// `preferred` (the document's source language) wins when present;
/// otherwise the first language in document order. `None` only for an empty
/// mapping.
pub fn pick_source_language<'v>(variants: &'v Variants, preferred: &str) -> Option<&'v str> {
    variants
        .languages()
        .find(|lang| *lang == preferred)
        .or_else(|| variants.languages().next())
}

impl Record {
    /// Collects the variants that carry non-empty text.
    pub fn variants(&self) -> Variants {
        let mut variants = Variants::new();
        for tuv in &self.tuvs {
            if let Some(text) = tuv.text.as_deref().filter(|t| !t.is_empty()) {
                variants.insert(tuv.lang.as_str(), text);
            }
        }
        variants
    }

    /// Splits the record into units: one per non-source language, or a
    /// single untranslated unit when only one language has text.
    pub fn to_units(&self, preferred_source: &str) -> Vec<TranslationUnit> {
        let variants = self.variants();
        let make = |source: &str, target: &str, source_lang: &str, target_lang: &str| {
            TranslationUnit {
                source: source.to_string(),
                target: target.to_string(),
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
                created: self.creation_date.clone(),
                project: self.tuid.clone(),
                note: self.note.clone(),
            }
        };

        if variants.len() == 1 {
            return variants
                .iter()
                .map(|(lang, text)| make(text, "", lang, ""))
                .collect();
        }

        let Some(source_lang) = pick_source_language(&variants, preferred_source) else {
            tracing::trace!(tuid = %self.tuid, "dropping record without text variants");
            return Vec::new();
        };
        let source = variants.get(source_lang).unwrap_or_default();

        variants
            .iter()
            .filter(|(lang, _)| *lang != source_lang)
            .map(|(lang, text)| make(source, text, source_lang, lang))
            .collect()
    }

    /// Builds the record a unit is saved as.
    pub fn from_unit(unit: &TranslationUnit) -> Self {
        let mut tuvs = vec![Tuv {
            lang: unit.source_lang.clone(),
            text: Some(unit.source.clone()),
        }];
        if !unit.target.is_empty() && !unit.target_lang.is_empty() {
            tuvs.push(Tuv {
                lang: unit.target_lang.clone(),
                text: Some(unit.target.clone()),
            });
        }
        Record {
            tuid: unit.project.clone(),
            creation_date: unit.created.clone(),
            note: unit.note.clone(),
            tuvs,
        }
    }
}

impl Format {
    /// Builds a document for `units` declaring `srclang` in its header.
    pub fn from_units<'a>(
        units: impl IntoIterator<Item = &'a TranslationUnit>,
        srclang: &str,
    ) -> Self {
        Format {
            header: Header {
                srclang: Some(srclang.to_string()),
                creation_tool: Some(CREATION_TOOL.to_string()),
                creation_tool_version: Some(CREATION_TOOL_VERSION.to_string()),
            },
            records: units.into_iter().map(Record::from_unit).collect(),
        }
    }

    /// The header's source language when it declares a non-empty one.
    pub fn declared_source_lang(&self) -> Option<&str> {
        self.header.srclang.as_deref().filter(|s| !s.is_empty())
    }

    /// All units in the document, using `preferred_source` for records the
    /// header's `srclang` does not settle.
    pub fn to_units(&self, preferred_source: &str) -> Vec<TranslationUnit> {
        self.records
            .iter()
            .flat_map(|record| record.to_units(preferred_source))
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
        let header = root
            .child("header")
            .map(|h| Header {
                srclang: h.attr("srclang").map(str::to_string),
                creation_tool: h.attr("creationtool").map(str::to_string),
                creation_tool_version: h.attr("creationtoolversion").map(str::to_string),
            })
            .unwrap_or_default();

        // A missing body is an empty memory, not an error.
        let records: Vec<Record> = root
            .child("body")
            .map(|body| body.children_named("tu").map(parse_record).collect())
            .unwrap_or_default();

        Ok(Format { header, records })
    }
}

fn parse_record(tu: &Element) -> Record {
    Record {
        tuid: tu.attr("tuid").unwrap_or_default().to_string(),
        creation_date: tu.attr("creationdate").unwrap_or_default().to_string(),
        note: tu.child("note").map(|n| n.text.clone()).unwrap_or_default(),
        tuvs: tu
            .children_named("tuv")
            .map(|tuv| Tuv {
                lang: tuv
                    .attr("xml:lang")
                    .or_else(|| tuv.attr("lang"))
                    .unwrap_or_default()
                    .to_string(),
                text: tuv.child("seg").map(|seg| seg.text.clone()),
            })
            .collect(),
    }
}

impl Encode for Format {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut tmx = BytesStart::new("tmx");
        tmx.push_attribute(("version", TMX_VERSION));
        xml_writer.write_event(Event::Start(tmx))?;

        let srclang = self
            .header
            .srclang
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_LANG);
        let mut header = BytesStart::new("header");
        header.push_attribute((
            "creationtool",
            self.header.creation_tool.as_deref().unwrap_or(CREATION_TOOL),
        ));
        header.push_attribute((
            "creationtoolversion",
            self.header
                .creation_tool_version
                .as_deref()
                .unwrap_or(CREATION_TOOL_VERSION),
        ));
        header.push_attribute(("segtype", "sentence"));
        header.push_attribute(("adminlang", "en"));
        header.push_attribute(("srclang", srclang));
        header.push_attribute(("datatype", "plaintext"));
        xml_writer.write_event(Event::Empty(header))?;

        xml_writer.write_event(Event::Start(BytesStart::new("body")))?;
        for record in &self.records {
            let mut tu = BytesStart::new("tu");
            if !record.tuid.is_empty() {
                tu.push_attribute(("tuid", record.tuid.as_str()));
            }
            if !record.creation_date.is_empty() {
                tu.push_attribute(("creationdate", record.creation_date.as_str()));
            }
            xml_writer.write_event(Event::Start(tu))?;

            if !record.note.is_empty() {
                write_text_element(&mut xml_writer, "note", &record.note)?;
            }

            for tuv in &record.tuvs {
                let mut start = BytesStart::new("tuv");
                start.push_attribute(("xml:lang", tuv.lang.as_str()));
                xml_writer.write_event(Event::Start(start))?;
                write_text_element(
                    &mut xml_writer,
                    "seg",
                    tuv.text.as_deref().unwrap_or_default(),
                )?;
                xml_writer.write_event(Event::End(BytesEnd::new("tuv")))?;
            }

            xml_writer.write_event(Event::End(BytesEnd::new("tu")))?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("body")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("tmx")))?;

        xml_writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(pairs: &[(&str, &str)]) -> Variants {
        let mut v = Variants::new();
        for (lang, text) in pairs {
            v.insert(*lang, *text);
        }
        v
    }

    #[test]
    fn test_pick_prefers_declared_source() {
        let v = variants(&[("sv", "Hej"), ("en", "Hello")]);
        assert_eq!(pick_source_language(&v, "en"), Some("en"));
    }

    #[test]
    fn test_pick_falls_back_to_first_seen() {
        let v = variants(&[("sv", "Hej"), ("fr", "Bonjour")]);
        assert_eq!(pick_source_language(&v, "en"), Some("sv"));
        let v = variants(&[("fr", "Bonjour"), ("sv", "Hej")]);
        assert_eq!(pick_source_language(&v, "en"), Some("fr"));
    }

    #[test]
    fn test_pick_on_empty_variants() {
        assert_eq!(pick_source_language(&Variants::new(), "en"), None);
    }

    #[test]
    fn test_variants_overwrite_keeps_position() {
        let mut v = variants(&[("sv", "Hej"), ("fr", "Bonjour")]);
        v.insert("sv", "Tjena");
        assert_eq!(v.languages().collect::<Vec<_>>(), vec!["sv", "fr"]);
        assert_eq!(v.get("sv"), Some("Tjena"));
    }

    #[test]
    fn test_parse_multi_language_record() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <tmx version="1.4">
          <header srclang="en" creationtool="other"/>
          <body>
            <tu tuid="web" creationdate="20240101T000000Z">
              <note>Greeting</note>
              <tuv xml:lang="en"><seg>Hello</seg></tuv>
              <tuv xml:lang="sv"><seg>Hej</seg></tuv>
              <tuv xml:lang="fr"><seg>Bonjour</seg></tuv>
            </tu>
          </body>
        </tmx>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.declared_source_lang(), Some("en"));
        assert_eq!(format.header.creation_tool.as_deref(), Some("other"));

        let units = format.to_units("en");
        assert_eq!(units.len(), 2);
        assert_eq!((units[0].target_lang.as_str(), units[0].target.as_str()), ("sv", "Hej"));
        assert_eq!((units[1].target_lang.as_str(), units[1].target.as_str()), ("fr", "Bonjour"));
        for unit in &units {
            assert_eq!(unit.source, "Hello");
            assert_eq!(unit.project, "web");
            assert_eq!(unit.created, "20240101T000000Z");
            assert_eq!(unit.note, "Greeting");
        }
    }

    #[test]
    fn test_parse_single_and_empty_variants() {
        let xml = r#"<tmx><body>
            <tu><tuv lang="de"><seg>Hallo</seg></tuv><tuv xml:lang="sv"><seg></seg></tuv></tu>
            <tu><tuv xml:lang="en"><seg/></tuv><tuv xml:lang="sv"/></tu>
        </body></tmx>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.header, Header::default());
        let units = format.to_units("en");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].source, "Hallo");
        assert_eq!(units[0].source_lang, "de");
        assert!(units[0].target.is_empty());
        assert!(units[0].target_lang.is_empty());
        assert!(units[0].created.is_empty());
    }

    #[test]
    fn test_missing_body_is_empty() {
        let format = Format::from_str(r#"<tmx version="1.4"><header srclang="sv"/></tmx>"#).unwrap();
        assert!(format.records.is_empty());
        assert_eq!(format.declared_source_lang(), Some("sv"));
    }

    #[test]
    fn test_declared_encoding_applies_to_bytes_not_text() {
        let text = "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
            <tmx><body><tu><tuv xml:lang=\"en\"><seg>Café</seg></tuv></tu></body></tmx>";
        let from_text = Format::from_str(text).unwrap();
        assert_eq!(from_text.records[0].tuvs[0].text.as_deref(), Some("Café"));

        let latin1: Vec<u8> = text.chars().map(|c| c as u8).collect();
        let from_bytes = Format::from_bytes(&latin1).unwrap();
        assert_eq!(from_bytes, from_text);
    }

    #[test]
    fn test_write_layout() {
        let unit = TranslationUnit::new("Fish & chips", "Fisk", "en", "sv")
            .with_project("menu")
            .with_created("2024-02-02T10:00:00.000000")
            .with_note("food");
        let untranslated = TranslationUnit::new("Salt", "", "en", "sv").with_created("");
        let format = Format::from_units([&unit, &untranslated], "en");
        let out = format.to_string_lossy().unwrap();

        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(out.contains(r#"<tmx version="1.4">"#));
        assert!(out.contains(r#"creationtool="tmcodec""#));
        assert!(out.contains(r#"segtype="sentence""#));
        assert!(out.contains(r#"adminlang="en""#));
        assert!(out.contains(r#"srclang="en""#));
        assert!(out.contains(r#"datatype="plaintext""#));
        assert!(out.contains(r#"<tu tuid="menu" creationdate="2024-02-02T10:00:00.000000">"#));
        assert!(out.contains("      <note>food</note>"));
        assert!(out.contains(r#"      <tuv xml:lang="en">"#));
        assert!(out.contains("<seg>Fish &amp; chips</seg>"));
        // untranslated unit: bare <tu>, a single variant
        assert!(out.contains("    <tu>\n"));
        assert_eq!(out.matches("<tuv").count(), 3);
    }
}
