//! Support for GNU gettext `.po` catalogs.
//!
//! Only the `msgid`/`msgstr` subset is understood. Reading accepts values
//! split over quoted continuation lines; writing never wraps or splits, so a
//! catalog written here is flatter than most catalogs it was read from.
//! Comments, `msgctxt` and plural forms are ignored on import.

use std::{
    collections::HashMap,
    io::{BufRead, Read, Write},
};

use indoc::indoc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    encoding,
    error::Error,
    traits::{Decode, Encode},
    types::TranslationUnit,
};

lazy_static! {
    static ref KEYWORD_LINE: Regex =
        Regex::new(r"^(msgctxt|msgid_plural|msgid|msgstr(?:\[\d+\])?)\s*(.*)$").unwrap();
}

/// A parsed `.po` catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// `Language:` from the header entry, if present.
    ///
    /// Informational on import: units take the languages the caller passes to
    /// [`Format::to_units`]. On export it is written back into the header.
    pub language: String,
    pub entries: Vec<Entry>,
}

/// A translated message. Entries with an empty `msgid` or `msgstr` never
/// make it here: the former is the header, the latter untranslated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub msgid: String,
    pub msgstr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Str,
    Other,
}

#[derive(Debug, Default)]
struct Pending {
    msgid: Option<String>,
    msgstr: Option<String>,
}

impl Format {
    /// Units for every entry, tagged with the given languages.
    pub fn to_units(&self, source_lang: &str, target_lang: &str) -> Vec<TranslationUnit> {
        self.entries
            .iter()
            .map(|e| TranslationUnit::new(&e.msgid, &e.msgstr, source_lang, target_lang))
            .collect()
    }

    /// Catalog for exporting `units`; `language` goes into the header.
    pub fn from_units<'a>(
        units: impl IntoIterator<Item = &'a TranslationUnit>,
        language: &str,
    ) -> Self {
        Format {
            language: language.to_string(),
            entries: units
                .into_iter()
                .map(|u| Entry {
                    msgid: u.source.clone(),
                    msgstr: u.target.clone(),
                })
                .collect(),
        }
    }
}

impl Decode for Format {
    /// Decodes by byte-order mark, then the header's `charset=`, then UTF-8.
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = encoding::decode_document(&bytes, encoding::po_declared_charset(&bytes))?;
        Self::from_str(&text)
    }

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut entries = Vec::new();
        let mut header = None;
        let mut pending = Pending::default();
        let mut field = Field::Other;

        let mut finish = |pending: Pending| match (pending.msgid, pending.msgstr) {
            (Some(id), Some(s)) if id.is_empty() && header.is_none() => header = Some(s),
            (Some(msgid), Some(msgstr)) if !msgid.is_empty() && !msgstr.is_empty() => {
                entries.push(Entry { msgid, msgstr })
            }
            _ => {}
        };

        for line in s.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with('"') {
                let target = match field {
                    Field::Id => pending.msgid.as_mut(),
                    Field::Str => pending.msgstr.as_mut(),
                    Field::Other => None,
                };
                if let (Some(value), Some(part)) = (target, unquote(trimmed)) {
                    value.push_str(&part);
                }
                continue;
            }

            let Some(caps) = KEYWORD_LINE.captures(trimmed) else {
                // comments, blank lines and anything unknown end a continuation
                field = Field::Other;
                continue;
            };
            let value = unquote(caps[2].trim());
            match &caps[1] {
                "msgid" => {
                    finish(std::mem::take(&mut pending));
                    pending.msgid = value;
                    field = Field::Id;
                }
                "msgstr" => {
                    pending.msgstr = value;
                    field = Field::Str;
                }
                _ => field = Field::Other,
            }
        }
        finish(pending);

        let language = header
            .as_deref()
            .and_then(|h| parse_header(h).remove("Language"))
            .unwrap_or_default();

        Ok(Format { language, entries })
    }
}

impl Encode for Format {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::from(indoc! {r#"
            # Translation Memory Export
            msgid ""
            msgstr ""
            "Content-Type: text/plain; charset=UTF-8\n"
        "#});
        if !self.language.is_empty() {
            content.push_str(&format!("\"Language: {}\\n\"\n", escape(&self.language)));
        }
        content.push('\n');

        for entry in &self.entries {
            content.push_str(&format!("msgid \"{}\"\n", escape(&entry.msgid)));
            content.push_str(&format!("msgstr \"{}\"\n\n", escape(&entry.msgstr)));
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

/// Contents of a `"..."` literal, unescaped. `None` if `s` is not quoted.
fn unquote(s: &str) -> Option<String> {
    let inner = s.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Some(out)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// `Key: value` lines of the header entry.
fn parse_header(header: &str) -> HashMap<String, String> {
    header
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}
