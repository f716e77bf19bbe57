//! Turning raw document bytes into text.
//!
//! A byte-order mark always wins. Without one, the encoding a document
//! names for itself is used (`<?xml ... encoding="..."?>` for XML, the
//! `charset=` of a PO header), and UTF-8 is assumed when it names none.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::error::Error;

lazy_static! {
    static ref XML_DECL_ENCODING: Regex =
        Regex::new(r#"(?-u)\A\s*<\?xml\s[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
            .unwrap();
    static ref PO_CHARSET: Regex = Regex::new(r"(?-u)charset=([A-Za-z0-9._:-]+)").unwrap();
}

/// Encoding named by a leading XML declaration.
pub fn xml_declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let caps = XML_DECL_ENCODING.captures(bytes)?;
    lookup(&caps[1])
}

/// Encoding named by the `Content-Type` of a PO header entry.
///
/// The unfilled template value `charset=CHARSET` names nothing.
pub fn po_declared_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let caps = PO_CHARSET.captures(bytes)?;
    lookup(&caps[1])
}

// A label readable as ASCII cannot really mean UTF-16; output_encoding()
// folds that case (and "replacement") back to UTF-8.
fn lookup(label: &[u8]) -> Option<&'static Encoding> {
    Encoding::for_label(label).map(Encoding::output_encoding)
}

/// Decodes a whole document.
///
/// Bytes that are not valid in the chosen encoding make the document
/// malformed, not unreadable, so they surface as [`Error::Format`].
pub fn decode_document(
    bytes: &[u8],
    declared: Option<&'static Encoding>,
) -> Result<String, Error> {
    let (encoding, bom_len) =
        Encoding::for_bom(bytes).unwrap_or((declared.unwrap_or(UTF_8), 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(Cow::into_owned)
        .ok_or_else(|| {
            Error::format_error(format!("document is not valid {}", encoding.name()))
        })
}
