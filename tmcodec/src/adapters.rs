//! File-level import and export of translation units.
//!
//! These functions only deal in [`TranslationUnit`] values; appending the
//! result to a memory is up to the caller (see
//! [`crate::TmStore::import_file`]).

use std::path::Path;

use crate::{
    error::Error,
    formats::{FormatType, PoFormat, TsFormat, XliffFormat, infer_format_from_extension},
    options::ImportOptions,
    traits::{Decode, Encode},
    types::TranslationUnit,
};

/// Reads translated entries from a `.po` catalog.
///
/// The header entry (empty `msgid`) and untranslated entries (empty
/// `msgstr`) are skipped.
pub fn import_po<P: AsRef<Path>>(
    path: P,
    source_lang: &str,
    target_lang: &str,
) -> Result<Vec<TranslationUnit>, Error> {
    let catalog = PoFormat::read_from(path.as_ref())?;
    let units = catalog.to_units(source_lang, target_lang);
    tracing::debug!(path = %path.as_ref().display(), units = units.len(), "imported PO catalog");
    Ok(units)
}

/// Reads every `trans-unit` with a source text from an XLIFF file.
pub fn import_xliff<P: AsRef<Path>>(path: P) -> Result<Vec<TranslationUnit>, Error> {
    let document = XliffFormat::read_from(path.as_ref())?;
    let units = document.to_units();
    tracing::debug!(path = %path.as_ref().display(), units = units.len(), "imported XLIFF file");
    Ok(units)
}

/// Reads every message with a source text from a Qt `.ts` file.
pub fn import_ts<P: AsRef<Path>>(path: P) -> Result<Vec<TranslationUnit>, Error> {
    let document = TsFormat::read_from(path.as_ref())?;
    let units = document.to_units();
    tracing::debug!(path = %path.as_ref().display(), units = units.len(), "imported Qt TS file");
    Ok(units)
}

/// Imports `path` with the importer its extension names.
pub fn import_file<P: AsRef<Path>>(
    path: P,
    options: &ImportOptions,
) -> Result<Vec<TranslationUnit>, Error> {
    let path = path.as_ref();
    match infer_format_from_extension(path) {
        Some(FormatType::Po) => import_po(path, &options.source_lang, &options.target_lang),
        Some(FormatType::Xliff) => import_xliff(path),
        Some(FormatType::Ts) => import_ts(path),
        Some(FormatType::Tmx) => Err(Error::UnsupportedFormat(
            "TMX files are merged, not imported".to_string(),
        )),
        None => Err(Error::UnsupportedFormat(format!(
            "Unsupported file extension: {:?}.",
            path.extension()
        ))),
    }
}

/// Writes `units` as a `.po` catalog, one `msgid`/`msgstr` pair each.
///
/// Values are written on a single line; no wrapping into continuation
/// lines is done.
pub fn export_po<'a, P: AsRef<Path>>(
    units: impl IntoIterator<Item = &'a TranslationUnit>,
    path: P,
    target_lang: &str,
) -> Result<(), Error> {
    let catalog = PoFormat::from_units(units, target_lang);
    catalog.write_to(path.as_ref())?;
    tracing::debug!(
        path = %path.as_ref().display(),
        entries = catalog.entries.len(),
        "exported PO catalog"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_import_file_dispatches_on_extension() {
        let dir = TempDir::new().unwrap();
        let po = dir.path().join("sv.po");
        fs::write(&po, "msgid \"Cat\"\nmsgstr \"Katt\"\n").unwrap();

        let options = ImportOptions::new().with_target_lang("sv");
        let units = import_file(&po, &options).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].source_lang, "en");
        assert_eq!(units[0].target_lang, "sv");
    }

    #[test]
    fn test_import_file_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "hello").unwrap();
        let err = import_file(&txt, &ImportOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_import_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = import_ts(dir.path().join("missing.ts")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_import_bom_prefixed_po() {
        let dir = TempDir::new().unwrap();
        let po = dir.path().join("bom.po");
        fs::write(&po, "\u{feff}msgid \"Cat\"\nmsgstr \"Katt\"\n").unwrap();
        let units = import_po(&po, "en", "sv").unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].source, "Cat");
    }

    #[test]
    fn test_export_then_import_po() {
        let dir = TempDir::new().unwrap();
        let po = dir.path().join("out.po");
        let units = vec![
            TranslationUnit::new("Say \"hi\"", "Säg \"hej\"", "en", "sv"),
            TranslationUnit::new("Untranslated", "", "en", ""),
        ];
        export_po(&units, &po, "sv").unwrap();

        let back = import_po(&po, "en", "sv").unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].dedup_key(), units[0].dedup_key());
    }
}
