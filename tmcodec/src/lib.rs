#![forbid(unsafe_code)]
//! Translation memory toolkit for Rust.
//!
//! Loads and saves TMX translation memories, imports units from gettext
//! `.po`, XLIFF 1.2 and Qt `.ts` files, exports `.po`, and offers fuzzy
//! search, filtering and duplicate-safe merging over the units.
//! Everything goes through the [`TranslationUnit`] model.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tmcodec::{ImportOptions, TmStore};
//!
//! let mut store = TmStore::open("memory.tmx")?;
//! store.import_file("sv.po", &ImportOptions::new().with_target_lang("sv"))?;
//!
//! for hit in store.search("Open the file", 0.7)? {
//!     println!("{:.2} {}", hit.score, hit.unit);
//! }
//!
//! store.save(None)?;
//! store.export_po(Path::new("export.po"), "sv")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Formats
//!
//! - **TMX 1.4**: native storage; multi-language records split into pairs
//! - **PO**: gettext catalogs, import and export
//! - **XLIFF 1.2**: import, tolerant of missing or foreign namespaces
//! - **Qt TS**: import; unfinished translations come in untranslated

pub mod adapters;
pub mod encoding;
pub mod error;
pub mod formats;
pub mod options;
pub mod similarity;
pub mod store;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    adapters::{export_po, import_file, import_po, import_ts, import_xliff},
    error::Error,
    formats::{FormatType, infer_format_from_extension},
    options::{FilterCriteria, ImportOptions},
    store::{DEFAULT_THRESHOLD, TmStore},
    types::{DedupKey, SearchHit, Stats, TranslationUnit},
};
