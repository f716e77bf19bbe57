//! All supported file formats for tmcodec.
//!
//! TMX is the native storage format. PO, XLIFF and Qt TS catalogs can be
//! imported; PO can also be exported. [`FormatType`] names them for generic
//! dispatch.

pub mod po;
pub mod tmx;
pub mod ts;
pub mod xliff;
pub mod xml;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use po::Format as PoFormat;
pub use tmx::Format as TmxFormat;
pub use ts::Format as TsFormat;
pub use xliff::Format as XliffFormat;

use crate::Error;

/// Represents all supported file formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// TMX translation memory.
    Tmx,
    /// GNU gettext catalog.
    Po,
    /// XLIFF 1.2 exchange file.
    Xliff,
    /// Qt Linguist source file.
    Ts,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use tmcodec::formats::FormatType;
/// assert_eq!(FormatType::Tmx.to_string(), "tmx");
/// assert_eq!(FormatType::Ts.to_string(), "ts");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Tmx => write!(f, "tmx"),
            FormatType::Po => write!(f, "po"),
            FormatType::Xliff => write!(f, "xliff"),
            FormatType::Ts => write!(f, "ts"),
        }
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts the following case-insensitive strings:
/// - `"tmx"` → `FormatType::Tmx`
/// - `"po"`, `"pot"`, `"gettext"` → `FormatType::Po`
/// - `"xliff"`, `"xlf"` → `FormatType::Xliff`
/// - `"ts"`, `"qt"` → `FormatType::Ts`
///
/// Returns [`crate::error::Error::UnknownFormat`] for unknown strings.
///
/// # Example
/// ```rust
/// use tmcodec::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("XLF").unwrap(), FormatType::Xliff);
/// assert!(FormatType::from_str("docx").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "tmx" => Ok(FormatType::Tmx),
            "po" | "pot" | "gettext" => Ok(FormatType::Po),
            "xliff" | "xlf" => Ok(FormatType::Xliff),
            "ts" | "qt" => Ok(FormatType::Ts),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Tmx => "tmx",
            FormatType::Po => "po",
            FormatType::Xliff => "xliff",
            FormatType::Ts => "ts",
        }
    }

    /// Whether units can be imported from this format into a store.
    pub fn is_importable(&self) -> bool {
        !matches!(self, FormatType::Tmx)
    }
}

/// Infers the format from a file extension, case-insensitively.
///
/// ```rust
/// use tmcodec::formats::{FormatType, infer_format_from_extension};
/// assert_eq!(infer_format_from_extension("memory.TMX"), Some(FormatType::Tmx));
/// assert_eq!(infer_format_from_extension("app.xlf"), Some(FormatType::Xliff));
/// assert_eq!(infer_format_from_extension("notes.txt"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    let extension = path.as_ref().extension()?.to_str()?;
    match extension.to_ascii_lowercase().as_str() {
        "tmx" => Some(FormatType::Tmx),
        "po" | "pot" => Some(FormatType::Po),
        "xliff" | "xlf" => Some(FormatType::Xliff),
        "ts" => Some(FormatType::Ts),
        _ => None,
    }
}
