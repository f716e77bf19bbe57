//! Traits for format-agnostic decoding and encoding in tmcodec.

use std::{
    fs::{self, File},
    io::{BufWriter, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// A document that can be decoded from one file.
///
/// # Example
///
/// ```rust,no_run
/// use tmcodec::traits::Decode;
/// let catalog = tmcodec::formats::po::Format::read_from("sv.po")?;
/// println!("{} entries", catalog.entries.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Decode {
    /// Parse from any reader yielding raw bytes.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// Only a failure to read the file is an [`Error::Io`]. The bytes then go
    /// through [`Decode::from_bytes`], which honours a byte-order mark or the
    /// encoding the document declares, so UTF-16 exports from Windows tools
    /// and Latin-1 TMX files load the same as UTF-8 ones.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let bytes = fs::read(path).map_err(Error::Io)?;
        Self::from_bytes(&bytes)
    }

    /// Parse from a string.
    ///
    /// The crate's formats parse the text as it is: it is already decoded,
    /// so any encoding it declares is ignored.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from raw bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// A document that can be written back out.
pub trait Encode {
    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(Error::Io)
    }

    /// Render into an owned string.
    fn to_string_lossy(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
