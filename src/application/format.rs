//! Supported input dialects and their static registry.

use std::fmt;
use std::path::Path;

use encoding_rs::{Encoding, EUC_KR_INIT, SHIFT_JIS_INIT, UTF_8_INIT};

use crate::application::parsers::{gib, ngf, ugf};
use crate::domain::{DomainResult, PropertyTree};

/// Uniform parser shape: decoded text in, raw tree out.
pub type ParseFn = fn(&str) -> DomainResult<PropertyTree>;

/// Input dialect tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Tygem
    Gib,
    /// WBaduk
    Ngf,
    /// Pandanet, legacy encoding
    Ugf,
    /// Pandanet, Unicode
    Ugi,
}

/// Registry entry binding a format to its file extension, legacy text
/// encoding and parser.
pub struct FormatEntry {
    pub format: Format,
    pub extension: &'static str,
    pub encoding: &'static Encoding,
    pub parser: ParseFn,
    pub description: &'static str,
}

/// Read-only format registry.
pub static FORMATS: [FormatEntry; 4] = [
    FormatEntry {
        format: Format::Gib,
        extension: "gib",
        encoding: &EUC_KR_INIT,
        parser: gib::parse,
        description: "Tygem",
    },
    FormatEntry {
        format: Format::Ngf,
        extension: "ngf",
        encoding: &EUC_KR_INIT,
        parser: ngf::parse,
        description: "WBaduk",
    },
    FormatEntry {
        format: Format::Ugf,
        extension: "ugf",
        encoding: &SHIFT_JIS_INIT,
        parser: ugf::parse,
        description: "Pandanet (Shift_JIS)",
    },
    FormatEntry {
        format: Format::Ugi,
        extension: "ugi",
        encoding: &UTF_8_INIT,
        parser: ugf::parse,
        description: "Pandanet (UTF-8)",
    },
];

impl Format {
    pub fn all() -> impl Iterator<Item = Format> {
        FORMATS.iter().map(|entry| entry.format)
    }

    pub fn entry(self) -> &'static FormatEntry {
        match self {
            Format::Gib => &FORMATS[0],
            Format::Ngf => &FORMATS[1],
            Format::Ugf => &FORMATS[2],
            Format::Ugi => &FORMATS[3],
        }
    }

    /// Case-insensitive extension lookup, without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Format> {
        FORMATS
            .iter()
            .find(|entry| entry.extension.eq_ignore_ascii_case(extension))
            .map(|entry| entry.format)
    }

    pub fn from_path(path: &Path) -> Option<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    pub fn extension(self) -> &'static str {
        self.entry().extension
    }

    pub fn encoding(self) -> &'static Encoding {
        self.entry().encoding
    }

    /// Run this format's parser.
    pub fn parse(self, text: &str) -> DomainResult<PropertyTree> {
        (self.entry().parser)(text)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
