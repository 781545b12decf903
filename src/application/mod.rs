//! Application layer: parsers, pipeline and services
//!
//! This layer turns decoded record text into SGF and orchestrates file
//! conversion through I/O boundary traits.

pub mod convert;
pub mod error;
pub mod error_ext;
pub mod format;
pub mod normalize;
pub mod parsers;
pub mod serialize;
pub mod services;

pub use convert::{convert, convert_to_writer, parse_normalized};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use format::{Format, FormatEntry, FORMATS};
