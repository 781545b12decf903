//! Core pipeline: decoded text and a format tag in, SGF text out.

use std::io;

use tracing::instrument;

use crate::application::format::Format;
use crate::application::normalize::normalize;
use crate::application::serialize::{serialize, write_tree};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainResult, PropertyTree};

/// Parse `text` as `format` and normalize the resulting tree.
#[instrument(level = "debug", skip(text))]
pub fn parse_normalized(text: &str, format: Format) -> DomainResult<PropertyTree> {
    let mut tree = format.parse(text)?;
    normalize(&mut tree)?;
    Ok(tree)
}

/// Convert a decoded record into SGF text.
pub fn convert(text: &str, format: Format) -> DomainResult<String> {
    let tree = parse_normalized(text, format)?;
    Ok(serialize(&tree))
}

/// Convert a decoded record, streaming the SGF text into `sink`.
///
/// Nothing is written when parsing or normalization fails.
pub fn convert_to_writer<W: io::Write + ?Sized>(
    text: &str,
    format: Format,
    sink: &mut W,
) -> ApplicationResult<()> {
    let tree = parse_normalized(text, format)?;
    write_tree(&tree, sink).map_err(|e| ApplicationError::OperationFailed {
        context: "write sgf output".to_string(),
        source: Box::new(e),
    })
}
