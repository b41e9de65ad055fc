//! Shared helpers for reading legacy XML files.

use std::fs;

use camino::Utf8Path;
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::LegacyError;

/// Reads a legacy file into memory.
///
/// A leading UTF-8 byte order mark, common in files written by Visual
/// Studio, is stripped.
pub(crate) fn read_text(path: &Utf8Path) -> Result<String, LegacyError> {
    let text = fs::read_to_string(path).map_err(|e| LegacyError::read(path, e))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_owned(),
        None => text,
    })
}

/// Parses `text`, accepting a `<!DOCTYPE>` declaration.
pub(crate) fn parse_document(text: &str) -> Result<Document<'_>, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options)
}

/// Reads `name` from `node`, failing with [`LegacyError::MissingAttribute`].
pub(crate) fn required_attribute<'a>(
    node: Node<'a, '_>,
    name: &'static str,
    path: &Utf8Path,
) -> Result<&'a str, LegacyError> {
    node.attribute(name)
        .ok_or_else(|| LegacyError::MissingAttribute {
            path: path.to_owned(),
            element: node.tag_name().name().to_owned(),
            attribute: name,
            line: node.document().text_pos_at(node.range().start).row,
        })
}
