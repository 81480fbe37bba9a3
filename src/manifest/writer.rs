//! XML rendering of a file repository
//!
//! One rendering pass serves both layouts: the compact form writes the
//! declaration and the root element back to back, the pretty form runs the
//! same events through an indenting writer.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use super::model::{FileEntry, FileRepository, FileSet, Property};
use crate::{FileRepoError, Result};

/// Declaration every manifest starts with
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Layout settings for [`render`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Lay the document out on multiple indented lines
    pub pretty_print: bool,

    /// Character repeated for each indentation level (ASCII whitespace)
    pub indent_char: char,

    /// Number of `indent_char` per nesting level
    pub indent_size: usize,

    /// Write the `SourcePackage` attribute of file sets. Off by default:
    /// existing consumers never receive it.
    pub emit_source_package: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty_print: true,
            indent_char: '\t',
            indent_size: 1,
            emit_source_package: false,
        }
    }
}

impl RenderOptions {
    pub fn compact() -> Self {
        Self {
            pretty_print: false,
            ..Self::default()
        }
    }

    pub fn pretty() -> Self {
        Self::default()
    }
}

/// Render a repository as an XML document
pub fn render(repo: &FileRepository, options: &RenderOptions) -> Result<String> {
    let mut writer = if options.pretty_print {
        if !options.indent_char.is_ascii_whitespace() {
            return Err(FileRepoError::Config(format!(
                "Indent character must be ASCII whitespace, got {:?}",
                options.indent_char
            )));
        }
        Writer::new_with_indent(Vec::new(), options.indent_char as u8, options.indent_size)
    } else {
        Writer::new(Vec::new())
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("FileRepository")))?;
    write_properties(&mut writer, &repo.properties)?;
    write_file_sets(&mut writer, &repo.file_sets, options.emit_source_package)?;
    writer.write_event(Event::End(BytesEnd::new("FileRepository")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| FileRepoError::Other(format!("Rendered XML is not UTF-8: {}", e)))?;
    if options.pretty_print {
        xml.push('\n');
    }

    tracing::debug!(
        properties = repo.properties.len(),
        file_sets = repo.file_sets.len(),
        pretty = options.pretty_print,
        bytes = xml.len(),
        "Rendered file repository"
    );

    Ok(xml)
}

fn write_properties(writer: &mut Writer<Vec<u8>>, properties: &[Property]) -> Result<()> {
    if properties.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("Properties")))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("Properties")))?;
    for property in properties {
        let mut elem = BytesStart::new("Property");
        push_attr(&mut elem, "Name", &property.name)?;
        push_attr(&mut elem, "Value", &property.value)?;
        writer.write_event(Event::Empty(elem))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Properties")))?;
    Ok(())
}

fn write_file_sets(
    writer: &mut Writer<Vec<u8>>,
    file_sets: &[FileSet],
    emit_source_package: bool,
) -> Result<()> {
    if file_sets.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("FileSets")))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("FileSets")))?;
    for file_set in file_sets {
        write_file_set(writer, file_set, emit_source_package)?;
    }
    writer.write_event(Event::End(BytesEnd::new("FileSets")))?;
    Ok(())
}

fn write_file_set(
    writer: &mut Writer<Vec<u8>>,
    file_set: &FileSet,
    emit_source_package: bool,
) -> Result<()> {
    let mut elem = BytesStart::new("FileSet");
    if let Some(ref name) = file_set.name {
        push_attr(&mut elem, "Name", name)?;
    }
    push_attr(&mut elem, "Id", &file_set.id.to_string())?;
    if emit_source_package {
        if let Some(ref source_package) = file_set.source_package {
            push_attr(&mut elem, "SourcePackage", source_package)?;
        }
    }

    if file_set.files.is_empty() {
        writer.write_event(Event::Empty(elem))?;
        return Ok(());
    }

    writer.write_event(Event::Start(elem))?;
    for file in &file_set.files {
        write_file(writer, file)?;
    }
    writer.write_event(Event::End(BytesEnd::new("FileSet")))?;
    Ok(())
}

fn write_file(writer: &mut Writer<Vec<u8>>, file: &FileEntry) -> Result<()> {
    let mut elem = BytesStart::new("File");
    push_attr(&mut elem, "Source", &file.source)?;
    if let Some(ref target) = file.target {
        push_attr(&mut elem, "Target", target)?;
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Append an escaped attribute, rejecting characters XML 1.0 cannot carry
///
/// Tab, LF and CR are written as character references; attribute value
/// normalization would otherwise turn them into spaces on the reading side.
fn push_attr(elem: &mut BytesStart<'_>, name: &str, value: &str) -> Result<()> {
    if let Some(bad) = value.chars().find(|c| !is_xml_char(*c)) {
        tracing::warn!(attribute = name, character = ?bad, "Refusing to render invalid XML character");
        return Err(FileRepoError::InvalidCharacter {
            attribute: name.to_string(),
            value: value.to_string(),
        });
    }
    let escaped = escape_attr_value(value);
    elem.push_attribute(Attribute {
        key: QName(name.as_bytes()),
        value: match escaped {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        },
    });
    Ok(())
}

fn escape_attr_value(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped;
    }
    Cow::Owned(
        escaped
            .replace('\t', "&#9;")
            .replace('\n', "&#10;")
            .replace('\r', "&#13;"),
    )
}

/// XML 1.0 `Char` production (surrogates cannot occur in a Rust `char`)
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
