//! XML reader for file repository manifests

use super::model::{FileEntry, FileRepository, FileSet, FileSetId, Property};
use crate::{FileRepoError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

impl FileRepository {
    /// Parse a repository from XML content
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut repo = FileRepository::default();
        let mut current_set: Option<FileSet> = None;
        let mut saw_root = false;

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) => {
                    // Self-closing tags like <Property ... /> or <FileSet ... />
                    match e.name().as_ref() {
                        b"FileRepository" => saw_root = true,
                        b"Property" => repo.properties.push(parse_property(e)?),
                        b"FileSet" => repo.file_sets.push(parse_file_set(e)?),
                        b"File" => push_file(&mut current_set, e)?,
                        _ => {}
                    }
                }
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"FileRepository" => saw_root = true,
                    b"Property" => repo.properties.push(parse_property(e)?),
                    b"FileSet" => {
                        if current_set.is_some() {
                            return Err(FileRepoError::Parse(
                                "Nested FileSet elements are not allowed".to_string(),
                            ));
                        }
                        current_set = Some(parse_file_set(e)?);
                    }
                    b"File" => push_file(&mut current_set, e)?,
                    _ => {}
                },
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"FileSet" {
                        if let Some(file_set) = current_set.take() {
                            repo.file_sets.push(file_set);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(FileRepoError::Parse(format!(
                        "Error parsing repository XML: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        if !saw_root {
            return Err(FileRepoError::Parse(
                "Missing FileRepository root element".to_string(),
            ));
        }

        Ok(repo)
    }

    /// Parse a repository from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FileRepoError::Parse(format!("Invalid attribute: {}", e)))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| FileRepoError::Parse(format!("Invalid attribute value: {}", e)))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart, name: &[u8]) -> Result<String> {
    get_attr(e, name)?.ok_or_else(|| {
        FileRepoError::Parse(format!(
            "Missing required attribute {} on {}",
            String::from_utf8_lossy(name),
            String::from_utf8_lossy(e.name().as_ref())
        ))
    })
}

fn parse_property(e: &BytesStart) -> Result<Property> {
    Ok(Property {
        name: require_attr(e, b"Name")?,
        value: require_attr(e, b"Value")?,
    })
}

fn parse_file_set(e: &BytesStart) -> Result<FileSet> {
    let id = require_attr(e, b"Id")?;
    Ok(FileSet {
        name: get_attr(e, b"Name")?,
        id: FileSetId::parse(&id),
        source_package: get_attr(e, b"SourcePackage")?,
        files: Vec::new(),
    })
}

fn push_file(current_set: &mut Option<FileSet>, e: &BytesStart) -> Result<()> {
    let file_set = current_set.as_mut().ok_or_else(|| {
        FileRepoError::Parse("File element outside of a FileSet".to_string())
    })?;
    file_set.files.push(FileEntry {
        source: require_attr(e, b"Source")?,
        target: get_attr(e, b"Target")?,
    });
    Ok(())
}
