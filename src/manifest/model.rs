//! In-memory data model of a file repository manifest

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::FileRepoError;

/// Property name used for the package type
pub const PACKAGE_TYPE_PROPERTY: &str = "PackageType";

/// Packaging strategy the downstream installer tool should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageType {
    Loose,
    Packed,
    Bundle,
}

impl PackageType {
    /// Textual name as written to the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Loose => "Loose",
            PackageType::Packed => "Packed",
            PackageType::Bundle => "Bundle",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = FileRepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Loose" => Ok(PackageType::Loose),
            "Packed" => Ok(PackageType::Packed),
            "Bundle" => Ok(PackageType::Bundle),
            other => Err(FileRepoError::Parse(format!(
                "Unknown package type: {}",
                other
            ))),
        }
    }
}

/// A name/value pair attached to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Get the package type if this is a well-formed package type property
    pub fn package_type(&self) -> Option<PackageType> {
        if self.name == PACKAGE_TYPE_PROPERTY {
            self.value.parse().ok()
        } else {
            None
        }
    }
}

/// Identifier of a file set
///
/// UUIDs render as upper-case canonical strings. Raw identifiers supplied by
/// the caller render unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileSetId {
    Uuid(Uuid),
    Raw(String),
}

impl FileSetId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        FileSetId::Uuid(Uuid::new_v4())
    }

    /// Interpret a string read back from a manifest
    ///
    /// Anything that parses as a UUID becomes [`FileSetId::Uuid`].
    pub fn parse(s: &str) -> Self {
        match Uuid::parse_str(s) {
            Ok(uuid) => FileSetId::Uuid(uuid),
            Err(_) => FileSetId::Raw(s.to_string()),
        }
    }

    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            FileSetId::Uuid(uuid) => Some(uuid),
            FileSetId::Raw(_) => None,
        }
    }
}

impl fmt::Display for FileSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSetId::Uuid(uuid) => {
                let mut buf = Uuid::encode_buffer();
                f.write_str(uuid.hyphenated().encode_upper(&mut buf))
            }
            FileSetId::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<Uuid> for FileSetId {
    fn from(uuid: Uuid) -> Self {
        FileSetId::Uuid(uuid)
    }
}

impl From<String> for FileSetId {
    fn from(s: String) -> Self {
        FileSetId::Raw(s)
    }
}

impl From<&str> for FileSetId {
    fn from(s: &str) -> Self {
        FileSetId::Raw(s.to_string())
    }
}

/// One file reference within a file set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path of the file relative to the source directory
    pub source: String,

    /// Destination path, when different from `source`
    pub target: Option<String>,
}

impl FileEntry {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Path the installer places this file at
    pub fn destination(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.source)
    }
}

/// A named, uniquely identified group of files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    pub name: Option<String>,
    pub id: FileSetId,
    pub source_package: Option<String>,
    pub files: Vec<FileEntry>,
}

impl FileSet {
    pub fn new(name: Option<String>, id: FileSetId) -> Self {
        Self {
            name,
            id,
            source_package: None,
            files: Vec::new(),
        }
    }
}

/// The whole manifest: package properties plus ordered file sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRepository {
    pub properties: Vec<Property>,
    pub file_sets: Vec<FileSet>,
}

impl FileRepository {
    /// Package types declared by `PackageType` properties, in order
    pub fn package_types(&self) -> Vec<PackageType> {
        self.properties
            .iter()
            .filter_map(Property::package_type)
            .collect()
    }

    /// Get a file set by name
    pub fn file_set(&self, name: &str) -> Option<&FileSet> {
        self.file_sets
            .iter()
            .find(|fs| fs.name.as_deref() == Some(name))
    }

    /// Total number of file entries across all file sets
    pub fn file_count(&self) -> usize {
        self.file_sets.iter().map(|fs| fs.files.len()).sum()
    }
}
