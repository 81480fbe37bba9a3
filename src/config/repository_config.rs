//! Repository description file handling
//!
//! Loads a YAML description of a file repository and turns it into a
//! [`RepositoryBuilder`].

use crate::manifest::{FileSetId, PackageType, RenderOptions, RepositoryBuilder};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A directory walked into a file set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySource {
    /// Directory to walk; relative paths resolve against the description's base
    pub path: PathBuf,

    /// Prefix prepended to every discovered source path
    #[serde(default)]
    pub prefix: String,
}

/// A single explicitly listed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSource {
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One file set in the description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Identifier; UUID strings render upper-cased, anything else verbatim.
    /// Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_package: Option<String>,

    #[serde(default)]
    pub directories: Vec<DirectorySource>,

    #[serde(default)]
    pub files: Vec<FileSource>,

    /// Sort entries by source after population
    #[serde(default)]
    pub sort: bool,
}

/// Declarative description of a whole file repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<PackageType>,

    #[serde(default)]
    pub file_sets: Vec<FileSetConfig>,

    /// Layout used when rendering
    #[serde(default)]
    pub render: RenderOptions,
}

impl RepositoryConfig {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a description from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a description from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::FileRepoError::Config(format!(
                "Repository description not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading repository description");

        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;

        tracing::debug!(
            file_sets = config.file_sets.len(),
            package_type = ?config.package_type,
            "Repository description loaded"
        );

        Ok(config)
    }

    /// Save the description to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving repository description");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Build the repository this description declares
    ///
    /// Relative directory paths resolve against `base_dir` when given,
    /// otherwise against the current directory. Directories are walked in
    /// listed order, before the explicit files of the same set.
    pub fn to_builder(&self, base_dir: Option<&Path>) -> Result<RepositoryBuilder> {
        let mut builder = RepositoryBuilder::new();

        if let Some(package_type) = self.package_type {
            builder.set_package_type(package_type);
        }

        for set_config in &self.file_sets {
            let id = set_config
                .id
                .as_deref()
                .map(FileSetId::parse);
            let mut file_set = builder.add_file_set(set_config.name.as_deref(), id);

            if let Some(ref source_package) = set_config.source_package {
                file_set.set_source_package(source_package.clone());
            }

            for dir in &set_config.directories {
                let path = match base_dir {
                    Some(base) if dir.path.is_relative() => base.join(&dir.path),
                    _ => dir.path.clone(),
                };
                file_set.add_files_from_directory(&path, &dir.prefix)?;
            }

            for file in &set_config.files {
                file_set.add_file(file.source.clone(), file.target.clone());
            }

            if set_config.sort {
                file_set.sort_files();
            }
        }

        Ok(builder)
    }

    /// Build and render in one step using the description's layout
    pub fn render(&self, base_dir: Option<&Path>) -> Result<String> {
        self.to_builder(base_dir)?.finalize_with(&self.render)
    }
}
