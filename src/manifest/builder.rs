//! Builders that accumulate a file repository and render it

use std::path::Path;

use walkdir::WalkDir;

use super::model::{
    FileEntry, FileRepository, FileSet, FileSetId, PackageType, Property, PACKAGE_TYPE_PROPERTY,
};
use super::validation::{validate_repository, ValidationResult};
use super::writer::{render, RenderOptions};
use crate::{FileRepoError, Result};

/// Accumulates package properties and file sets, then renders the manifest
///
/// Nothing is deduplicated: setting the package type twice yields two
/// properties, and file set ids are not checked for uniqueness. Use
/// [`RepositoryBuilder::validate`] to find such problems.
#[derive(Debug, Clone, Default)]
pub struct RepositoryBuilder {
    repo: FileRepository,
}

impl RepositoryBuilder {
    /// Create a builder with no properties and no file sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `PackageType` property
    pub fn set_package_type(&mut self, package_type: PackageType) -> &mut Self {
        tracing::debug!(package_type = %package_type, "Setting package type");
        self.repo
            .properties
            .push(Property::new(PACKAGE_TYPE_PROPERTY, package_type.as_str()));
        self
    }

    /// Append a new file set and return a handle for populating it
    ///
    /// A random UUID is generated when `id` is `None`.
    pub fn add_file_set(&mut self, name: Option<&str>, id: Option<FileSetId>) -> FileSetBuilder<'_> {
        let id = id.unwrap_or_else(FileSetId::generate);
        tracing::debug!(name = ?name, id = %id, "Adding file set");

        self.repo
            .file_sets
            .push(FileSet::new(name.map(str::to_string), id));
        let index = self.repo.file_sets.len() - 1;
        FileSetBuilder {
            file_set: &mut self.repo.file_sets[index],
        }
    }

    /// Reopen a previously added file set by position
    pub fn file_set_mut(&mut self, index: usize) -> Option<FileSetBuilder<'_>> {
        self.repo
            .file_sets
            .get_mut(index)
            .map(|file_set| FileSetBuilder { file_set })
    }

    /// Render the manifest with the default indentation
    pub fn finalize(&self, pretty_print: bool) -> Result<String> {
        let options = RenderOptions {
            pretty_print,
            ..RenderOptions::default()
        };
        self.finalize_with(&options)
    }

    /// Render the manifest with explicit layout options
    pub fn finalize_with(&self, options: &RenderOptions) -> Result<String> {
        render(&self.repo, options)
    }

    /// Report duplicate ids, repeated package types and similar misuse
    pub fn validate(&self) -> ValidationResult {
        validate_repository(&self.repo)
    }

    pub fn repository(&self) -> &FileRepository {
        &self.repo
    }

    pub fn into_repository(self) -> FileRepository {
        self.repo
    }
}

impl From<FileRepository> for RepositoryBuilder {
    fn from(repo: FileRepository) -> Self {
        Self { repo }
    }
}

/// Handle for populating one file set
#[derive(Debug)]
pub struct FileSetBuilder<'a> {
    file_set: &'a mut FileSet,
}

impl FileSetBuilder<'_> {
    /// Record the package this file set originates from
    pub fn set_source_package(&mut self, reference: impl Into<String>) -> &mut Self {
        let reference = reference.into();
        tracing::debug!(id = %self.file_set.id, source_package = %reference, "Setting source package");
        self.file_set.source_package = Some(reference);
        self
    }

    /// Append a single file entry
    pub fn add_file(&mut self, source: impl Into<String>, target: Option<String>) -> &mut Self {
        self.file_set.files.push(FileEntry {
            source: source.into(),
            target,
        });
        self
    }

    /// Add every file found below `base`, recursively
    ///
    /// Each entry's source is `prefix`, the file's directory relative to
    /// `base` and the file name, joined with `/`. Directories themselves are
    /// never listed and symbolic links are not followed. Walk order is
    /// whatever the filesystem returns. Returns the number of entries added.
    pub fn add_files_from_directory(&mut self, base: impl AsRef<Path>, prefix: &str) -> Result<usize> {
        let base = base.as_ref();
        let mut added = 0;

        for entry in WalkDir::new(base).min_depth(1).follow_links(false) {
            let entry = entry?;

            if entry.file_type().is_dir() {
                continue;
            }
            if entry.path_is_symlink() && entry.path().is_dir() {
                tracing::debug!(path = %entry.path().display(), "Skipping symlinked directory");
                continue;
            }

            let relative = entry.path().strip_prefix(base).map_err(|_| {
                FileRepoError::Other(format!(
                    "{} is not below {}",
                    entry.path().display(),
                    base.display()
                ))
            })?;

            self.file_set
                .files
                .push(FileEntry::new(join_source(prefix, relative)?));
            added += 1;
        }

        tracing::info!(
            base = %base.display(),
            prefix,
            files = added,
            "Added files from directory"
        );

        Ok(added)
    }

    /// Sort entries by source path
    pub fn sort_files(&mut self) -> &mut Self {
        self.file_set.files.sort_by(|a, b| a.source.cmp(&b.source));
        self
    }

    pub fn id(&self) -> &FileSetId {
        &self.file_set.id
    }

    pub fn name(&self) -> Option<&str> {
        self.file_set.name.as_deref()
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.file_set.files
    }

    /// The file set as accumulated so far
    pub fn get(&self) -> &FileSet {
        &*self.file_set
    }
}

/// Join a prefix and a relative path with `/`
///
/// A separator is only inserted when the text so far does not already end
/// in one, so a prefix of `/` keeps its root.
fn join_source(prefix: &str, relative: &Path) -> Result<String> {
    let mut source = prefix.to_string();

    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            FileRepoError::Other(format!("Path is not valid UTF-8: {}", relative.display()))
        })?;
        if !source.is_empty() && !source.ends_with('/') {
            source.push('/');
        }
        source.push_str(part);
    }

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn make_tree(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for file in files {
            let path = temp_dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"content").unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_new_builder_is_empty() {
        let builder = RepositoryBuilder::new();
        assert!(builder.repository().properties.is_empty());
        assert!(builder.repository().file_sets.is_empty());
    }

    #[test]
    fn test_set_package_type_appends() {
        let mut builder = RepositoryBuilder::new();
        builder
            .set_package_type(PackageType::Loose)
            .set_package_type(PackageType::Bundle);

        let props = &builder.repository().properties;
        assert_eq!(props.len(), 2);
        assert_eq!(props[0], Property::new("PackageType", "Loose"));
        assert_eq!(props[1], Property::new("PackageType", "Bundle"));
    }

    #[test]
    fn test_add_file_set_generates_id() {
        let mut builder = RepositoryBuilder::new();
        let first = builder.add_file_set(Some("Core"), None).id().clone();
        let second = builder.add_file_set(None, None).id().clone();

        assert!(first.as_uuid().is_some());
        assert_ne!(first, second);
        assert_eq!(builder.repository().file_sets[1].name, None);
    }

    #[test]
    fn test_add_file_set_keeps_supplied_id() {
        let uuid = Uuid::parse_str("0f8fad5b-d9cb-469f-a165-70867728950e").unwrap();
        let mut builder = RepositoryBuilder::new();
        let set = builder.add_file_set(Some("Core"), Some(uuid.into()));
        assert_eq!(set.id().to_string(), "0F8FAD5B-D9CB-469F-A165-70867728950E");
        assert_eq!(set.name(), Some("Core"));
    }

    #[test]
    fn test_source_package_is_stored_but_not_rendered() {
        let mut builder = RepositoryBuilder::new();
        builder
            .add_file_set(Some("Core"), Some("core".into()))
            .set_source_package("core.pack");

        assert_eq!(
            builder.repository().file_sets[0].source_package.as_deref(),
            Some("core.pack")
        );

        let xml = builder.finalize(false).unwrap();
        assert!(xml.contains(r#"<FileSet Name="Core" Id="core"/>"#));

        let options = RenderOptions {
            emit_source_package: true,
            ..RenderOptions::compact()
        };
        let xml = builder.finalize_with(&options).unwrap();
        assert!(xml.contains(r#"<FileSet Name="Core" Id="core" SourcePackage="core.pack"/>"#));
    }

    #[test]
    fn test_add_file_with_target() {
        let mut builder = RepositoryBuilder::new();
        builder
            .add_file_set(Some("Core"), None)
            .add_file("bin/tool", None)
            .add_file("tool.cfg", Some("etc/tool.cfg".to_string()));

        let files = &builder.repository().file_sets[0].files;
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].destination(), "etc/tool.cfg");
    }

    #[test]
    fn test_add_files_from_directory() {
        crate::logging::init_test();
        let temp_dir = make_tree(&["a/b.txt", "c.txt", "a/deep/d.bin"]);
        fs::create_dir_all(temp_dir.path().join("empty/nested")).unwrap();

        let mut builder = RepositoryBuilder::new();
        let mut set = builder.add_file_set(Some("Core"), None);
        let added = set.add_files_from_directory(temp_dir.path(), "data").unwrap();
        set.sort_files();

        assert_eq!(added, 3);
        let sources: Vec<&str> = set.files().iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["data/a/b.txt", "data/a/deep/d.bin", "data/c.txt"]);
    }

    #[test]
    fn test_add_files_without_prefix() {
        let temp_dir = make_tree(&["x/y.txt", "z.txt"]);

        let mut builder = RepositoryBuilder::new();
        let mut set = builder.add_file_set(None, None);
        set.add_files_from_directory(temp_dir.path(), "").unwrap();
        set.sort_files();

        let sources: Vec<&str> = set.files().iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["x/y.txt", "z.txt"]);
    }

    #[test]
    fn test_add_files_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let mut builder = RepositoryBuilder::new();
        let result = builder
            .add_file_set(Some("Core"), None)
            .add_files_from_directory(&missing, "");
        assert!(matches!(result, Err(FileRepoError::Walk(_))));
    }

    #[test]
    fn test_file_set_mut_reopens() {
        let mut builder = RepositoryBuilder::new();
        builder.add_file_set(Some("Core"), None);
        builder.add_file_set(Some("Docs"), None);

        builder.file_set_mut(0).unwrap().add_file("late.txt", None);
        assert!(builder.file_set_mut(2).is_none());
        assert_eq!(builder.repository().file_sets[0].files.len(), 1);
        assert!(builder.repository().file_sets[1].files.is_empty());
    }

    #[test]
    fn test_join_source() {
        assert_eq!(join_source("data", Path::new("a/b.txt")).unwrap(), "data/a/b.txt");
        assert_eq!(join_source("data/", Path::new("c.txt")).unwrap(), "data/c.txt");
        assert_eq!(join_source("", Path::new("c.txt")).unwrap(), "c.txt");
        assert_eq!(join_source("/", Path::new("c.txt")).unwrap(), "/c.txt");
        assert_eq!(join_source("/", Path::new("a/b.txt")).unwrap(), "/a/b.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_listed_not_followed() {
        crate::logging::init_test();
        use std::os::unix::fs::symlink;

        let temp_dir = make_tree(&["real/f.txt"]);
        let root = temp_dir.path();
        // Directory links, including one that loops back to the root
        symlink(root, root.join("real/loop")).unwrap();
        symlink(root.join("real"), root.join("dlink")).unwrap();
        // A link to a file and a link to nothing
        symlink(root.join("real/f.txt"), root.join("flink")).unwrap();
        symlink(root.join("missing"), root.join("dangling")).unwrap();

        let mut builder = RepositoryBuilder::new();
        let mut set = builder.add_file_set(Some("Links"), None);
        let added = set.add_files_from_directory(root, "").unwrap();
        set.sort_files();

        assert_eq!(added, 3);
        let sources: Vec<&str> = set.files().iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["dangling", "flink", "real/f.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_root_prefix_keeps_leading_slash() {
        let temp_dir = make_tree(&["a/b.txt", "c.txt"]);

        let mut builder = RepositoryBuilder::new();
        let mut set = builder.add_file_set(None, None);
        set.add_files_from_directory(temp_dir.path(), "/").unwrap();
        set.sort_files();

        let sources: Vec<&str> = set.files().iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["/a/b.txt", "/c.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_fails() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(OsStr::from_bytes(b"\xff")), b"x").unwrap();

        let mut builder = RepositoryBuilder::new();
        let result = builder
            .add_file_set(Some("Core"), None)
            .add_files_from_directory(temp_dir.path(), "");
        assert!(matches!(result, Err(FileRepoError::Other(_))));
    }
}
