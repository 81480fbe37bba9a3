//! File repository manifests
//!
//! Builds, renders and reads the XML document an installer build tool takes
//! as input: package properties plus named file sets listing the files to
//! package.
//!
//! # Example Repository
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <FileRepository>
//!   <Properties>
//!     <Property Name="PackageType" Value="Packed"/>
//!   </Properties>
//!   <FileSets>
//!     <FileSet Name="Core" Id="0F8FAD5B-D9CB-469F-A165-70867728950E">
//!       <File Source="data/a/b.txt"/>
//!       <File Source="data/c.txt"/>
//!     </FileSet>
//!   </FileSets>
//! </FileRepository>
//! ```
//!
//! # Building one
//!
//! ```no_run
//! use filerepo::manifest::{PackageType, RepositoryBuilder};
//!
//! let mut builder = RepositoryBuilder::new();
//! builder.set_package_type(PackageType::Packed);
//! builder
//!     .add_file_set(Some("Core"), None)
//!     .add_files_from_directory("build/core", "data")?;
//! let xml = builder.finalize(true)?;
//! # Ok::<(), filerepo::FileRepoError>(())
//! ```

mod builder;
mod model;
mod parser;
pub mod validation;
mod writer;

pub use builder::{FileSetBuilder, RepositoryBuilder};
pub use model::{
    FileEntry, FileRepository, FileSet, FileSetId, PackageType, Property, PACKAGE_TYPE_PROPERTY,
};
pub use validation::{validate_repository, ValidationError, ValidationResult};
pub use writer::{render, RenderOptions, XML_DECLARATION};
