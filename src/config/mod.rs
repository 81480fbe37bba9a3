//! Repository descriptions
//!
//! A YAML document declaring the package type and the file sets of a
//! repository, so a manifest can be produced without writing builder code:
//! - Package type (Loose, Packed, Bundle)
//! - File sets with directories to walk and explicit files
//! - Rendering layout

mod repository_config;

pub use repository_config::{DirectorySource, FileSetConfig, FileSource, RepositoryConfig};
