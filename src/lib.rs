//! filerepo - XML file repository manifests for installer tooling
//!
//! A file repository manifest tells an installer build tool which files to
//! package: a package type property plus named, uniquely identified file sets,
//! each listing source paths (optionally mapped to other destinations).
//! This crate builds and renders that document; it does not build installers.
//!
//! # Architecture
//!
//! - **manifest**: Data model, builders, XML rendering and reading
//! - **config**: YAML repository descriptions turned into builders
//! - **logging**: tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;

// Re-exports
pub use error::{FileRepoError, Result};
pub use manifest::{FileRepository, FileSetId, PackageType, RenderOptions, RepositoryBuilder};
