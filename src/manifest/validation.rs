//! Repository validation
//!
//! Reports logical misuse that rendering tolerates:
//! - More than one PackageType property
//! - Duplicate file set ids
//! - File sets without a name
//! - File entries with an empty source path

use super::model::{FileRepository, PACKAGE_TYPE_PROPERTY};
use std::collections::HashSet;

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub context: Option<String>,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: None,
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref ctx) = self.context {
            write!(f, "[{}] {}: {}", ctx, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a file repository
pub fn validate_repository(repo: &FileRepository) -> ValidationResult {
    let mut errors = Vec::new();

    let package_types = repo
        .properties
        .iter()
        .filter(|p| p.name == PACKAGE_TYPE_PROPERTY)
        .count();
    if package_types > 1 {
        errors.push(ValidationError::new(
            "properties",
            format!("PackageType is set {} times", package_types),
        ));
    }

    let mut seen_ids = HashSet::new();
    for (index, file_set) in repo.file_sets.iter().enumerate() {
        let id = file_set.id.to_string();
        let context = file_set
            .name
            .clone()
            .unwrap_or_else(|| format!("file set #{}", index));

        if !seen_ids.insert(id.clone()) {
            errors.push(
                ValidationError::new("id", format!("Duplicate file set id: {}", id))
                    .with_context(context.clone()),
            );
        }

        if file_set.name.is_none() {
            errors.push(
                ValidationError::new("name", "File set has no name").with_context(context.clone()),
            );
        }

        for (file_index, file) in file_set.files.iter().enumerate() {
            if file.source.is_empty() {
                errors.push(
                    ValidationError::new(
                        "files",
                        format!("File #{} has an empty source path", file_index),
                    )
                    .with_context(context.clone()),
                );
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::model::{FileEntry, FileSet, FileSetId, Property};

    fn named_set(name: &str, id: &str) -> FileSet {
        FileSet::new(Some(name.to_string()), FileSetId::from(id))
    }

    #[test]
    fn test_valid_repository() {
        let repo = FileRepository {
            properties: vec![Property::new(PACKAGE_TYPE_PROPERTY, "Loose")],
            file_sets: vec![named_set("Core", "a"), named_set("Docs", "b")],
        };
        assert!(validate_repository(&repo).is_ok());
    }

    #[test]
    fn test_duplicate_package_type() {
        let repo = FileRepository {
            properties: vec![
                Property::new(PACKAGE_TYPE_PROPERTY, "Loose"),
                Property::new(PACKAGE_TYPE_PROPERTY, "Packed"),
            ],
            file_sets: vec![],
        };
        let errors = validate_repository(&repo).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "properties");
    }

    #[test]
    fn test_duplicate_ids_and_missing_name() {
        let mut unnamed = FileSet::new(None, FileSetId::from("a"));
        unnamed.files.push(FileEntry::new(""));

        let repo = FileRepository {
            properties: vec![],
            file_sets: vec![named_set("Core", "a"), unnamed],
        };
        let errors = validate_repository(&repo).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "name", "files"]);
        assert_eq!(
            errors[0].to_string(),
            "[file set #1] id: Duplicate file set id: a"
        );
    }
}
