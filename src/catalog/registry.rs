//! Directory index of candidate layout definitions and the listing operation

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::layout::LayoutDefinition;

/// File name prefix shared by every layout definition
pub const DEFINITION_PREFIX: &str = "variation_";

/// File extension of layout definitions
pub const DEFINITION_EXTENSION: &str = ".json";

/// Errors that can occur while scanning or searching a definitions directory
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The definitions directory does not exist
    #[error("layout directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The definitions directory could not be read
    #[error("cannot read layout directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No candidate matched the identifier
    #[error(
        "layout '{identifier}' not found in {} (available: {})",
        directory.display(),
        available.join(", ")
    )]
    NotFound {
        identifier: String,
        directory: PathBuf,
        available: Vec<String>,
    },
}

impl CatalogError {
    /// Create a not-found error listing the available keys
    pub fn not_found(identifier: impl Into<String>, directory: &Path, available: Vec<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
            directory: directory.to_path_buf(),
            available,
        }
    }

    /// Get the available identifiers if this is a not-found error
    pub fn available(&self) -> Option<&[String]> {
        match self {
            Self::NotFound { available, .. } => Some(available),
            _ => None,
        }
    }
}

/// Canonical file name for a layout key, e.g. `variation_<key>.json`
pub fn canonical_file_name(key: &str) -> String {
    format!("{}{}{}", DEFINITION_PREFIX, key, DEFINITION_EXTENSION)
}

/// Extract the key from a definition file name, or `None` if the name does not
/// follow the `variation_<key>.json` convention
pub fn key_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(DEFINITION_PREFIX)?
        .strip_suffix(DEFINITION_EXTENSION)
}

/// One candidate definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Key portion of the file name
    pub key: String,
    /// Bare file name
    pub file_name: String,
    /// Full path to the file
    pub path: PathBuf,
}

impl CatalogEntry {
    /// Load and parse the definition this entry points at
    pub fn load(&self) -> Result<LayoutDefinition, crate::layout::DefinitionError> {
        LayoutDefinition::from_file(&self.path, &self.key)
    }
}

/// In-memory index of a definitions directory, sorted by file name
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    directory: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl CatalogIndex {
    /// Scan a directory for definition files.
    ///
    /// Entries are returned in lexicographic file-name order so that every
    /// search over the index is deterministic.
    pub fn scan(directory: &Path) -> Result<Self, CatalogError> {
        if !directory.is_dir() {
            return Err(CatalogError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let read_err = |source| CatalogError::ReadDir {
            path: directory.to_path_buf(),
            source,
        };

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(directory).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(key) = key_from_file_name(&file_name) else {
                continue;
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            entries.push(CatalogEntry {
                key: key.to_string(),
                file_name,
                path,
            });
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(Self {
            directory: directory.to_path_buf(),
            entries,
        })
    }

    /// Build an index from entries already in memory
    pub fn from_entries(directory: impl Into<PathBuf>, mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Self {
            directory: directory.into(),
            entries,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// All available keys, sorted
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summary of one definition file in a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingEntry {
    /// The file parsed successfully
    Layout {
        file: String,
        name: String,
        description: String,
        piece_count: usize,
        cell_count: usize,
    },
    /// The file could not be read or parsed
    Invalid { file: String, error: String },
}

impl ListingEntry {
    pub fn file(&self) -> &str {
        match self {
            Self::Layout { file, .. } | Self::Invalid { file, .. } => file,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Layout { .. })
    }
}

/// Result of listing a definitions directory
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub directory: PathBuf,
    pub count: usize,
    pub entries: Vec<ListingEntry>,
}

/// Enumerate every definition in a directory.
///
/// A file that fails to load becomes an [`ListingEntry::Invalid`] entry; only a
/// missing or unreadable directory is an error.
pub fn list_layouts(directory: &Path) -> Result<Listing, CatalogError> {
    let index = CatalogIndex::scan(directory)?;

    let entries: Vec<ListingEntry> = index
        .entries()
        .iter()
        .map(|entry| match entry.load() {
            Ok(def) => ListingEntry::Layout {
                file: entry.file_name.clone(),
                name: def.name,
                description: def.description,
                piece_count: def.parts.len(),
                cell_count: def.cell_count,
            },
            Err(e) => {
                warn!("Skipping {}: {}", entry.file_name, e);
                ListingEntry::Invalid {
                    file: entry.file_name.clone(),
                    error: e.to_string(),
                }
            }
        })
        .collect();

    Ok(Listing {
        directory: index.directory().to_path_buf(),
        count: entries.len(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_key_from_file_name() {
        assert_eq!(key_from_file_name("variation_A1.json"), Some("A1"));
        assert_eq!(key_from_file_name("variation_.json"), Some(""));
        assert_eq!(key_from_file_name("variation_A1.toml"), None);
        assert_eq!(key_from_file_name("layout_A1.json"), None);
    }

    #[test]
    fn test_canonical_file_name_round_trips_key() {
        let name = canonical_file_name("long_corridor");
        assert_eq!(name, "variation_long_corridor.json");
        assert_eq!(key_from_file_name(&name), Some("long_corridor"));
    }

    #[test]
    fn test_scan_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("variation_b.json"), "{}").unwrap();
        fs::write(dir.path().join("variation_a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("variation_c.yaml"), "ignored").unwrap();
        fs::create_dir(dir.path().join("variation_d.json")).unwrap();

        let index = CatalogIndex::scan(dir.path()).unwrap();
        assert_eq!(index.keys(), vec!["a", "b"]);
        assert_eq!(index.entries()[0].file_name, "variation_a.json");
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = CatalogIndex::scan(&missing).unwrap_err();
        assert!(matches!(err, CatalogError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_listing_reports_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("variation_good.json"),
            r#"{"name": "Good", "pieces": [{"mesh": "A"}, {"mesh": "B"}], "cells": [1]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("variation_bad.json"), "{ broken").unwrap();

        let listing = list_layouts(dir.path()).unwrap();
        assert_eq!(listing.count, 2);
        assert_eq!(listing.entries.len(), 2);

        assert_eq!(listing.entries[0].file(), "variation_bad.json");
        assert!(!listing.entries[0].is_valid());
        assert_eq!(
            listing.entries[1],
            ListingEntry::Layout {
                file: "variation_good.json".to_string(),
                name: "Good".to_string(),
                description: String::new(),
                piece_count: 2,
                cell_count: 1,
            }
        );
    }

    #[test]
    fn test_not_found_display_lists_alternatives() {
        let err = CatalogError::not_found(
            "zeta",
            Path::new("layouts"),
            vec!["alpha".to_string(), "beta".to_string()],
        );
        let msg = err.to_string();
        assert!(msg.contains("'zeta'"));
        assert!(msg.contains("alpha, beta"));
        assert_eq!(err.available().unwrap().len(), 2);
    }
}
