//! Layout definition documents
//!
//! A layout definition is a JSON document describing one reusable assembly:
//! the resource keys it uses and an ordered list of parts placed relative to
//! the layout origin.
//!
//! ```json
//! {
//!   "name": "Hab - Long Corridor",
//!   "description": "Two modules joined by a corridor",
//!   "mesh_paths": { "Wall": "/Game/Hab/SM_Wall" },
//!   "pieces": [
//!     { "index": 0, "rel": [0, 0, 0], "yaw": 90, "mesh": "Wall", "label": "North Wall" }
//!   ],
//!   "cells": []
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::layout::types::Vec3;

/// Errors that can occur when loading a layout definition
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("failed to read layout definition {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout definition {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DefinitionError {
    /// The file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// One authored placement unit inside a layout
#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    /// Stable index; the document's `index`, or the part's position in the list
    pub index: usize,
    /// Human identifier used to derive the placed instance name
    pub label: String,
    /// Offset from the layout origin, before rotation
    pub offset: Vec3,
    /// Yaw in degrees, before composition with the instance yaw
    pub yaw: f64,
    /// Key into the layout's resource map
    pub resource_key: String,
}

/// A loaded layout definition
#[derive(Debug, Clone)]
pub struct LayoutDefinition {
    pub name: String,
    pub description: String,
    /// Parts in placement order
    pub parts: Vec<PartSpec>,
    /// Short resource key -> handle path
    pub resource_keys: HashMap<String, String>,
    /// Number of cells declared by the document (informational)
    pub cell_count: usize,
}

/// JSON structure for deserializing layout documents
#[derive(Deserialize)]
struct JsonLayout {
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    mesh_paths: HashMap<String, String>,
    #[serde(default)]
    pieces: Vec<JsonPiece>,
    #[serde(default)]
    cells: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct JsonPiece {
    index: Option<usize>,
    #[serde(default)]
    rel: Vec3,
    #[serde(default)]
    yaw: f64,
    #[serde(default)]
    mesh: String,
    label: Option<String>,
}

impl LayoutDefinition {
    /// Load a definition from a JSON file.
    ///
    /// `fallback_name` is used when the document declares no `name`.
    pub fn from_file(path: &Path, fallback_name: &str) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content, fallback_name).map_err(|source| DefinitionError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a definition from a JSON string
    pub fn from_str(content: &str, fallback_name: &str) -> Result<Self, serde_json::Error> {
        let parsed: JsonLayout = serde_json::from_str(content)?;

        let parts = parsed
            .pieces
            .into_iter()
            .enumerate()
            .map(|(ordinal, piece)| {
                let index = piece.index.unwrap_or(ordinal);
                PartSpec {
                    index,
                    label: piece.label.unwrap_or_else(|| format!("piece_{}", index)),
                    offset: piece.rel,
                    yaw: piece.yaw,
                    resource_key: piece.mesh,
                }
            })
            .collect();

        Ok(LayoutDefinition {
            name: parsed.name.unwrap_or_else(|| fallback_name.to_string()),
            description: parsed.description,
            parts,
            resource_keys: parsed.mesh_paths,
            cell_count: parsed.cells.len(),
        })
    }

    /// A layout with no parts cannot be placed
    pub fn is_usable(&self) -> bool {
        !self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let json = r#"{
            "name": "Hab A",
            "description": "test hab",
            "mesh_paths": { "Wall": "/Game/SM_Wall" },
            "pieces": [
                { "index": 4, "rel": [10, -5, 0], "yaw": 90, "mesh": "Wall", "label": "North Wall" },
                { "rel": [0, 0, 300], "yaw": 0, "mesh": "Roof" }
            ],
            "cells": [{}, {}, {}]
        }"#;
        let def = LayoutDefinition::from_str(json, "fallback").unwrap();
        assert_eq!(def.name, "Hab A");
        assert_eq!(def.description, "test hab");
        assert_eq!(def.cell_count, 3);
        assert_eq!(def.parts.len(), 2);

        assert_eq!(def.parts[0].index, 4);
        assert_eq!(def.parts[0].label, "North Wall");
        assert_eq!(def.parts[0].offset, Vec3::new(10.0, -5.0, 0.0));
        assert_eq!(def.parts[0].yaw, 90.0);
        assert_eq!(def.parts[0].resource_key, "Wall");

        // Missing index and label fall back to the ordinal
        assert_eq!(def.parts[1].index, 1);
        assert_eq!(def.parts[1].label, "piece_1");
    }

    #[test]
    fn test_defaults_for_sparse_document() {
        let def = LayoutDefinition::from_str(r#"{ "pieces": [ { "mesh": "A" } ] }"#, "key")
            .unwrap();
        assert_eq!(def.name, "key");
        assert_eq!(def.description, "");
        assert_eq!(def.cell_count, 0);
        assert!(def.resource_keys.is_empty());
        assert_eq!(def.parts[0].offset, Vec3::zero());
        assert_eq!(def.parts[0].yaw, 0.0);
        assert!(def.is_usable());
    }

    #[test]
    fn test_empty_parts_loads_but_is_not_usable() {
        let def = LayoutDefinition::from_str(r#"{ "name": "Empty" }"#, "x").unwrap();
        assert!(def.parts.is_empty());
        assert!(!def.is_usable());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(LayoutDefinition::from_str("{ not json", "x").is_err());
        assert!(LayoutDefinition::from_str(r#"{ "pieces": [ { "rel": "up" } ] }"#, "x").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = Path::new("definitely/not/here/variation_x.json");
        let err = LayoutDefinition::from_file(path, "x").unwrap_err();
        assert!(matches!(err, DefinitionError::Io { .. }));
        assert_eq!(err.path(), path);
        assert!(err.to_string().contains("variation_x.json"));
    }
}
