//! Resolution of short resource keys to fully-qualified scene handles

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// A fully-qualified reference to a placeable scene asset.
///
/// Scene asset references repeat the asset name after a dot, e.g.
/// `/Game/Meshes/SM_Wall.SM_Wall`. The handle keeps the container path and the
/// asset name apart; [`fmt::Display`] renders the qualified form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    /// Path up to and including the terminal segment, e.g. `/Game/Meshes/SM_Wall`
    pub container_path: String,
    /// Name repeated after the dot; `None` when the stored path is already qualified
    pub asset_name: Option<String>,
}

impl ResourceHandle {
    /// Build a handle from a stored path, qualifying it when needed.
    ///
    /// A path whose terminal segment (after the last `/`) already contains a dot
    /// is taken verbatim.
    pub fn from_path(path: &str) -> Self {
        let terminal = path.rsplit('/').next().unwrap_or(path);
        let asset_name = if terminal.contains('.') {
            None
        } else {
            Some(terminal.to_string())
        };
        Self {
            container_path: path.to_string(),
            asset_name,
        }
    }

    /// The qualified string form expected by the scene service
    pub fn qualified(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.asset_name {
            Some(name) => write!(f, "{}.{}", self.container_path, name),
            None => f.write_str(&self.container_path),
        }
    }
}

impl Serialize for ResourceHandle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Look up `short_key` in a layout's resource map.
///
/// Returns `None` when the key is not declared by the layout.
pub fn resolve_handle(
    short_key: &str,
    resource_keys: &HashMap<String, String>,
) -> Option<ResourceHandle> {
    resource_keys
        .get(short_key)
        .map(|path| ResourceHandle::from_path(path))
}
