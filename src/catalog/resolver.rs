//! Identifier resolution - finds the layout definition a caller asked for
//!
//! Matching runs in three tiers and the first hit wins:
//! 1. **Exact key**: `variation_<identifier>.json` exists in the directory
//! 2. **File key**: the normalized identifier and a file's key contain one another
//! 3. **Declared name**: the same test against the `name` inside each document
//!
//! Tiers 2 and 3 walk the index in file-name order, so a short identifier
//! resolves to the first file that contains it.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::layout::{DefinitionError, LayoutDefinition};

use super::registry::{canonical_file_name, CatalogEntry, CatalogError, CatalogIndex};

/// Which matching tier produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    ExactKey,
    FileKey,
    DeclaredName,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ExactKey => "exact key",
            Self::FileKey => "file key",
            Self::DeclaredName => "declared name",
        };
        f.write_str(s)
    }
}

/// A located definition file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub key: String,
    pub path: PathBuf,
    pub tier: MatchTier,
}

impl ResolvedLayout {
    fn from_entry(entry: &CatalogEntry, tier: MatchTier) -> Self {
        Self {
            key: entry.key.clone(),
            path: entry.path.clone(),
            tier,
        }
    }

    /// Load and parse the resolved definition
    pub fn load(&self) -> Result<LayoutDefinition, DefinitionError> {
        LayoutDefinition::from_file(&self.path, &self.key)
    }
}

/// Normalize an identifier for fuzzy comparison: lowercase, with `-` and spaces
/// mapped to `_`
pub fn normalize_identifier(s: &str) -> String {
    s.to_lowercase().replace(['-', ' '], "_")
}

/// Either normalized string contains the other. Empty strings never match.
pub fn fuzzy_matches(search: &str, candidate: &str) -> bool {
    if search.is_empty() || candidate.is_empty() {
        return false;
    }
    search.contains(candidate) || candidate.contains(search)
}

/// Tier 1: the canonical file for `identifier` exists in `directory`
pub fn match_exact_key(identifier: &str, directory: &Path) -> Option<ResolvedLayout> {
    if identifier.is_empty() || identifier.contains(['/', '\\']) {
        return None;
    }
    let path = directory.join(canonical_file_name(identifier));
    path.is_file().then(|| ResolvedLayout {
        key: identifier.to_string(),
        path,
        tier: MatchTier::ExactKey,
    })
}

/// Tier 2: first entry whose normalized key fuzzily matches the identifier
pub fn match_file_key<'a>(index: &'a CatalogIndex, identifier: &str) -> Option<&'a CatalogEntry> {
    let search = normalize_identifier(identifier);
    index
        .entries()
        .iter()
        .find(|entry| fuzzy_matches(&search, &normalize_identifier(&entry.key)))
}

/// Tier 3: first entry whose declared name fuzzily matches the identifier.
///
/// Entries that fail to load are skipped.
pub fn match_declared_name<'a, F>(
    index: &'a CatalogIndex,
    identifier: &str,
    mut load: F,
) -> Option<&'a CatalogEntry>
where
    F: FnMut(&CatalogEntry) -> Result<LayoutDefinition, DefinitionError>,
{
    let search = normalize_identifier(identifier);
    index.entries().iter().find(|entry| match load(entry) {
        Ok(def) => fuzzy_matches(&search, &normalize_identifier(&def.name)),
        Err(e) => {
            warn!("Skipping {} while matching names: {}", entry.file_name, e);
            false
        }
    })
}

/// Resolve an identifier against a definitions directory
pub fn resolve(identifier: &str, directory: &Path) -> Result<ResolvedLayout, CatalogError> {
    resolve_with(identifier, directory, CatalogEntry::load)
}

/// Resolve an identifier using a custom definition loader for tier 3
pub fn resolve_with<F>(
    identifier: &str,
    directory: &Path,
    load: F,
) -> Result<ResolvedLayout, CatalogError>
where
    F: FnMut(&CatalogEntry) -> Result<LayoutDefinition, DefinitionError>,
{
    let index = CatalogIndex::scan(directory)?;

    if let Some(found) = match_exact_key(identifier, directory) {
        debug!("Resolved '{}' by {}: {}", identifier, found.tier, found.path.display());
        return Ok(found);
    }

    let found = match_file_key(&index, identifier)
        .map(|entry| ResolvedLayout::from_entry(entry, MatchTier::FileKey))
        .or_else(|| {
            match_declared_name(&index, identifier, load)
                .map(|entry| ResolvedLayout::from_entry(entry, MatchTier::DeclaredName))
        });

    match found {
        Some(found) => {
            debug!("Resolved '{}' by {}: {}", identifier, found.tier, found.path.display());
            Ok(found)
        }
        None => Err(CatalogError::not_found(identifier, directory, index.keys())),
    }
}
