//! Discovery of layout definitions on disk
//!
//! Layout definitions live in a single directory as `variation_<key>.json`
//! files. This module indexes that directory, lists what it contains, and
//! resolves a caller's identifier to one definition file.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use layout_placer::catalog::{list_layouts, resolve};
//!
//! let dir = Path::new("layouts");
//! for entry in list_layouts(dir)?.entries {
//!     println!("{}", entry.file());
//! }
//! let found = resolve("long-corridor", dir)?;
//! let layout = found.load()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod registry;
mod resolver;

pub use registry::{
    canonical_file_name, key_from_file_name, list_layouts, CatalogEntry, CatalogError,
    CatalogIndex, Listing, ListingEntry, DEFINITION_EXTENSION, DEFINITION_PREFIX,
};
pub use resolver::{
    fuzzy_matches, match_declared_name, match_exact_key, match_file_key, normalize_identifier,
    resolve, resolve_with, MatchTier, ResolvedLayout,
};
