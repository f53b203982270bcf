//! Layout Placer - places multi-part layouts into a scene
//!
//! This library finds a layout definition by identifier, composes every part's
//! authored offset with one instance transform, resolves each part's resource
//! key, and places the parts one at a time through a [`PlacementCapability`].
//! Partial failure is an ordinary outcome: the returned [`RunResult`] accounts
//! for every part.
//!
//! # Example
//!
//! ```no_run
//! use layout_placer::{
//!     JsonLinesCapability, PlacementCapability, PlacementRequest, Placer, PlacerConfig, Vec3,
//! };
//!
//! let mut placer = Placer::new(PlacerConfig::new().with_definitions_dir("layouts"));
//! let request = PlacementRequest::new(Vec3::new(100.0, 200.0, 0.0)).with_yaw(90.0);
//! let mut plan = JsonLinesCapability::new(std::io::stdout());
//! let capability: &mut dyn PlacementCapability = &mut plan;
//!
//! let result = placer.place("long-corridor", &request, Some(capability)).unwrap();
//! println!("{}", result.summary());
//! ```

pub mod catalog;
pub mod config;
pub mod layout;
pub mod placement;

pub use catalog::{list_layouts, CatalogError, Listing, ListingEntry, ResolvedLayout};
pub use config::{ConfigError, PlacerConfig};
pub use layout::{DefinitionError, LayoutDefinition, PartSpec, ResourceHandle, Vec3};
pub use placement::{
    summarize, FailureReason, JsonLinesCapability, Orchestrator, Pacer, PlacementCall,
    PlacementCapability, PlacementOutcome, PlacementRequest, PlacementResponse, RunResult,
};

use thiserror::Error;
use tracing::info;

/// Errors that stop a placement run before any part is attempted
#[derive(Debug, Error)]
pub enum PlaceError {
    /// No placement capability was supplied
    #[error("placement capability not available")]
    CapabilityUnavailable,

    /// The identifier could not be resolved
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The resolved definition could not be loaded
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Entry point tying the catalog, the orchestrator and the configuration together
pub struct Placer {
    config: PlacerConfig,
    orchestrator: Orchestrator,
}

impl Placer {
    /// Create a placer that paces calls by sleeping the current thread
    pub fn new(config: PlacerConfig) -> Self {
        Self {
            config,
            orchestrator: Orchestrator::new(),
        }
    }

    /// Use a custom orchestrator (pacer, cancellation)
    pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    pub fn config(&self) -> &PlacerConfig {
        &self.config
    }

    /// A request at `origin` carrying the configured prefix and pacing
    pub fn request(&self, origin: Vec3) -> PlacementRequest {
        PlacementRequest::new(origin)
            .with_name_prefix(self.config.name_prefix.clone())
            .with_pacing_delay(self.config.pacing_delay)
    }

    /// List every definition in the configured directory
    pub fn list(&self) -> Result<Listing, CatalogError> {
        list_layouts(&self.config.definitions_dir)
    }

    /// Resolve an identifier and load its definition
    pub fn load(&self, identifier: &str) -> Result<LayoutDefinition, PlaceError> {
        let found = catalog::resolve(identifier, &self.config.definitions_dir)?;
        info!(
            "Using layout '{}' ({}, matched by {})",
            found.key,
            found.path.display(),
            found.tier
        );
        Ok(found.load()?)
    }

    /// Resolve, load and place a layout.
    ///
    /// Fails fast without touching the filesystem when `capability` is `None`.
    pub fn place(
        &mut self,
        identifier: &str,
        request: &PlacementRequest,
        capability: Option<&mut dyn PlacementCapability>,
    ) -> Result<RunResult, PlaceError> {
        let capability = capability.ok_or(PlaceError::CapabilityUnavailable)?;
        let layout = self.load(identifier)?;
        Ok(self.orchestrator.run(&layout, request, capability))
    }
}
