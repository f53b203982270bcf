//! Layout definitions and the math that places their parts
//!
//! This module loads layout documents, resolves their resource keys to scene
//! handles, and composes each part's local offset with the instance transform.

pub mod definition;
pub mod resources;
pub mod transform;
pub mod types;

pub use definition::{DefinitionError, LayoutDefinition, PartSpec};
pub use resources::{resolve_handle, ResourceHandle};
pub use transform::{compose, normalize_yaw, PlacementTransform};
pub use types::Vec3;
