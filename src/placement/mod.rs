//! Placement of layout parts through an external scene service
//!
//! The [`Orchestrator`] walks a layout's parts in order, composes each part's
//! transform, and hands one [`PlacementCall`] at a time to a
//! [`PlacementCapability`]. Every part produces a [`PlacementOutcome`]; the
//! outcomes are folded into a [`RunResult`].

mod capability;
mod orchestrator;
mod outcome;
mod request;

pub use capability::{
    JsonLinesCapability, PlacementCall, PlacementCapability, PlacementResponse, ACTOR_TYPE,
    SUCCESS_STATUS,
};
pub use orchestrator::{instance_name, sanitize_label, Orchestrator, Pacer, ThreadSleep, NO_PARTS_REASON};
pub use outcome::{
    summarize, FailureReason, OutcomeStatus, PlacementOutcome, ResolvedPlacement, RunResult,
};
pub use request::{pacing_from_secs, PlacementRequest};
