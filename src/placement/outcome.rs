//! Per-part outcomes and the run ledger

use std::fmt;

use serde::Serialize;

use crate::layout::{ResourceHandle, Vec3};

use super::request::PlacementRequest;

/// Why a part was not placed
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// The part's resource key is not declared by the layout
    UnknownResource { key: String },
    /// The scene service answered with something other than success
    Rejected { message: String },
    /// The scene service gave no response
    NoResponse,
    /// The run was cancelled before this part was attempted
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownResource { key } => write!(f, "unknown resource: {}", key),
            Self::Rejected { message } => f.write_str(message),
            Self::NoResponse => f.write_str("no response"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl Serialize for FailureReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where a part was (or would have been) placed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlacement {
    pub instance_name: String,
    pub handle: ResourceHandle,
    pub location: Vec3,
    pub yaw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Placed,
    Failed {
        #[serde(rename = "error")]
        reason: FailureReason,
    },
}

/// Result of attempting one part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementOutcome {
    pub index: usize,
    pub label: String,
    /// Present once the handle resolved and the transform was composed
    #[serde(flatten)]
    pub placement: Option<ResolvedPlacement>,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl PlacementOutcome {
    pub fn placed(index: usize, label: impl Into<String>, placement: ResolvedPlacement) -> Self {
        Self {
            index,
            label: label.into(),
            placement: Some(placement),
            status: OutcomeStatus::Placed,
        }
    }

    pub fn failed(
        index: usize,
        label: impl Into<String>,
        placement: Option<ResolvedPlacement>,
        reason: FailureReason,
    ) -> Self {
        Self {
            index,
            label: label.into(),
            placement,
            status: OutcomeStatus::Failed { reason },
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Placed)
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.status {
            OutcomeStatus::Failed { reason } => Some(reason),
            OutcomeStatus::Placed => None,
        }
    }
}

/// Complete accounting of one layout placement run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    layout_name: String,
    total_parts: usize,
    placed_count: usize,
    failed_count: usize,
    overall_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    abort_reason: Option<String>,
    origin: Vec3,
    yaw_degrees: f64,
    name_prefix: String,
    outcomes: Vec<PlacementOutcome>,
}

impl RunResult {
    /// Fold a ledger of outcomes into a result; one outcome per part
    pub fn from_outcomes(
        layout_name: impl Into<String>,
        request: &PlacementRequest,
        outcomes: Vec<PlacementOutcome>,
    ) -> Self {
        let placed_count = outcomes.iter().filter(|o| o.is_placed()).count();
        let failed_count = outcomes.len() - placed_count;
        Self {
            layout_name: layout_name.into(),
            total_parts: outcomes.len(),
            placed_count,
            failed_count,
            overall_success: failed_count == 0,
            abort_reason: None,
            origin: request.origin,
            yaw_degrees: request.yaw_degrees,
            name_prefix: request.name_prefix.clone(),
            outcomes,
        }
    }

    /// A run stopped before any part was attempted
    pub fn aborted(
        layout_name: impl Into<String>,
        request: &PlacementRequest,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            overall_success: false,
            abort_reason: Some(reason.into()),
            ..Self::from_outcomes(layout_name, request, Vec::new())
        }
    }

    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    pub fn total_parts(&self) -> usize {
        self.total_parts
    }

    pub fn placed_count(&self) -> usize {
        self.placed_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    pub fn overall_success(&self) -> bool {
        self.overall_success
    }

    pub fn abort_reason(&self) -> Option<&str> {
        self.abort_reason.as_deref()
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn yaw_degrees(&self) -> f64 {
        self.yaw_degrees
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn outcomes(&self) -> &[PlacementOutcome] {
        &self.outcomes
    }

    pub fn placed(&self) -> impl Iterator<Item = &PlacementOutcome> {
        self.outcomes.iter().filter(|o| o.is_placed())
    }

    pub fn failed(&self) -> impl Iterator<Item = &PlacementOutcome> {
        self.outcomes.iter().filter(|o| !o.is_placed())
    }

    pub fn summary(&self) -> String {
        summarize(self)
    }
}

/// One-line human summary of a run
pub fn summarize(result: &RunResult) -> String {
    let mut summary = format!(
        "Placed {}/{} parts for '{}'",
        result.placed_count, result.total_parts, result.layout_name
    );
    if let Some(reason) = &result.abort_reason {
        summary.push_str(": ");
        summary.push_str(reason);
    } else if result.failed_count > 0 {
        summary.push_str(&format!(" ({} failed)", result.failed_count));
    }
    summary
}
