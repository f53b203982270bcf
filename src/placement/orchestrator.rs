//! Sequential placement of a layout's parts
//!
//! The scene service is unsafe under concurrent calls and unstable under
//! rapid-fire ones, so parts are placed strictly one at a time with a pause
//! between calls. Every part yields exactly one outcome; a failure is recorded
//! and the loop moves on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::layout::{resolve_handle, LayoutDefinition, PartSpec};

use super::capability::{PlacementCall, PlacementCapability};
use super::outcome::{FailureReason, PlacementOutcome, ResolvedPlacement, RunResult};
use super::request::PlacementRequest;

/// Reason recorded for a layout without parts
pub const NO_PARTS_REASON: &str = "no parts";

/// Pauses between placement calls
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Blocks the current thread for the delay
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl<F> Pacer for F
where
    F: FnMut(Duration),
{
    fn pause(&mut self, delay: Duration) {
        self(delay)
    }
}

/// Strip characters the scene naming scheme does not accept: spaces become
/// underscores, parentheses are dropped
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Derive the unique instance name for a part
pub fn instance_name(prefix: &str, label: &str) -> String {
    let label = sanitize_label(label);
    if prefix.is_empty() {
        label
    } else {
        format!("{}_{}", prefix, label)
    }
}

/// Runs placement loops against a placement capability
pub struct Orchestrator {
    pacer: Box<dyn Pacer>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self {
            pacer: Box::new(ThreadSleep),
            cancel: None,
        }
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pacer used between calls
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    /// Check `flag` before each part; once set, the remaining parts are
    /// recorded as cancelled without being attempted
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Place every part of `layout` according to `request`
    pub fn run(
        &mut self,
        layout: &LayoutDefinition,
        request: &PlacementRequest,
        capability: &mut dyn PlacementCapability,
    ) -> RunResult {
        if !layout.is_usable() {
            warn!("Layout '{}' has no parts", layout.name);
            return RunResult::aborted(&layout.name, request, NO_PARTS_REASON);
        }

        let total = layout.parts.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, part) in layout.parts.iter().enumerate() {
            if self.is_cancelled() {
                warn!("Placement of '{}' cancelled at part {}/{}", layout.name, i + 1, total);
                outcomes.extend(layout.parts[i..].iter().map(|p| {
                    PlacementOutcome::failed(p.index, &p.label, None, FailureReason::Cancelled)
                }));
                break;
            }

            let Some(outcome) = self.place_part(layout, part, i, request, capability) else {
                outcomes.push(PlacementOutcome::failed(
                    part.index,
                    &part.label,
                    None,
                    FailureReason::UnknownResource {
                        key: part.resource_key.clone(),
                    },
                ));
                warn!(
                    "Part {} ({}) references unknown resource '{}'",
                    part.index, part.label, part.resource_key
                );
                continue;
            };
            outcomes.push(outcome);

            if i + 1 < total && !request.pacing_delay.is_zero() {
                self.pacer.pause(request.pacing_delay);
            }
        }

        let result = RunResult::from_outcomes(&layout.name, request, outcomes);
        info!("{}", result.summary());
        result
    }

    /// Attempt one part; `None` when its resource key does not resolve
    fn place_part(
        &self,
        layout: &LayoutDefinition,
        part: &PartSpec,
        i: usize,
        request: &PlacementRequest,
        capability: &mut dyn PlacementCapability,
    ) -> Option<PlacementOutcome> {
        let handle = resolve_handle(&part.resource_key, &layout.resource_keys)?;

        let transform = request.transform();
        let location = transform.transform_point(part.offset);
        let yaw = transform.transform_yaw(part.yaw);
        let name = instance_name(&request.name_prefix, &part.label);

        info!(
            "Placing part {}/{}: {} at ({:.0}, {:.0}, {:.0}) yaw={:.1}",
            i + 1,
            layout.parts.len(),
            part.label,
            location.x,
            location.y,
            location.z,
            yaw
        );

        let call = PlacementCall::new(name.clone(), handle.qualified(), location.to_array(), yaw);
        let response = capability.place(&call);

        let placement = ResolvedPlacement {
            instance_name: name,
            handle,
            location,
            yaw,
        };

        let outcome = match response {
            Some(resp) if resp.is_success() => {
                PlacementOutcome::placed(part.index, &part.label, placement)
            }
            Some(resp) => PlacementOutcome::failed(
                part.index,
                &part.label,
                Some(placement),
                FailureReason::Rejected {
                    message: resp.failure_message(),
                },
            ),
            None => PlacementOutcome::failed(
                part.index,
                &part.label,
                Some(placement),
                FailureReason::NoResponse,
            ),
        };

        if let Some(reason) = outcome.failure() {
            warn!("Part {} ({}) failed: {}", part.index, part.label, reason);
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Vec3;
    use crate::placement::PlacementResponse;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn layout(json: &str) -> LayoutDefinition {
        LayoutDefinition::from_str(json, "test").unwrap()
    }

    fn three_part_layout() -> LayoutDefinition {
        layout(
            r#"{
                "name": "Trio",
                "mesh_paths": { "Wall": "/Game/SM_Wall", "Roof": "/Game/SM_Roof.SM_Roof" },
                "pieces": [
                    { "rel": [10, 0, 0], "yaw": 0, "mesh": "Wall", "label": "East Wall" },
                    { "rel": [0, 0, 300], "yaw": 45, "mesh": "Roof", "label": "Roof (Main)" },
                    { "rel": [0, 10, 0], "yaw": 180, "mesh": "Wall" }
                ]
            }"#,
        )
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Roof (Main)"), "Roof_Main");
        assert_eq!(sanitize_label("North Wall 2"), "North_Wall_2");
        assert_eq!(sanitize_label("plain"), "plain");
    }

    #[test]
    fn test_instance_name() {
        assert_eq!(instance_name("Camp_Hab01", "East Wall"), "Camp_Hab01_East_Wall");
        assert_eq!(instance_name("", "East Wall"), "East_Wall");
    }

    #[test]
    fn test_all_parts_placed() {
        let mut calls = Vec::new();
        let mut cap = |call: &PlacementCall| -> Option<PlacementResponse> {
            calls.push(call.clone());
            Some(PlacementResponse::success())
        };
        let request = PlacementRequest::new(Vec3::zero()).with_pacing_delay(Duration::ZERO);
        let result = Orchestrator::new().run(&three_part_layout(), &request, &mut cap);

        assert!(result.overall_success());
        assert_eq!(result.placed_count(), 3);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].name, "Hab_East_Wall");
        assert_eq!(calls[0].resource_handle, "/Game/SM_Wall.SM_Wall");
        assert_eq!(calls[1].name, "Hab_Roof_Main");
        assert_eq!(calls[1].resource_handle, "/Game/SM_Roof.SM_Roof");
        assert_eq!(calls[1].rotation, [0.0, 45.0, 0.0]);
        assert_eq!(calls[2].name, "Hab_piece_2");
        assert_eq!(calls[2].yaw(), -180.0);
    }

    #[test]
    fn test_rejections_and_missing_responses_are_recorded() {
        let mut n = 0;
        let mut cap = |_: &PlacementCall| -> Option<PlacementResponse> {
            n += 1;
            match n {
                1 => Some(PlacementResponse::success()),
                2 => Some(PlacementResponse::error("actor name taken")),
                _ => None,
            }
        };
        let request = PlacementRequest::default().with_pacing_delay(Duration::ZERO);
        let result = Orchestrator::new().run(&three_part_layout(), &request, &mut cap);

        assert!(!result.overall_success());
        assert_eq!(result.placed_count(), 1);
        assert_eq!(result.failed_count(), 2);
        let reasons: Vec<String> = result
            .failed()
            .map(|o| o.failure().unwrap().to_string())
            .collect();
        assert_eq!(reasons, vec!["actor name taken", "no response"]);
        // Failed calls still record where the part would have gone
        assert!(result.outcomes()[1].placement.is_some());
    }

    #[test]
    fn test_empty_layout_makes_no_calls() {
        let mut calls = 0;
        let mut cap = |_: &PlacementCall| -> Option<PlacementResponse> {
            calls += 1;
            Some(PlacementResponse::success())
        };
        let result = Orchestrator::new().run(
            &layout(r#"{"name": "Nothing", "pieces": []}"#),
            &PlacementRequest::default(),
            &mut cap,
        );
        assert_eq!(calls, 0);
        assert_eq!(result.total_parts(), 0);
        assert!(!result.overall_success());
        assert_eq!(result.abort_reason(), Some(NO_PARTS_REASON));
    }

    #[test]
    fn test_pacing_only_between_calls() {
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let pacer_log = Rc::clone(&log);
        let mut orchestrator = Orchestrator::new().with_pacer(move |d: Duration| {
            pacer_log.borrow_mut().push(format!("pause {}ms", d.as_millis()))
        });
        let cap_log = Rc::clone(&log);
        let mut cap = move |call: &PlacementCall| -> Option<PlacementResponse> {
            cap_log.borrow_mut().push(format!("place {}", call.name));
            Some(PlacementResponse::success())
        };

        let request = PlacementRequest::default()
            .with_name_prefix("P")
            .with_pacing_delay(Duration::from_millis(250));
        orchestrator.run(&three_part_layout(), &request, &mut cap);

        assert_eq!(
            *log.borrow(),
            vec![
                "place P_East_Wall",
                "pause 250ms",
                "place P_Roof_Main",
                "pause 250ms",
                "place P_piece_2",
            ]
        );
    }

    #[test]
    fn test_zero_delay_never_pauses() {
        let pauses = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&pauses);
        let mut orchestrator =
            Orchestrator::new().with_pacer(move |_: Duration| *counter.borrow_mut() += 1);
        let mut cap = |_: &PlacementCall| -> Option<PlacementResponse> {
            Some(PlacementResponse::success())
        };
        let request = PlacementRequest::default().with_pacing_delay(Duration::ZERO);
        orchestrator.run(&three_part_layout(), &request, &mut cap);
        assert_eq!(*pauses.borrow(), 0);
    }

    #[test]
    fn test_cancel_flag_marks_remaining_parts() {
        let flag = Arc::new(AtomicBool::new(false));
        let trip = Arc::clone(&flag);
        let mut calls = 0;
        let mut cap = |_: &PlacementCall| -> Option<PlacementResponse> {
            calls += 1;
            trip.store(true, Ordering::SeqCst);
            Some(PlacementResponse::success())
        };
        let request = PlacementRequest::default().with_pacing_delay(Duration::ZERO);
        let result = Orchestrator::new()
            .with_cancel_flag(flag)
            .run(&three_part_layout(), &request, &mut cap);

        assert_eq!(calls, 1);
        assert_eq!(result.total_parts(), 3);
        assert_eq!(result.placed_count(), 1);
        assert_eq!(result.failed_count(), 2);
        assert!(result
            .failed()
            .all(|o| o.failure() == Some(&FailureReason::Cancelled)));
    }
}
