//! The placement capability - the seam to the external scene service

use std::io::Write;

use serde::{Deserialize, Serialize};

/// Actor type requested for every placed part
pub const ACTOR_TYPE: &str = "StaticMeshActor";

/// Status value the scene service uses to report success
pub const SUCCESS_STATUS: &str = "success";

/// One placement call, in the parameter shape the scene service expects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementCall {
    /// Unique instance name
    pub name: String,
    #[serde(rename = "type")]
    pub actor_type: &'static str,
    /// World position [x, y, z]
    pub location: [f64; 3],
    /// Rotation [pitch, yaw, roll] in degrees; only yaw is ever non-zero
    pub rotation: [f64; 3],
    /// Fully-qualified resource handle
    #[serde(rename = "static_mesh")]
    pub resource_handle: String,
}

impl PlacementCall {
    pub fn new(
        name: impl Into<String>,
        resource_handle: impl Into<String>,
        location: [f64; 3],
        yaw: f64,
    ) -> Self {
        Self {
            name: name.into(),
            actor_type: ACTOR_TYPE,
            location,
            rotation: [0.0, yaw, 0.0],
            resource_handle: resource_handle.into(),
        }
    }

    pub fn yaw(&self) -> f64 {
        self.rotation[1]
    }
}

/// Response returned by the scene service for one call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PlacementResponse {
    pub fn success() -> Self {
        Self {
            status: SUCCESS_STATUS.to_string(),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(message.into()),
            message: None,
        }
    }

    /// Only the literal success marker counts as success
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// Reason to record when the response is not a success
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| format!("unrecognized response status '{}'", self.status))
    }
}

/// Anything that can place one part in the scene.
///
/// Implementations are invoked strictly one call at a time. Returning `None`
/// means the service gave no response.
pub trait PlacementCapability {
    fn place(&mut self, call: &PlacementCall) -> Option<PlacementResponse>;
}

impl<F> PlacementCapability for F
where
    F: FnMut(&PlacementCall) -> Option<PlacementResponse>,
{
    fn place(&mut self, call: &PlacementCall) -> Option<PlacementResponse> {
        self(call)
    }
}

/// Envelope written for each call by [`JsonLinesCapability`]
#[derive(Serialize)]
struct CommandLine<'a> {
    #[serde(rename = "type")]
    command: &'static str,
    params: &'a PlacementCall,
}

/// Writes each call as a `spawn_actor` command, one JSON object per line.
///
/// Every successfully written call is reported as placed; a write failure is
/// reported as an error response.
pub struct JsonLinesCapability<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesCapability<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_call(&mut self, call: &PlacementCall) -> std::io::Result<()> {
        let line = CommandLine {
            command: "spawn_actor",
            params: call,
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> PlacementCapability for JsonLinesCapability<W> {
    fn place(&mut self, call: &PlacementCall) -> Option<PlacementResponse> {
        match self.write_call(call) {
            Ok(()) => Some(PlacementResponse::success()),
            Err(e) => Some(PlacementResponse::error(e.to_string())),
        }
    }
}
