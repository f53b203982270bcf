//! The caller-supplied placement for a whole layout instance

use std::time::Duration;

use crate::config::{DEFAULT_NAME_PREFIX, DEFAULT_PACING_DELAY};
use crate::layout::{PlacementTransform, Vec3};

/// Convert a delay in seconds to a [`Duration`], clamping negative and
/// non-finite values to zero
pub fn pacing_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

/// Where and how one layout instance is placed
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    /// World-space origin of the layout
    pub origin: Vec3,
    /// Instance yaw in degrees
    pub yaw_degrees: f64,
    /// Prefix for derived instance names
    pub name_prefix: String,
    /// Pause between successive placement calls
    pub pacing_delay: Duration,
}

impl Default for PlacementRequest {
    fn default() -> Self {
        Self {
            origin: Vec3::zero(),
            yaw_degrees: 0.0,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

impl PlacementRequest {
    /// Create a request at `origin` with default yaw, prefix and pacing
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn with_yaw(mut self, yaw_degrees: f64) -> Self {
        self.yaw_degrees = yaw_degrees;
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    /// Set the pacing delay in seconds; negative values mean no delay
    pub fn with_pacing_delay_secs(self, secs: f64) -> Self {
        self.with_pacing_delay(pacing_from_secs(secs))
    }

    /// The transform applied to every part
    pub fn transform(&self) -> PlacementTransform {
        PlacementTransform::new(self.origin, self.yaw_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacing_from_secs() {
        assert_eq!(pacing_from_secs(0.1), Duration::from_millis(100));
        assert_eq!(pacing_from_secs(0.0), Duration::ZERO);
        assert_eq!(pacing_from_secs(-1.0), Duration::ZERO);
        assert_eq!(pacing_from_secs(f64::NAN), Duration::ZERO);
        assert_eq!(pacing_from_secs(f64::INFINITY), Duration::ZERO);
    }

    #[test]
    fn test_builder() {
        let req = PlacementRequest::new(Vec3::new(1.0, 2.0, 3.0))
            .with_yaw(45.0)
            .with_name_prefix("Camp_Hab01")
            .with_pacing_delay_secs(0.5);
        assert_eq!(req.origin, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(req.yaw_degrees, 45.0);
        assert_eq!(req.name_prefix, "Camp_Hab01");
        assert_eq!(req.pacing_delay, Duration::from_millis(500));
        assert_eq!(req.transform().yaw_degrees, 45.0);
    }
}
