use crate::prelude::Duration;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// [AcquisitionPolicy] decides whether a new valid position becomes a track vertex.
/// When enabled, a position is accepted as soon as either configured threshold
/// is reached, since the last accepted vertex. When disabled, all valid
/// positions are accepted.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct AcquisitionPolicy {
    #[cfg_attr(feature = "serde", serde(default))]
    pub enabled: bool,
    /// Minimal time interval between two vertices
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_interval: Option<Duration>,
    /// Minimal distance between two vertices (meters)
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_distance_m: Option<f64>,
}

impl AcquisitionPolicy {
    /// Builds an enabled [AcquisitionPolicy]
    pub fn new(min_interval: Option<Duration>, min_distance_m: Option<f64>) -> Self {
        Self {
            enabled: true,
            min_interval,
            min_distance_m,
        }
    }

    /// [AcquisitionPolicy] that accepts all valid positions
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Evaluates this policy.
    /// - elapsed: time since last accepted vertex
    /// - moved_m: distance to the last accepted vertex (meters)
    pub fn accepts(&self, elapsed: Option<Duration>, moved_m: f64) -> bool {
        if !self.enabled {
            return true;
        }

        if self.min_interval.is_none() && self.min_distance_m.is_none() {
            return true;
        }

        let time_reached = match (self.min_interval, elapsed) {
            (Some(min_interval), Some(elapsed)) => elapsed >= min_interval,
            _ => false,
        };

        let distance_reached = match self.min_distance_m {
            Some(min_distance_m) => moved_m >= min_distance_m,
            None => false,
        };

        time_reached || distance_reached
    }
}
