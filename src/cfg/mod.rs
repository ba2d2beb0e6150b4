#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::prelude::{Crs, Duration, Ellipsoid, Epoch, TimeScale};

mod acquisition;
pub use acquisition::AcquisitionPolicy;

fn default_timescale() -> TimeScale {
    TimeScale::UTC
}

fn default_sentence_logging() -> bool {
    false
}

/// Timestamps attached to track vertices are converted
/// according to these settings, before being handed over.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct TimestampSettings {
    /// [TimeScale] in which timestamps are expressed.
    #[cfg_attr(feature = "serde", serde(default = "default_timescale"))]
    pub timescale: TimeScale,
    /// Leap seconds to add to the receiver time.
    /// Some receivers do not apply the leap second correction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub leap_seconds: Option<i32>,
}

impl Default for TimestampSettings {
    fn default() -> Self {
        Self {
            timescale: default_timescale(),
            leap_seconds: None,
        }
    }
}

impl TimestampSettings {
    /// Converts receiver time according to these settings.
    pub fn apply(&self, t: Epoch) -> Epoch {
        let t = match self.leap_seconds {
            Some(leap) => t + Duration::from_seconds(leap as f64),
            None => t,
        };
        t.to_time_scale(self.timescale)
    }
}

/// Immutable configuration snapshot.
/// A new snapshot replaces the previous one wholesale, it is never
/// modified while a report is being processed.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// [AcquisitionPolicy] deciding whether new positions become vertices
    #[cfg_attr(feature = "serde", serde(default))]
    pub acquisition: AcquisitionPolicy,
    /// Working (map) frame [Crs]
    #[cfg_attr(feature = "serde", serde(default))]
    pub working_crs: Crs,
    /// [Ellipsoid] used in length calculations
    #[cfg_attr(feature = "serde", serde(default))]
    pub ellipsoid: Ellipsoid,
    /// Vertex [TimestampSettings]
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamps: TimestampSettings,
    /// Forward raw sentences to the sentence sink
    #[cfg_attr(feature = "serde", serde(default = "default_sentence_logging"))]
    pub sentence_logging: bool,
}

impl Config {
    /// Copies and returns [Config] with desired [AcquisitionPolicy].
    pub fn with_acquisition(&self, acquisition: AcquisitionPolicy) -> Self {
        let mut s = self.clone();
        s.acquisition = acquisition;
        s
    }

    /// Copies and returns [Config] with desired working [Crs].
    pub fn with_working_crs(&self, crs: Crs) -> Self {
        let mut s = self.clone();
        s.working_crs = crs;
        s
    }

    /// Copies and returns [Config] with desired [Ellipsoid].
    pub fn with_ellipsoid(&self, ellipsoid: Ellipsoid) -> Self {
        let mut s = self.clone();
        s.ellipsoid = ellipsoid;
        s
    }

    /// Copies and returns [Config] with desired [TimestampSettings].
    pub fn with_timestamps(&self, timestamps: TimestampSettings) -> Self {
        let mut s = self.clone();
        s.timestamps = timestamps;
        s
    }

    /// Copies and returns [Config] with raw sentence logging turned on or off.
    pub fn with_sentence_logging(&self, enabled: bool) -> Self {
        let mut s = self.clone();
        s.sentence_logging = enabled;
        s
    }
}
