//! Positioning reports and fix classification
use std::collections::HashMap;

use geo::Point;
use itertools::Itertools;

use crate::{
    constants::{LATITUDE_RANGE_DEG, LONGITUDE_RANGE_DEG},
    prelude::{Constellation, Epoch, Vector3},
};

#[cfg(feature = "serde")]
use serde::Serialize;

mod quality;
pub use quality::{FixStatus, FixType, QualityIndicator, ReceiverStatus};

/// Fixed [Constellation] visiting order used by [PositioningReport::best_fix_status].
/// The first [Constellation] reaching the retained [FixStatus] wins.
/// Any [Constellation] not listed here comes after, in [Constellation] ordering.
pub const CONSTELLATION_PRIORITY: [Constellation; 6] = [
    Constellation::GPS,
    Constellation::Galileo,
    Constellation::Glonass,
    Constellation::BeiDou,
    Constellation::QZSS,
    Constellation::IRNSS,
];

fn constellation_priority(constellation: &Constellation) -> usize {
    CONSTELLATION_PRIORITY
        .iter()
        .position(|c| c == constellation)
        .unwrap_or(CONSTELLATION_PRIORITY.len())
}

/// Information components that may be extracted from a [PositioningReport].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Location,
    Altitude,
    GroundSpeed,
    Bearing,
    TotalTrackLength,
    TrackDistanceFromStart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentValue {
    /// (longitude, latitude) in decimal degrees
    Location(Point<f64>),
    Scalar(f64),
}

/// Decoded receiver state, as delivered by the sentence decoder.
/// Each new report replaces the previous one wholesale.
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PositioningReport {
    /// Legacy (RMC) status
    pub status: ReceiverStatus,
    /// Legacy (GSA) fix type
    pub fix_type: FixType,
    /// GGA quality indicator
    pub quality: QualityIndicator,
    /// [FixStatus] reported by each [Constellation]
    pub constellation_fix_status: HashMap<Constellation, FixStatus>,
    /// Longitude in decimal degrees (WGS84)
    pub longitude: f64,
    /// Latitude in decimal degrees (WGS84)
    pub latitude: f64,
    /// Elevation above mean sea level (meters)
    pub elevation: f64,
    /// Ground speed (km/h)
    pub speed_km_h: f64,
    /// Course over ground (degrees), when defined
    pub bearing: Option<f64>,
    /// UTC time of fix
    pub utc_time: Option<Epoch>,
    /// Number of satellites used in the solution
    pub satellites_used: u8,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    pub pdop: Option<f64>,
}

impl PositioningReport {
    /// Copies and returns [PositioningReport] at this location.
    pub fn with_position(&self, longitude: f64, latitude: f64, elevation: f64) -> Self {
        let mut s = self.clone();
        s.longitude = longitude;
        s.latitude = latitude;
        s.elevation = elevation;
        s
    }

    /// Copies and returns [PositioningReport] with updated [ReceiverStatus].
    pub fn with_status(&self, status: ReceiverStatus) -> Self {
        let mut s = self.clone();
        s.status = status;
        s
    }

    /// Copies and returns [PositioningReport] with updated [FixType].
    pub fn with_fix_type(&self, fix_type: FixType) -> Self {
        let mut s = self.clone();
        s.fix_type = fix_type;
        s
    }

    /// Copies and returns [PositioningReport] with updated [QualityIndicator].
    pub fn with_quality(&self, quality: QualityIndicator) -> Self {
        let mut s = self.clone();
        s.quality = quality;
        s
    }

    /// Copies and returns [PositioningReport] with [FixStatus] for this [Constellation].
    pub fn with_constellation(&self, constellation: Constellation, status: FixStatus) -> Self {
        let mut s = self.clone();
        s.constellation_fix_status.insert(constellation, status);
        s
    }

    /// Copies and returns [PositioningReport] with UTC time of fix.
    pub fn with_utc_time(&self, t: Epoch) -> Self {
        let mut s = self.clone();
        s.utc_time = Some(t);
        s
    }

    /// Copies and returns [PositioningReport] with course over ground.
    pub fn with_bearing(&self, bearing: f64) -> Self {
        let mut s = self.clone();
        s.bearing = Some(bearing);
        s
    }

    /// Returns the best [FixStatus] over all constellations, and the
    /// [Constellation] that provided it. `None` means unknown constellation,
    /// which is always the case when no [Constellation] reported.
    ///
    /// A better status always replaces the current best one.
    /// [FixStatus::NoData] entries are never retained.
    /// Ties go to the first [Constellation] in [CONSTELLATION_PRIORITY] order.
    pub fn best_fix_status(&self) -> (FixStatus, Option<Constellation>) {
        let mut best = FixStatus::NoData;
        let mut constellation = None;

        for (c, status) in self
            .constellation_fix_status
            .iter()
            .sorted_by_key(|(c, _)| (constellation_priority(c), **c))
        {
            if *status > best {
                best = *status;
                constellation = Some(*c);
            }
        }

        (best, constellation)
    }

    /// True if coordinates lie within their valid range.
    pub fn coordinates_in_range(&self) -> bool {
        self.longitude >= LONGITUDE_RANGE_DEG.0
            && self.longitude <= LONGITUDE_RANGE_DEG.1
            && self.latitude >= LATITUDE_RANGE_DEG.0
            && self.latitude <= LATITUDE_RANGE_DEG.1
    }

    /// True if this report describes a usable position.
    /// Out of range coordinates always invalidate the report,
    /// whatever the quality signals say.
    pub fn is_valid(&self) -> bool {
        let (best, _) = self.best_fix_status();

        let valid = if self.status == ReceiverStatus::Void
            || best == FixStatus::NoFix
            || self.quality == QualityIndicator::Invalid
        {
            false
        } else {
            self.status == ReceiverStatus::Active
                || best == FixStatus::Fix2D
                || best == FixStatus::Fix3D
                || self.quality != QualityIndicator::Invalid
        };

        valid && self.coordinates_in_range()
    }

    /// Scalar [FixStatus] reduction, using the legacy status, fix type and
    /// quality indicator only. Unlike [Self::best_fix_status], this does not
    /// consult the per [Constellation] status.
    pub fn fix_status(&self) -> FixStatus {
        if self.status == ReceiverStatus::Void
            || self.fix_type == FixType::Bad
            || self.quality == QualityIndicator::Invalid
        {
            FixStatus::NoFix
        } else if self.fix_type == FixType::Fix2D {
            FixStatus::Fix2D
        } else if self.status == ReceiverStatus::Active
            || self.fix_type == FixType::Fix3D
            || self.quality != QualityIndicator::Invalid
        {
            FixStatus::Fix3D
        } else {
            FixStatus::NoData
        }
    }

    /// Human readable quality description.
    pub fn quality_description(&self) -> String {
        self.quality.description()
    }

    /// 3D position (longitude, latitude, elevation).
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.longitude, self.latitude, self.elevation)
    }

    /// Returns desired [Component], `None` for invalid reports and for
    /// components a single report cannot describe.
    pub fn component(&self, component: Component) -> Option<ComponentValue> {
        if !self.is_valid() {
            return None;
        }
        match component {
            Component::Location => Some(ComponentValue::Location(Point::new(
                self.longitude,
                self.latitude,
            ))),
            Component::Altitude => Some(ComponentValue::Scalar(self.elevation)),
            Component::GroundSpeed => Some(ComponentValue::Scalar(self.speed_km_h)),
            Component::Bearing => self.bearing.map(ComponentValue::Scalar),
            Component::TotalTrackLength | Component::TrackDistanceFromStart => None,
        }
    }
}
