use geo::LineString;

use crate::prelude::{Epoch, TimestampSettings, TrackVertex};

/// Snapshot of a track, handed over to the persistence collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFeature {
    /// Geographic geometry (longitude, latitude)
    pub geometry: LineString<f64>,
    /// Per vertex elevation (meters)
    pub elevations: Vec<f64>,
    /// Per vertex timestamp, after [TimestampSettings] were applied
    pub timestamps: Vec<Option<Epoch>>,
    /// Ellipsoidal track length (meters)
    pub total_length_m: f64,
    /// Ellipsoidal distance from first to last vertex (meters)
    pub distance_from_start_m: f64,
}

impl TrackFeature {
    pub(crate) fn new(
        vertices: &[TrackVertex],
        total_length_m: f64,
        distance_from_start_m: f64,
        settings: &TimestampSettings,
    ) -> Self {
        Self {
            geometry: LineString::from(
                vertices
                    .iter()
                    .map(|v| (v.position[0], v.position[1]))
                    .collect::<Vec<_>>(),
            ),
            elevations: vertices.iter().map(|v| v.position[2]).collect(),
            timestamps: vertices
                .iter()
                .map(|v| v.epoch.map(|t| settings.apply(t)))
                .collect(),
            total_length_m,
            distance_from_start_m,
        }
    }

    /// Timestamp of the first timestamped vertex
    pub fn start_time(&self) -> Option<Epoch> {
        self.timestamps.iter().flatten().next().copied()
    }

    /// Timestamp of the last timestamped vertex
    pub fn end_time(&self) -> Option<Epoch> {
        self.timestamps.iter().rev().flatten().next().copied()
    }

    pub fn num_vertices(&self) -> usize {
        self.elevations.len()
    }
}
