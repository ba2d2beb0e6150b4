//! Track accumulation
use log::{debug, trace, warn};
use thiserror::Error;

use crate::prelude::{
    AcquisitionPolicy, CoordinateTransform, DistanceCalculator, Duration, Epoch, Event,
    TimestampSettings, Vector3,
};

mod feature;
pub use feature::TrackFeature;

/// Reasons for not growing the track. These are expected
/// receiver conditions, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Rejection {
    #[error("receiver is not connected")]
    NotConnected,
    #[error("invalid position fix")]
    InvalidFix,
    #[error("acquisition policy: {moved_m:.3}m moved, {elapsed:?} elapsed")]
    Policy {
        elapsed: Option<Duration>,
        moved_m: f64,
    },
}

/// Track vertex, in the geographic frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackVertex {
    /// (longitude, latitude, elevation)
    pub position: Vector3<f64>,
    /// Receiver time of this vertex
    pub epoch: Option<Epoch>,
}

impl TrackVertex {
    pub fn new(position: Vector3<f64>, epoch: Option<Epoch>) -> Self {
        Self { position, epoch }
    }
}

/// Growing vertex sequence, with ellipsoidal length bookkeeping.
/// Insertion order is temporal order.
#[derive(Debug, Default, Clone)]
pub struct Track {
    vertices: Vec<TrackVertex>,
    total_length_m: f64,
    distance_from_start_m: f64,
    last_elevation: f64,
    /// System time of the last accepted vertex
    last_acquired: Option<Epoch>,
    events: Vec<Event>,
}

fn system_time() -> Option<Epoch> {
    match Epoch::now() {
        Ok(now) => Some(now),
        Err(e) => {
            warn!("system time unavailable: {}", e);
            None
        },
    }
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[TrackVertex] {
        &self.vertices
    }

    pub fn last_vertex(&self) -> Option<&TrackVertex> {
        self.vertices.last()
    }

    /// Elevation of the last accepted vertex (meters)
    pub fn last_elevation(&self) -> f64 {
        self.last_elevation
    }

    /// Ellipsoidal length over consecutive vertices (meters)
    pub fn total_length_m(&self) -> f64 {
        self.total_length_m
    }

    /// Ellipsoidal distance between first and last vertex (meters)
    pub fn distance_from_start_m(&self) -> f64 {
        self.distance_from_start_m
    }

    /// Evaluates [AcquisitionPolicy] for this new candidate vertex,
    /// against the last accepted one. First vertex is always accepted.
    /// Elapsed time uses receiver time when both vertices carry one,
    /// system time otherwise.
    pub fn acquisition(
        &self,
        policy: &AcquisitionPolicy,
        calculator: &DistanceCalculator,
        candidate: &TrackVertex,
    ) -> Result<(), Rejection> {
        let Some(last) = self.vertices.last() else {
            return Ok(());
        };

        if !policy.enabled {
            return Ok(());
        }

        let elapsed = match (last.epoch, candidate.epoch) {
            (Some(last), Some(t)) => Some(t - last),
            _ => match (self.last_acquired, system_time()) {
                (Some(last), Some(now)) => Some(now - last),
                _ => None,
            },
        };

        let moved_m = calculator.distance(&last.position, &candidate.position);

        if policy.accepts(elapsed, moved_m) {
            Ok(())
        } else {
            trace!("rejected vertex: {:.3}m moved, {:?} elapsed", moved_m, elapsed);
            Err(Rejection::Policy { elapsed, moved_m })
        }
    }

    /// Appends a new vertex, unconditionally.
    pub fn push(&mut self, vertex: TrackVertex, calculator: &DistanceCalculator) {
        let was_empty = self.is_empty();

        self.last_elevation = vertex.position[2];
        self.last_acquired = system_time();
        self.vertices.push(vertex);
        self.update_lengths(calculator);

        debug!(
            "new vertex #{}: {:?} (length={:.3}m)",
            self.vertices.len(),
            vertex.position,
            self.total_length_m
        );

        if was_empty {
            self.events.push(Event::TrackIsEmptyChanged(false));
        }
        self.events.push(Event::TrackChanged);
    }

    /// Recomputes derived lengths from scratch.
    /// Must be called whenever the [DistanceCalculator] changes.
    pub fn update_lengths(&mut self, calculator: &DistanceCalculator) {
        let positions = self
            .vertices
            .iter()
            .map(|v| v.position)
            .collect::<Vec<_>>();

        self.total_length_m = calculator.length(&positions);

        self.distance_from_start_m = match (positions.first(), positions.last()) {
            (Some(first), Some(last)) if positions.len() > 1 => calculator.distance(first, last),
            _ => 0.0,
        };
    }

    /// Clears all vertices and derived lengths.
    pub fn reset(&mut self) {
        let was_empty = self.is_empty();

        self.vertices.clear();
        self.total_length_m = 0.0;
        self.distance_from_start_m = 0.0;
        self.last_elevation = 0.0;
        self.last_acquired = None;

        if !was_empty {
            debug!("track reset");
            self.events.push(Event::TrackIsEmptyChanged(true));
        }
        self.events.push(Event::TrackChanged);
    }

    /// Returns this track expressed in the working frame.
    pub fn working_geometry(&self, transform: &CoordinateTransform) -> Vec<Vector3<f64>> {
        self.vertices
            .iter()
            .map(|v| transform.to_working(&v.position))
            .collect()
    }

    /// Snapshot of this track, ready to be persisted.
    /// The track itself is left untouched.
    pub fn feature(&self, settings: &TimestampSettings) -> TrackFeature {
        TrackFeature::new(
            &self.vertices,
            self.total_length_m,
            self.distance_from_start_m,
            settings,
        )
    }

    /// Returns and clears all pending [Event]s.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
