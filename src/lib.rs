#![cfg_attr(docrs, feature(doc_cfg))]

//! GNSS fix classification and track accumulation.
//!
//! Positioning reports, as decoded from the receiver data stream, are reduced
//! to a single best [FixStatus](prelude::FixStatus) and, when valid, grow
//! an in-progress track with ellipsoidal length bookkeeping.

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod connection;
mod constants;
mod crs;
mod digitizing;
mod distance;
mod error;
mod event;
mod report;
mod sentence;
mod track;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{AcquisitionPolicy, Config, TimestampSettings};
    pub use crate::connection::{Connection, ConnectionStatus, Transport};
    pub use crate::crs::{CoordinateTransform, Crs};
    pub use crate::digitizing::Digitizing;
    pub use crate::distance::{DistanceCalculator, Ellipsoid};
    pub use crate::error::Error;
    pub use crate::event::{Command, Commands, Event, ListenerId, Notifier};
    pub use crate::report::{
        Component, ComponentValue, FixStatus, FixType, PositioningReport, QualityIndicator,
        ReceiverStatus, CONSTELLATION_PRIORITY,
    };
    pub use crate::sentence::{LogSink, SentenceSink};
    pub use crate::track::{Rejection, Track, TrackFeature, TrackVertex};
    // re-export
    pub use gnss::prelude::Constellation;
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

pub use error::Error;
