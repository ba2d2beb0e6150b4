//! Receiver connection state tracking
use log::{debug, info, trace, warn};

use crate::prelude::{Constellation, Error, Event, FixStatus, PositioningReport, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Transport] supplies the raw data stream. We only
/// consume its lifecycle: opening and closing.
pub trait Transport {
    /// Opens the underlying channel (read/write, unbuffered).
    fn open(&mut self) -> Result<(), Error>;

    /// Closes the underlying channel. Closing a closed channel is not an error.
    fn close(&mut self);
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConnectionStatus {
    #[default]
    NotConnected,
    /// Transport is open
    Connected,
    /// At least one report came through
    DataReceived,
    /// Latest report described a valid position
    GnssDataReceived,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Connected => write!(f, "connected"),
            Self::DataReceived => write!(f, "data received"),
            Self::GnssDataReceived => write!(f, "gnss data received"),
        }
    }
}

/// Coordinate-wise equality, where NaN (missing value) equals NaN.
fn same_position(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
}

/// [Connection] owns our current understanding of the receiver,
/// for the lifetime of one receiver session. It reacts to whatever
/// the [Transport] delivers and queues [Event]s on actual change only.
#[derive(Debug)]
pub struct Connection<T: Transport> {
    source: Option<T>,
    status: ConnectionStatus,
    last_report: PositioningReport,
    last_fix_status: FixStatus,
    best_constellation: Option<Constellation>,
    last_position: Option<Vector3<f64>>,
    events: Vec<Event>,
}

impl<T: Transport> Default for Connection<T> {
    fn default() -> Self {
        Self {
            source: None,
            status: ConnectionStatus::default(),
            last_report: PositioningReport::default(),
            last_fix_status: FixStatus::default(),
            best_constellation: None,
            last_position: None,
            events: Vec::new(),
        }
    }
}

impl<T: Transport> Connection<T> {
    /// Builds new [Connection] over this [Transport].
    pub fn new(source: T) -> Self {
        let mut s = Self::default();
        s.source = Some(source);
        s
    }

    /// Opens the [Transport]. Returns false when no [Transport] is defined
    /// or when opening failed. Failures are not retried.
    pub fn connect(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            debug!("connect: no source");
            return false;
        };

        match source.open() {
            Ok(()) => {
                info!("connected");
                self.set_status(ConnectionStatus::Connected);
                true
            },
            Err(e) => {
                warn!("failed to open source: {}", e);
                self.set_status(ConnectionStatus::NotConnected);
                false
            },
        }
    }

    /// Closes the [Transport]. Returns false when no [Transport] is defined.
    pub fn close(&mut self) -> bool {
        let Some(source) = self.source.as_mut() else {
            debug!("close: no source");
            return false;
        };

        source.close();
        info!("disconnected");

        self.set_status(ConnectionStatus::NotConnected);
        self.set_fix_status(FixStatus::NoData, None);
        true
    }

    /// Closes and discards the current [Transport], adopts the new one
    /// and resets our receiver state.
    pub fn replace_source(&mut self, source: T) {
        self.cleanup_source();
        self.source = Some(source);
        self.clear();
    }

    fn cleanup_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
        self.set_status(ConnectionStatus::NotConnected);
        self.set_fix_status(FixStatus::NoData, None);
    }

    /// Resets receiver state to neutral values.
    pub fn clear(&mut self) {
        debug!("clearing receiver state");
        self.last_report = PositioningReport::default();
        self.last_position = None;
        self.set_fix_status(FixStatus::NoData, None);
    }

    /// Handles a new [PositioningReport], valid or not:
    /// invalid reports may still modify the [FixStatus].
    pub fn on_report(&mut self, report: PositioningReport) {
        trace!("new report: {:?}", report);

        let valid = report.is_valid();

        if valid {
            let position = report.position();
            let moved = match self.last_position {
                Some(last) => !same_position(&last, &position),
                None => true,
            };
            if moved {
                self.last_position = Some(position);
                self.events.push(Event::PositionChanged(position));
            }
        }

        if self.is_connected() {
            if valid {
                self.set_status(ConnectionStatus::GnssDataReceived);
            } else {
                self.set_status(ConnectionStatus::DataReceived);
            }
        }

        let (best, constellation) = report.best_fix_status();
        self.set_fix_status(best, constellation);

        self.last_report = report;
    }

    fn set_fix_status(&mut self, status: FixStatus, constellation: Option<Constellation>) {
        self.best_constellation = constellation;
        if status != self.last_fix_status {
            debug!("fix status: {} -> {}", self.last_fix_status, status);
            self.last_fix_status = status;
            self.events.push(Event::FixStatusChanged(status));
        }
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if status != self.status {
            self.status = status;
            self.events.push(Event::StatusChanged(status));
        }
    }

    /// Returns and clears all pending [Event]s.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&T> {
        self.source.as_ref()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status != ConnectionStatus::NotConnected
    }

    pub fn last_report(&self) -> &PositioningReport {
        &self.last_report
    }

    pub fn last_fix_status(&self) -> FixStatus {
        self.last_fix_status
    }

    /// [Constellation] that provided the last [FixStatus]
    pub fn best_constellation(&self) -> Option<Constellation> {
        self.best_constellation
    }

    /// Last valid position (longitude, latitude, elevation)
    pub fn last_position(&self) -> Option<Vector3<f64>> {
        self.last_position
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::{QualityIndicator, ReceiverStatus};
    use rstest::*;

    #[derive(Debug, Default)]
    struct TestTransport {
        fail: bool,
        opened: usize,
        closed: usize,
    }

    impl Transport for TestTransport {
        fn open(&mut self) -> Result<(), Error> {
            self.opened += 1;
            if self.fail {
                Err(Error::Transport("device busy".to_string()))
            } else {
                Ok(())
            }
        }
        fn close(&mut self) {
            self.closed += 1;
        }
    }

    #[fixture]
    fn fix_3d() -> PositioningReport {
        PositioningReport::default()
            .with_status(ReceiverStatus::Active)
            .with_quality(QualityIndicator::GPS)
            .with_constellation(Constellation::GPS, FixStatus::Fix3D)
            .with_position(4.0, 50.0, 100.0)
    }

    fn fix_status_events(events: &[Event]) -> Vec<FixStatus> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::FixStatusChanged(status) => Some(*status),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn no_source() {
        let mut connection = Connection::<TestTransport>::default();
        assert!(!connection.connect());
        assert!(!connection.close());
        assert!(connection.drain_events().is_empty());
    }

    #[test]
    fn open_failure() {
        let mut connection = Connection::new(TestTransport {
            fail: true,
            ..Default::default()
        });
        assert!(!connection.connect());
        assert!(!connection.is_connected());
        assert_eq!(connection.source().unwrap().opened, 1);
    }

    #[rstest]
    fn fix_status_dedup(fix_3d: PositioningReport) {
        let mut connection = Connection::new(TestTransport::default());
        assert!(connection.connect());
        connection.drain_events();

        for _ in 0..10 {
            connection.on_report(fix_3d.clone());
        }

        let events = connection.drain_events();
        assert_eq!(fix_status_events(&events), vec![FixStatus::Fix3D]);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, Event::PositionChanged(_)))
                .count(),
            1,
            "position only changed once"
        );
        assert_eq!(connection.best_constellation(), Some(Constellation::GPS));
        assert_eq!(connection.status(), ConnectionStatus::GnssDataReceived);
    }

    #[rstest]
    fn missing_elevation_position_dedup(fix_3d: PositioningReport) {
        let mut connection = Connection::new(TestTransport::default());
        assert!(connection.connect());
        connection.drain_events();

        let report = fix_3d.with_position(4.0, 50.0, f64::NAN);
        for _ in 0..5 {
            connection.on_report(report.clone());
        }

        let events = connection.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, Event::PositionChanged(_)))
                .count(),
            1
        );

        connection.on_report(report.with_position(4.0, 50.0, 10.0));
        assert!(connection
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::PositionChanged(_))));
    }

    #[rstest]
    fn invalid_report_updates_fix_status(fix_3d: PositioningReport) {
        let mut connection = Connection::new(TestTransport::default());
        connection.connect();
        connection.on_report(fix_3d.clone());
        connection.drain_events();

        let mut lost = fix_3d.with_status(ReceiverStatus::Void);
        lost.constellation_fix_status
            .insert(Constellation::GPS, FixStatus::NoFix);
        lost = lost.with_position(5.0, 51.0, 0.0);

        connection.on_report(lost);

        let events = connection.drain_events();
        assert_eq!(fix_status_events(&events), vec![FixStatus::NoFix]);
        assert!(
            !events.iter().any(|e| matches!(e, Event::PositionChanged(_))),
            "invalid report should not move us"
        );
        assert_eq!(
            connection.last_position(),
            Some(Vector3::new(4.0, 50.0, 100.0))
        );
        assert_eq!(connection.status(), ConnectionStatus::DataReceived);
    }

    #[rstest]
    fn close_resets_fix_status(fix_3d: PositioningReport) {
        let mut connection = Connection::new(TestTransport::default());
        connection.connect();
        connection.on_report(fix_3d);
        connection.drain_events();

        assert!(connection.close());
        let events = connection.drain_events();
        assert_eq!(fix_status_events(&events), vec![FixStatus::NoData]);
        assert_eq!(connection.source().unwrap().closed, 1);

        assert!(connection.close());
        assert!(fix_status_events(&connection.drain_events()).is_empty());
    }

    #[rstest]
    fn replace_source(fix_3d: PositioningReport) {
        let mut connection = Connection::new(TestTransport::default());
        connection.connect();
        connection.on_report(fix_3d);
        connection.drain_events();

        connection.replace_source(TestTransport::default());

        let events = connection.drain_events();
        assert_eq!(fix_status_events(&events), vec![FixStatus::NoData]);
        assert_eq!(*connection.last_report(), PositioningReport::default());
        assert_eq!(connection.last_position(), None);
        assert!(!connection.is_connected());
        assert_eq!(connection.source().unwrap().opened, 0);
    }

    #[rstest]
    fn clear(fix_3d: PositioningReport) {
        let mut connection = Connection::new(TestTransport::default());
        connection.connect();
        connection.on_report(fix_3d);
        connection.drain_events();

        connection.clear();
        assert_eq!(connection.last_fix_status(), FixStatus::NoData);
        assert!(connection.is_connected(), "clear does not close");
        assert_eq!(
            fix_status_events(&connection.drain_events()),
            vec![FixStatus::NoData]
        );
    }
}
