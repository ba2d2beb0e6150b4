
use log::LevelFilter;
use std::{
    cell::RefCell,
    rc::Rc,
    str::FromStr,
    sync::Once,
};

use crate::prelude::{
    Constellation, Duration, Epoch, Error, Event, FixStatus, FixType, PositioningReport,
    QualityIndicator, ReceiverStatus, Transport,
};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Reference epoch for all scenarios
pub fn t0() -> Epoch {
    Epoch::from_str("2023-10-01T08:00:00 UTC").unwrap()
}

/// Scenario epoch, `dt_s` seconds after [t0]
pub fn t(dt_s: f64) -> Epoch {
    t0() + Duration::from_seconds(dt_s)
}

/// Complete 3D fix report at this location
pub fn fix_3d_report(longitude: f64, latitude: f64, elevation: f64) -> PositioningReport {
    PositioningReport::default()
        .with_status(ReceiverStatus::Active)
        .with_fix_type(FixType::Fix3D)
        .with_quality(QualityIndicator::GPS)
        .with_constellation(Constellation::GPS, FixStatus::Fix3D)
        .with_constellation(Constellation::Galileo, FixStatus::Fix2D)
        .with_position(longitude, latitude, elevation)
}

/// Receiver lost its fix, still reporting
pub fn no_fix_report() -> PositioningReport {
    PositioningReport::default()
        .with_status(ReceiverStatus::Void)
        .with_fix_type(FixType::Bad)
        .with_constellation(Constellation::GPS, FixStatus::NoFix)
}

#[derive(Debug, Default)]
pub struct TestTransport {
    pub fail: bool,
}

impl Transport for TestTransport {
    fn open(&mut self) -> Result<(), Error> {
        if self.fail {
            Err(Error::Transport("no such device".to_string()))
        } else {
            Ok(())
        }
    }
    fn close(&mut self) {}
}

/// Records all notifications it receives
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    inner: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.inner.borrow().clone()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    pub fn record(&self, event: &Event) {
        self.inner.borrow_mut().push(event.clone());
    }

    pub fn count<F: Fn(&Event) -> bool>(&self, f: F) -> usize {
        self.inner.borrow().iter().filter(|e| f(e)).count()
    }

    pub fn fix_status_changes(&self) -> Vec<FixStatus> {
        self.inner
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::FixStatusChanged(status) => Some(*status),
                _ => None,
            })
            .collect()
    }
}
