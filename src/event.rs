//! Change notifications
use std::collections::VecDeque;

use log::trace;

use crate::prelude::{ConnectionStatus, FixStatus, PositioningReport, Vector3};

/// Notifications emitted towards presentation collaborators.
/// Each one is only emitted on actual change.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// [ConnectionStatus] changed
    StatusChanged(ConnectionStatus),
    /// Last known position changed (longitude, latitude, elevation)
    PositionChanged(Vector3<f64>),
    /// Best [FixStatus] changed
    FixStatusChanged(FixStatus),
    /// Track was modified
    TrackChanged,
    /// Track went from empty to non empty, or vice versa.
    /// Carries the new emptiness.
    TrackIsEmptyChanged(bool),
    /// Ellipsoid used in length calculations was modified
    DistanceAreaChanged,
}

/// Actions a listener may request from within a notification.
/// They are applied once the current notification round completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ResetTrack,
    Close,
    ClearState,
    Report(PositioningReport),
}

/// [Command]s collected during one notification round.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Commands {
    inner: Vec<Command>,
}

impl Commands {
    pub fn reset_track(&mut self) {
        self.inner.push(Command::ResetTrack);
    }

    pub fn close(&mut self) {
        self.inner.push(Command::Close);
    }

    pub fn clear_state(&mut self) {
        self.inner.push(Command::ClearState);
    }

    pub fn report(&mut self, report: PositioningReport) {
        self.inner.push(Command::Report(report));
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl IntoIterator for Commands {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

pub type Listener = Box<dyn FnMut(&Event, &mut Commands)>;

/// Identifies a registered [Listener]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// [Notifier] fans out queued [Event]s to registered listeners.
#[derive(Default)]
pub struct Notifier {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
    pending: VecDeque<Event>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl Notifier {
    pub fn subscribe<F: FnMut(&Event, &mut Commands) + 'static>(&mut self, f: F) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(f)));
        id
    }

    /// Returns true if this listener was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let len = self.listeners.len();
        self.listeners.retain(|(k, _)| *k != id);
        self.listeners.len() != len
    }

    /// Queues new [Event]s, in order.
    pub fn push<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        self.pending.extend(events);
    }

    /// Delivers all queued [Event]s, in order, and returns
    /// the [Commands] listeners requested.
    pub fn flush(&mut self) -> Commands {
        let mut commands = Commands::default();
        while let Some(event) = self.pending.pop_front() {
            trace!("notifying {:?}", event);
            for (_, listener) in self.listeners.iter_mut() {
                listener(&event, &mut commands);
            }
        }
        commands
    }
}
