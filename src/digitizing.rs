//! Digitizing session
use std::sync::Arc;

use log::{debug, info};

use crate::{
    event::{Command, Commands, ListenerId},
    prelude::{
        Config, Connection, Constellation, CoordinateTransform, DistanceCalculator, Epoch, Event,
        FixStatus, Notifier, PositioningReport, Rejection, SentenceSink, Track, TrackFeature,
        TrackVertex, Transport, Vector3,
    },
};

/// [Digitizing] wires the receiver [Connection] to the [Track] accumulation,
/// for one digitizing session. Reports are handled to completion, one at a time.
pub struct Digitizing<T: Transport> {
    connection: Connection<T>,
    track: Track,
    cfg: Arc<Config>,
    transform: CoordinateTransform,
    calculator: DistanceCalculator,
    notifier: Notifier,
    sink: Option<Box<dyn SentenceSink>>,
    updating: bool,
}

impl<T: Transport> Digitizing<T> {
    /// Starts a new [Digitizing] session, with empty [Track].
    pub fn new(connection: Connection<T>, cfg: Config) -> Self {
        info!("digitizing session: {:?}", cfg);
        Self {
            connection,
            track: Track::new(),
            transform: CoordinateTransform::to_geographic_frame(cfg.working_crs),
            calculator: DistanceCalculator::new(cfg.ellipsoid),
            cfg: Arc::new(cfg),
            notifier: Notifier::default(),
            sink: None,
            updating: false,
        }
    }

    /// Registers a new listener. Listeners may request [Command]s,
    /// applied once the current notification round completes.
    pub fn subscribe<F: FnMut(&Event, &mut Commands) + 'static>(&mut self, f: F) -> ListenerId {
        self.notifier.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Defines the [SentenceSink] raw sentences are forwarded to,
    /// when [Config] allows it.
    pub fn set_sentence_sink<S: SentenceSink + 'static>(&mut self, sink: S) {
        self.sink = Some(Box::new(sink));
    }

    /// Current [Config] snapshot
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.cfg)
    }

    /// Swaps the [Config] snapshot. Lengths are recomputed when the
    /// ellipsoid changed, the transform is rebuilt when the working frame changed.
    pub fn settings_changed(&mut self, cfg: Config) {
        let previous = std::mem::replace(&mut self.cfg, Arc::new(cfg));

        if previous.working_crs != self.cfg.working_crs {
            debug!("working frame: {} -> {}", previous.working_crs, self.cfg.working_crs);
            self.transform = CoordinateTransform::to_geographic_frame(self.cfg.working_crs);
        }

        if previous.ellipsoid != self.cfg.ellipsoid {
            self.calculator = DistanceCalculator::new(self.cfg.ellipsoid);
            self.track.update_lengths(&self.calculator);
            self.notifier.push([Event::DistanceAreaChanged]);
        }

        self.dispatch();
    }

    pub fn connect(&mut self) -> bool {
        let connected = self.connection.connect();
        self.dispatch();
        connected
    }

    pub fn close(&mut self) -> bool {
        let closed = self.connection.close();
        self.dispatch();
        closed
    }

    /// Swaps the [Transport], resetting receiver state. The [Track] is preserved.
    pub fn replace_source(&mut self, source: T) {
        self.connection.replace_source(source);
        self.dispatch();
    }

    /// Resets receiver state to neutral values.
    pub fn clear_state(&mut self) {
        self.connection.clear();
        self.dispatch();
    }

    /// Forwards a raw sentence to the [SentenceSink], if enabled.
    pub fn on_sentence(&mut self, sentence: &str) {
        if !self.cfg.sentence_logging {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.log_sentence(sentence);
        }
    }

    /// Handles a new [PositioningReport]: updates receiver state
    /// and grows the [Track] when the report is accepted.
    pub fn on_report(&mut self, report: PositioningReport) -> Result<(), Rejection> {
        self.updating = true;

        let cfg = Arc::clone(&self.cfg);
        self.connection.on_report(report.clone());
        let acquisition = self.acquire(&report, &cfg);

        self.dispatch();
        self.updating = false;
        acquisition
    }

    /// Proposes this [PositioningReport] as a new [Track] vertex.
    pub fn add_vertex(&mut self, report: &PositioningReport) -> Result<(), Rejection> {
        let cfg = Arc::clone(&self.cfg);
        let acquisition = self.acquire(report, &cfg);
        self.dispatch();
        acquisition
    }

    /// Proposes a working frame location as a new [Track] vertex.
    pub fn add_vertex_at(
        &mut self,
        working: Vector3<f64>,
        epoch: Option<Epoch>,
    ) -> Result<(), Rejection> {
        if !self.connection.is_connected() {
            return Err(Rejection::NotConnected);
        }

        let vertex = TrackVertex::new(self.transform.to_geographic(&working), epoch);
        let cfg = Arc::clone(&self.cfg);
        let acquisition = self.append(vertex, &cfg);
        self.dispatch();
        acquisition
    }

    fn acquire(&mut self, report: &PositioningReport, cfg: &Config) -> Result<(), Rejection> {
        if !self.connection.is_connected() {
            return Err(Rejection::NotConnected);
        }
        if !report.is_valid() {
            return Err(Rejection::InvalidFix);
        }
        let vertex = TrackVertex::new(report.position(), report.utc_time);
        self.append(vertex, cfg)
    }

    fn append(&mut self, vertex: TrackVertex, cfg: &Config) -> Result<(), Rejection> {
        self.track
            .acquisition(&cfg.acquisition, &self.calculator, &vertex)?;
        self.track.push(vertex, &self.calculator);
        Ok(())
    }

    /// Clears the [Track].
    pub fn reset_track(&mut self) {
        self.track.reset();
        self.dispatch();
    }

    /// Hands over the current [Track] as a [TrackFeature].
    /// The [Track] is not reset: that is up to the caller.
    pub fn create_feature(&self) -> Option<TrackFeature> {
        if self.track.is_empty() {
            return None;
        }
        Some(self.track.feature(&self.cfg.timestamps))
    }

    fn dispatch(&mut self) {
        let commands = self.flush();
        self.apply(commands);
    }

    fn flush(&mut self) -> Commands {
        self.notifier.push(self.connection.drain_events());
        self.notifier.push(self.track.drain_events());
        self.notifier.flush()
    }

    /// Applies listener [Command]s. Commands requested in reaction to these
    /// are dropped, and so are reports while a report is being processed.
    fn apply(&mut self, commands: Commands) {
        for command in commands {
            match command {
                Command::ResetTrack => self.track.reset(),
                Command::Close => {
                    self.connection.close();
                },
                Command::ClearState => self.connection.clear(),
                Command::Report(report) => {
                    if self.updating {
                        debug!("nested report suppressed");
                    } else {
                        let _ = self.on_report(report);
                    }
                },
            }
        }

        let nested = self.flush();
        if !nested.is_empty() {
            debug!("{} nested command(s) suppressed", nested.len());
        }
    }

    pub fn connection(&self) -> &Connection<T> {
        &self.connection
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn distance_calculator(&self) -> &DistanceCalculator {
        &self.calculator
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Current best [FixStatus] and the [Constellation] providing it.
    pub fn fix_status(&self) -> (FixStatus, Option<Constellation>) {
        (
            self.connection.last_fix_status(),
            self.connection.best_constellation(),
        )
    }

    /// Ellipsoidal track length (meters)
    pub fn total_track_length(&self) -> f64 {
        self.track.total_length_m()
    }

    /// Ellipsoidal distance from first to last vertex (meters)
    pub fn track_distance_from_start(&self) -> f64 {
        self.track.distance_from_start_m()
    }

    /// Current track, expressed in the working frame
    pub fn track_in_working_frame(&self) -> Vec<Vector3<f64>> {
        self.track.working_geometry(&self.transform)
    }

    /// Last valid position, expressed in the working frame
    pub fn last_position_working(&self) -> Option<Vector3<f64>> {
        self.connection
            .last_position()
            .map(|p| self.transform.to_working(&p))
    }
}
