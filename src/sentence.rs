//! Raw sentence capture
use log::trace;

/// Side observer receiving raw NMEA sentences, for diagnostic purposes.
/// Has no influence on classification.
pub trait SentenceSink {
    fn log_sentence(&mut self, sentence: &str);
}

/// [SentenceSink] forwarding sentences to the `log` facade, under the "nmea" target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SentenceSink for LogSink {
    fn log_sentence(&mut self, sentence: &str) {
        trace!(target: "nmea", "{}", sentence.trim_end());
    }
}
