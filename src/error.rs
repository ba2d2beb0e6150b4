use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Transport layer failure, as reported by the [Transport] itself.
    /// We never retry: reconnection policy belongs to the transport.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unknown coordinate reference system")]
    UnknownCrs,

    #[error("unknown ellipsoid")]
    UnknownEllipsoid,

    /// Custom ellipsoid definitions need a positive semi major axis
    /// and a flattening within [0, 1[.
    #[error("invalid ellipsoid definition")]
    InvalidEllipsoid,

    #[error("invalid quality indicator")]
    InvalidQualityIndicator,

    #[error("invalid receiver status")]
    InvalidReceiverStatus,
}
