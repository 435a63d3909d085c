use std::io;

/// A line that could not be turned into a thrust reading.
///
/// These never stop the ingester, the line is reported and skipped.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("Invalid UTF-8 received: {raw}")]
    InvalidUtf8 { raw: String },

    #[error("Invalid JSON received: {raw}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing \"Thrust\" field: {raw}")]
    MissingField { raw: String },

    #[error("Non-numeric \"Thrust\" value: {raw}")]
    NotANumber { raw: String },
}

impl LineError {
    /// The offending line, as received.
    pub fn raw(&self) -> &str {
        match self {
            Self::InvalidUtf8 { raw }
            | Self::InvalidJson { raw, .. }
            | Self::MissingField { raw }
            | Self::NotANumber { raw } => raw,
        }
    }

    /// Whether the line failed to decode, as opposed to decoding into a
    /// record without a usable thrust value.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::InvalidUtf8 { .. } | Self::InvalidJson { .. })
    }
}

/// Errors which end the ingest loop.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Reading from the serial port failed: {0}")]
    Source(#[source] io::Error),

    #[error("Writing output failed: {0}")]
    Sink(#[source] io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("Could not open serial port {path}: {source}")]
pub struct OpenError {
    pub path: String,
    #[source]
    pub source: serialport::Error,
}
