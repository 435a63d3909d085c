use std::fmt;
use std::str;

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    TelemetryRecord, Thrust,
    error::{IngestError, LineError},
    sink::Sink,
    source::{LineSource, ReadLine},
};

/// What a single non-failing line turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Nothing but whitespace, ignored.
    Empty,
    Thrust(Thrust),
}

/// Why the ingest loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Cancellation was requested, usually by Ctrl-C.
    Cancelled,
    /// The byte source ran out of data. Device readers report this as an
    /// error instead.
    EndOfStream,
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled"),
            Self::EndOfStream => f.write_str("end of stream"),
        }
    }
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub shutdown: Shutdown,
    pub records: u64,
    pub decode_errors: u64,
    /// Lines which parsed but had no usable thrust value.
    pub skipped: u64,
}

/// Turn one raw line into a thrust reading.
pub fn process_line(bytes: &[u8]) -> Result<LineOutcome, LineError> {
    let text = str::from_utf8(bytes).map_err(|_| LineError::InvalidUtf8 {
        raw: String::from_utf8_lossy(bytes).trim().to_string(),
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Ok(LineOutcome::Empty);
    }

    let record = TelemetryRecord::from_json(text).map_err(|source| LineError::InvalidJson {
        raw: text.to_string(),
        source,
    })?;

    match record.thrust() {
        Some(Some(thrust)) => Ok(LineOutcome::Thrust(thrust)),
        Some(None) => Err(LineError::NotANumber {
            raw: text.to_string(),
        }),
        None => Err(LineError::MissingField {
            raw: text.to_string(),
        }),
    }
}

/// Reads lines from a source into a sink until told to stop.
pub struct Ingester {
    cancel: watch::Receiver<bool>,
}

impl Ingester {
    /// `cancel` stops the loop once it holds `true`.
    pub fn new(cancel: watch::Receiver<bool>) -> Self {
        Self { cancel }
    }

    fn cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Run the loop until cancellation, end of stream, or a fatal I/O
    /// error.
    ///
    /// The source is dropped before this returns, whichever way the loop
    /// ended. Cancellation is checked once per read, so it takes effect
    /// within one read timeout.
    #[instrument(skip_all)]
    pub fn run<S, K>(&self, mut source: S, sink: &mut K) -> Result<Summary, IngestError>
    where
        S: LineSource,
        K: Sink + ?Sized,
    {
        let result = self.drive(&mut source, sink);
        drop(source);
        debug!("Byte source released");

        if let Ok(summary) = &result {
            info!(
                records = summary.records,
                decode_errors = summary.decode_errors,
                skipped = summary.skipped,
                "Ingest stopped: {}",
                summary.shutdown
            );
        }
        result
    }

    fn drive<S, K>(&self, source: &mut S, sink: &mut K) -> Result<Summary, IngestError>
    where
        S: LineSource,
        K: Sink + ?Sized,
    {
        let mut records = 0;
        let mut decode_errors = 0;
        let mut skipped = 0;

        let shutdown = loop {
            if self.cancelled() {
                break Shutdown::Cancelled;
            }

            let bytes = match source.read_line().map_err(IngestError::Source)? {
                ReadLine::Line(bytes) => bytes,
                ReadLine::Timeout => continue,
                ReadLine::Eof => break Shutdown::EndOfStream,
            };

            // The line arrived while cancellation was requested.
            if self.cancelled() {
                break Shutdown::Cancelled;
            }

            match process_line(&bytes) {
                Ok(LineOutcome::Empty) => (),
                Ok(LineOutcome::Thrust(thrust)) => {
                    debug!("Thrust {thrust}");
                    sink.record(&thrust).map_err(IngestError::Sink)?;
                    records += 1;
                }
                Err(e) => {
                    warn!("{e}");
                    if e.is_decode_error() {
                        decode_errors += 1;
                    } else {
                        skipped += 1;
                    }
                    sink.line_error(&e).map_err(IngestError::Sink)?;
                }
            }
        };

        Ok(Summary {
            shutdown,
            records,
            decode_errors,
            skipped,
        })
    }
}
