use std::io::{self, Stderr, Stdout, Write};

use crate::{Thrust, error::LineError};

/// Where thrust readings and per-line errors end up.
pub trait Sink {
    fn record(&mut self, thrust: &Thrust) -> io::Result<()>;

    fn line_error(&mut self, error: &LineError) -> io::Result<()>;
}

/// Prints readings to one writer and errors to another, one line each.
pub struct ConsoleSink<O, E> {
    out: O,
    err: E,
}

impl ConsoleSink<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Sink for ConsoleSink<O, E> {
    fn record(&mut self, thrust: &Thrust) -> io::Result<()> {
        writeln!(self.out, "Received thrust: {thrust}")?;
        self.out.flush()
    }

    fn line_error(&mut self, error: &LineError) -> io::Result<()> {
        writeln!(self.err, "{error}")?;
        self.err.flush()
    }
}
