use std::io::{self, ErrorKind, Read};
use std::mem;

/// Result of asking a [`LineSource`] for the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    /// A complete line, without its terminating `\n`.
    Line(Vec<u8>),
    /// The read timeout elapsed before a full line arrived.
    Timeout,
    /// The stream ended.
    Eof,
}

/// Something which hands out one line of raw bytes at a time, blocking no
/// longer than its read timeout.
pub trait LineSource {
    fn read_line(&mut self) -> io::Result<ReadLine>;
}

const CHUNK_SIZE: usize = 256;

/// Splits any byte stream on `\n`.
///
/// Bytes received before a timeout are held until the rest of their line
/// arrives.
pub struct LineReader<R> {
    inner: R,
    buffer: Vec<u8>,
    eof: bool,
    eof_is_error: bool,
}

impl<R: Read> LineReader<R> {
    /// A reader whose end of stream is a normal [`ReadLine::Eof`].
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            eof: false,
            eof_is_error: false,
        }
    }

    /// A reader over a device that never ends on its own.
    ///
    /// End of stream means the device went away and is returned as an
    /// `UnexpectedEof` error once any pending partial line is handed out.
    pub fn device(inner: R) -> Self {
        Self {
            eof_is_error: true,
            ..Self::new(inner)
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.buffer.iter().position(|&b| b == b'\n')?;
        let rest = self.buffer.split_off(end + 1);
        let mut line = mem::replace(&mut self.buffer, rest);
        line.pop();
        Some(line)
    }
}

impl<R: Read> LineSource for LineReader<R> {
    fn read_line(&mut self) -> io::Result<ReadLine> {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(ReadLine::Line(line));
            }

            // Whatever is left without a newline is the last line.
            if self.eof {
                if self.buffer.is_empty() {
                    if self.eof_is_error {
                        return Err(io::Error::new(
                            ErrorKind::UnexpectedEof,
                            "device closed the stream",
                        ));
                    }
                    return Ok(ReadLine::Eof);
                }
                return Ok(ReadLine::Line(mem::take(&mut self.buffer)));
            }

            match self.inner.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut => return Ok(ReadLine::Timeout),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
