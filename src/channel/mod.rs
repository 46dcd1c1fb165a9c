//! I/O channels between the interpreter and the outside world
//!
//! A [`Channel`] is an ordered stream of symbols that the engine reads from
//! (`,`) or writes to (`.`). Two flavors exist:
//! - [`bytes`]: symbols are bytes `0..=255`
//! - [`codepoint`]: symbols are Unicode scalar values carried as UTF-8
//!
//! Both wrap any `Read + Write` backing store and default to an in-memory
//! buffer. Plain readers and writers (stdin, stdout, files) are adapted with
//! [`ReadOnly`] and [`WriteOnly`].
//!
//! # Exhaustion
//!
//! A channel reports the end of its input as `Ok(None)` and never treats it
//! as an error; what happens next is decided by the engine's
//! [`EofPolicy`](crate::interpreter::engine::EofPolicy).

pub mod bytes;
pub mod codepoint;

pub use bytes::ByteChannel;
pub use codepoint::CodepointChannel;

use std::io::{self, Read, Write};

/// Ordered read/write of discrete symbols
pub trait Channel {
    /// Read the next symbol, or `None` once the channel is exhausted
    fn read_one(&mut self) -> io::Result<Option<u32>>;

    /// Write one symbol
    fn write_one(&mut self, symbol: u32) -> io::Result<()>;

    /// Map a cell value to a symbol of this channel's flavor
    ///
    /// Returns `None` when the value has no representation.
    fn encode(&self, value: i64) -> Option<u32>;

    /// Push buffered output to the backing store
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn read_one(&mut self) -> io::Result<Option<u32>> {
        (**self).read_one()
    }

    fn write_one(&mut self, symbol: u32) -> io::Result<()> {
        (**self).write_one(symbol)
    }

    fn encode(&self, value: i64) -> Option<u32> {
        (**self).encode(value)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn read_one(&mut self) -> io::Result<Option<u32>> {
        (**self).read_one()
    }

    fn write_one(&mut self, symbol: u32) -> io::Result<()> {
        (**self).write_one(symbol)
    }

    fn encode(&self, value: i64) -> Option<u32> {
        (**self).encode(value)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Backing store over a reader; writing fails with `Unsupported`
#[derive(Debug)]
pub struct ReadOnly<R>(pub R);

impl<R: Read> Read for ReadOnly<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R> Write for ReadOnly<R> {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "channel is read-only",
        ))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Backing store over a writer; reading fails with `Unsupported`
#[derive(Debug)]
pub struct WriteOnly<W>(pub W);

impl<W> Read for WriteOnly<W> {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "channel is write-only",
        ))
    }
}

impl<W: Write> Write for WriteOnly<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Read a single byte, retrying on `Interrupted`
pub(crate) fn read_byte<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
