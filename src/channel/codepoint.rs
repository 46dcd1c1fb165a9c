//! Codepoint-valued channel
//!
//! Symbols are Unicode scalar values; the backing store holds their UTF-8
//! encoding. Reads decode exactly one scalar at a time, so a multi-byte
//! character never reaches the engine split across two `,` instructions.

use super::{read_byte, Channel, ReadOnly, WriteOnly};
use std::borrow::Cow;
use std::io::{self, Cursor, Read, Write};

/// Channel whose symbols are Unicode scalar values
#[derive(Debug)]
pub struct CodepointChannel<S = Cursor<Vec<u8>>> {
    inner: S,
}

impl CodepointChannel {
    /// In-memory channel, empty
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory channel that yields the characters of `text` when read
    pub fn from_text(text: impl Into<String>) -> Self {
        CodepointChannel {
            inner: Cursor::new(text.into().into_bytes()),
        }
    }

    /// The in-memory buffer as text
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.inner.get_ref())
    }
}

impl Default for CodepointChannel {
    fn default() -> Self {
        CodepointChannel {
            inner: Cursor::new(Vec::new()),
        }
    }
}

impl<S> CodepointChannel<S> {
    /// Channel over an arbitrary backing store
    pub fn with_backing(inner: S) -> Self {
        CodepointChannel { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<R: Read> CodepointChannel<ReadOnly<R>> {
    /// Input channel over a UTF-8 reader
    pub fn reader(reader: R) -> Self {
        CodepointChannel {
            inner: ReadOnly(reader),
        }
    }
}

impl<W: Write> CodepointChannel<WriteOnly<W>> {
    /// Output channel over a writer, emitting UTF-8
    pub fn writer(writer: W) -> Self {
        CodepointChannel {
            inner: WriteOnly(writer),
        }
    }
}

/// Length of a UTF-8 sequence from its leading byte
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "input is not valid UTF-8")
}

impl<S: Read + Write> Channel for CodepointChannel<S> {
    fn read_one(&mut self) -> io::Result<Option<u32>> {
        let Some(lead) = read_byte(&mut self.inner)? else {
            return Ok(None);
        };
        let len = sequence_len(lead).ok_or_else(invalid_utf8)?;

        let mut buf = [0u8; 4];
        buf[0] = lead;
        self.inner.read_exact(&mut buf[1..len]).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                invalid_utf8()
            } else {
                e
            }
        })?;

        let decoded = std::str::from_utf8(&buf[..len]).map_err(|_| invalid_utf8())?;
        Ok(decoded.chars().next().map(u32::from))
    }

    fn write_one(&mut self, symbol: u32) -> io::Result<()> {
        let c = char::from_u32(symbol).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("0x{:x} is not a Unicode scalar value", symbol),
            )
        })?;
        let mut buf = [0u8; 4];
        self.inner.write_all(c.encode_utf8(&mut buf).as_bytes())
    }

    fn encode(&self, value: i64) -> Option<u32> {
        u32::try_from(value)
            .ok()
            .filter(|&v| char::from_u32(v).is_some())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
