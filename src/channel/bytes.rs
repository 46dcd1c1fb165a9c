//! Byte-valued channel

use super::{read_byte, Channel, ReadOnly, WriteOnly};
use std::io::{self, Cursor, Read, Write};

/// Channel whose symbols are single bytes
#[derive(Debug)]
pub struct ByteChannel<S = Cursor<Vec<u8>>> {
    inner: S,
}

impl ByteChannel {
    /// In-memory channel, empty
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory channel that yields `bytes` when read
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ByteChannel {
            inner: Cursor::new(bytes.into()),
        }
    }

    /// Everything written to (or preloaded into) the in-memory buffer
    pub fn contents(&self) -> &[u8] {
        self.inner.get_ref()
    }
}

impl Default for ByteChannel {
    fn default() -> Self {
        ByteChannel {
            inner: Cursor::new(Vec::new()),
        }
    }
}

impl<S> ByteChannel<S> {
    /// Channel over an arbitrary backing store
    pub fn with_backing(inner: S) -> Self {
        ByteChannel { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<R: Read> ByteChannel<ReadOnly<R>> {
    /// Input channel over a reader (stdin, a file, ...)
    pub fn reader(reader: R) -> Self {
        ByteChannel {
            inner: ReadOnly(reader),
        }
    }
}

impl<W: Write> ByteChannel<WriteOnly<W>> {
    /// Output channel over a writer (stdout, a file, ...)
    pub fn writer(writer: W) -> Self {
        ByteChannel {
            inner: WriteOnly(writer),
        }
    }
}

impl<S: Read + Write> Channel for ByteChannel<S> {
    fn read_one(&mut self) -> io::Result<Option<u32>> {
        Ok(read_byte(&mut self.inner)?.map(u32::from))
    }

    fn write_one(&mut self, symbol: u32) -> io::Result<()> {
        let byte = u8::try_from(symbol).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("symbol {} does not fit in a byte", symbol),
            )
        })?;
        self.inner.write_all(&[byte])
    }

    fn encode(&self, value: i64) -> Option<u32> {
        // 0..256 always fits
        Some(value.rem_euclid(256) as u32)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_until_exhausted() {
        let mut channel = ByteChannel::from_bytes(b"AB".to_vec());
        assert_eq!(channel.read_one().unwrap(), Some(65));
        assert_eq!(channel.read_one().unwrap(), Some(66));
        assert_eq!(channel.read_one().unwrap(), None);
        assert_eq!(channel.read_one().unwrap(), None);
    }

    #[test]
    fn test_writes_accumulate() {
        let mut channel = ByteChannel::new();
        channel.write_one(72).unwrap();
        channel.write_one(105).unwrap();
        assert_eq!(channel.contents(), b"Hi");
    }

    #[test]
    fn test_encode_wraps_to_byte() {
        let channel = ByteChannel::new();
        assert_eq!(channel.encode(65), Some(65));
        assert_eq!(channel.encode(256 + 10), Some(10));
        assert_eq!(channel.encode(-1), Some(255));
    }

    #[test]
    fn test_rejects_wide_symbol() {
        let mut channel = ByteChannel::new();
        let err = channel.write_one(0x263a).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_reader_and_writer_adapters() {
        let mut input = ByteChannel::reader(&b"x"[..]);
        assert_eq!(input.read_one().unwrap(), Some(u32::from(b'x')));
        assert_eq!(
            input.write_one(1).unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );

        let mut output = ByteChannel::writer(Vec::new());
        output.write_one(u32::from(b'y')).unwrap();
        assert_eq!(output.get_ref().0, b"y");
        assert_eq!(
            output.read_one().unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
    }
}
