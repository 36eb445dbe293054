use std::io::{self, Read};

use circular::Buffer;

use crate::error::PcapError;

/// Forward-only access to a byte stream
///
/// The cursor is based on a circular buffer, which means memory usage is bounded by the
/// largest block read so far, and that it can be used to parse huge files or infinite
/// streams. There is no seeking: bytes are looked at with [`peek`](ByteCursor::peek) and
/// then released with [`advance`](ByteCursor::advance).
///
/// The buffer grows when a caller needs more contiguous bytes than its capacity.
pub struct ByteCursor<R>
where
    R: Read,
{
    reader: R,
    buffer: Buffer,
    consumed: u64,
    reader_exhausted: bool,
}

impl<R> ByteCursor<R>
where
    R: Read,
{
    /// Creates a new `ByteCursor<R>` with the provided initial buffer capacity.
    pub fn new(capacity: usize, reader: R) -> ByteCursor<R> {
        ByteCursor {
            reader,
            buffer: Buffer::with_capacity(capacity.max(16)),
            consumed: 0,
            reader_exhausted: false,
        }
    }

    /// Try to have at least `n` bytes buffered
    ///
    /// Returns `Ok(false)` if the stream ended before `n` bytes could be read.
    pub fn fill(&mut self, n: usize) -> Result<bool, PcapError> {
        if n > self.buffer.capacity() {
            self.buffer.shift();
            self.buffer.grow(n);
        }
        while self.buffer.available_data() < n {
            if self.reader_exhausted {
                return Ok(false);
            }
            self.refill()?;
        }
        Ok(true)
    }

    /// Returns exactly `n` bytes from the current position, without consuming them
    ///
    /// Fails with `UnexpectedEof` if fewer than `n` bytes remain in the stream.
    pub fn peek(&mut self, n: usize) -> Result<&[u8], PcapError> {
        if !self.fill(n)? {
            return Err(PcapError::UnexpectedEof);
        }
        Ok(&self.buffer.data()[..n])
    }

    /// Consume `n` bytes. The caller must have checked they are available using `peek`.
    ///
    /// Slices returned by `peek` must be dropped before calling this function.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.buffer.available_data());
        self.consumed += n as u64;
        self.buffer.consume(n);
    }

    /// Returns true if the stream ended exactly at the current position
    ///
    /// This is the only place where end of stream is not a truncation.
    pub fn at_end(&mut self) -> Result<bool, PcapError> {
        Ok(!self.fill(1)?)
    }

    /// Returns the buffered bytes, starting at the current position
    ///
    /// Holds at least as many bytes as the last successful `peek` or `fill` requested.
    #[inline]
    pub fn buffered(&self) -> &[u8] {
        self.buffer.data()
    }

    /// Get the number of consumed bytes (the offset of the current position in the stream)
    #[inline]
    pub fn position(&self) -> u64 {
        self.consumed
    }

    /// Returns true if underlying reader is exhausted
    ///
    /// Note that exhausted reader only means that next `refill` will not
    /// add any data, but there can still be data not consumed in the current buffer.
    #[inline]
    pub fn reader_exhausted(&self) -> bool {
        self.reader_exhausted
    }

    fn refill(&mut self) -> Result<(), PcapError> {
        self.buffer.shift();
        let space = self.buffer.space();
        // check if available space is empty, so we can distinguish
        // a read() returning 0 because of EOF or because we requested 0
        if space.is_empty() {
            return Ok(());
        }
        let sz = match self.reader.read(space) {
            Ok(sz) => sz,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(()),
            Err(e) => return Err(PcapError::ReadError(e)),
        };
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
}
