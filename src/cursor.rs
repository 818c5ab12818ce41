use crate::Error;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::*;
use nom::Endianness;

///
/// Bounded, position-tracking view over a byte buffer. Every decoding read
/// goes through a cursor, and nested decoders only ever receive a
/// `sub_cursor` scoped to the byte range their parent allocated to them, so
/// no layer can read past its own boundary.
///
/// `read` is tolerant: asking for more bytes than remain yields the bytes
/// that exist and marks the cursor truncated, which is the expected shape of
/// a capture cut short by the snapshot length. The fixed-width integer reads
/// are strict and fail with [`Error::TruncatedData`] without consuming
/// anything, since a short read inside a mandatory header field means the
/// field cannot be decoded at all.
///
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    endianness: Endianness,
    verbose: bool,
    truncated: bool,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8], endianness: Endianness) -> ByteCursor<'a> {
        ByteCursor {
            buf,
            pos: 0,
            endianness,
            verbose: false,
            truncated: false,
        }
    }

    /// Enable short-read reporting through `log`.
    pub fn verbose(mut self, verbose: bool) -> ByteCursor<'a> {
        self.verbose = verbose;
        self
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Offset of the next read, relative to the start of this cursor's range.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Whether any read so far asked for more bytes than remained.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Read up to `n` bytes, advancing past them. Returns fewer bytes than
    /// requested when the buffer runs out.
    pub fn read(&mut self, n: usize) -> &'a [u8] {
        let available = self.remaining();
        let take = std::cmp::min(n, available);
        if take < n {
            self.truncated = true;
            if self.verbose {
                debug!("short read at offset {}: wanted {} bytes, {} available", self.pos, n, available);
            }
        }
        let bytes = &self.buf[self.pos..self.pos + take];
        self.pos += take;
        bytes
    }

    /// All bytes from the current offset to the end of the range.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..];
        self.pos = self.buf.len();
        bytes
    }

    /// Read exactly `n` bytes or fail without consuming anything.
    pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let available = self.remaining();
        if available < n {
            self.truncated = true;
            if self.verbose {
                debug!("short read at offset {}: wanted {} bytes, {} available", self.pos, n, available);
            }
            return Err(Error::TruncatedData {
                needed: n,
                available,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Child cursor over exactly the next `n` bytes, clamped to the bytes
    /// that actually remain. The parent's offset advances past the range, so
    /// sibling data (an ethernet trailer, the next option) is unreachable
    /// from the child.
    pub fn sub_cursor(&mut self, n: usize) -> ByteCursor<'a> {
        let verbose = self.verbose;
        let bytes = self.read(n);
        ByteCursor::new(bytes, self.endianness).verbose(verbose)
    }

    /// Child cursor over everything left in this cursor's range.
    pub fn sub_cursor_to_end(&mut self) -> ByteCursor<'a> {
        let remaining = self.remaining();
        self.sub_cursor(remaining)
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.buf.get(self.pos).cloned()
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let bytes = self.read_exact(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let bytes = self.read_exact(2)?;
        Ok(match self.endianness {
            Endianness::Big => BigEndian::read_u16(bytes),
            Endianness::Little => LittleEndian::read_u16(bytes),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let bytes = self.read_exact(4)?;
        Ok(match self.endianness {
            Endianness::Big => BigEndian::read_u32(bytes),
            Endianness::Little => LittleEndian::read_u32(bytes),
        })
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        let bytes = self.read_exact(8)?;
        Ok(match self.endianness {
            Endianness::Big => BigEndian::read_u64(bytes),
            Endianness::Little => LittleEndian::read_u64(bytes),
        })
    }
}
