use crate::buf::ReplayBuf;
use crate::error::ReadError;

/// Little-endian view over a [`ReplayBuf`].
///
/// Every multi-byte read routes back through the parent's guarded network-
/// order accessor and byte-swaps the result. The view performs no bounds
/// check of its own — if it did, a shortfall inside a swapped read would
/// bypass the retry guarantee and decode loops would stop being safely
/// re-runnable for little-endian protocols.
///
/// Obtained via [`ReplayBuf::swapped`]. Single-byte reads and positional
/// queries are order-independent and delegate unchanged; everything else
/// (search, bulk copies, termination) lives on the parent.
pub struct SwappedReplayBuf<'s, 'a> {
    inner: &'s mut ReplayBuf<'a>,
}

impl<'s, 'a> SwappedReplayBuf<'s, 'a> {
    pub(crate) fn new(inner: &'s mut ReplayBuf<'a>) -> Self {
        Self { inner }
    }

    // ── Sequential reads (little-endian) ──────────────────────────────────

    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        self.inner.read_bool()
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.inner.read_u8()
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        self.inner.read_i8()
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.inner.read_u16().map(u16::swap_bytes)
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        self.read_u16().map(|v| v as i16)
    }

    pub fn read_u24(&mut self) -> Result<u32, ReadError> {
        self.inner.read_u24().map(swap_24)
    }

    pub fn read_i24(&mut self) -> Result<i32, ReadError> {
        self.read_u24().map(sign_extend_24)
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.inner.read_u32().map(u32::swap_bytes)
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        self.read_u32().map(|v| v as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        self.inner.read_u64().map(u64::swap_bytes)
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        self.read_u64().map(|v| v as i64)
    }

    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        self.read_u32().map(f32::from_bits)
    }

    pub fn read_f64(&mut self) -> Result<f64, ReadError> {
        self.read_u64().map(f64::from_bits)
    }

    // ── Random-access reads (little-endian) ───────────────────────────────

    pub fn get_u8(&self, index: usize) -> Result<u8, ReadError> {
        self.inner.get_u8(index)
    }

    pub fn get_u16(&self, index: usize) -> Result<u16, ReadError> {
        self.inner.get_u16(index).map(u16::swap_bytes)
    }

    pub fn get_u24(&self, index: usize) -> Result<u32, ReadError> {
        self.inner.get_u24(index).map(swap_24)
    }

    pub fn get_u32(&self, index: usize) -> Result<u32, ReadError> {
        self.inner.get_u32(index).map(u32::swap_bytes)
    }

    pub fn get_u64(&self, index: usize) -> Result<u64, ReadError> {
        self.inner.get_u64(index).map(u64::swap_bytes)
    }

    // ── Positional queries ────────────────────────────────────────────────

    #[must_use]
    pub fn reader_position(&self) -> usize {
        self.inner.reader_position()
    }

    #[must_use]
    pub fn writer_position(&self) -> usize {
        self.inner.writer_position()
    }
}

/// Reverse the order of the low three bytes of a 24-bit value.
fn swap_24(v: u32) -> u32 {
    ((v & 0xFF) << 16) | (v & 0xFF00) | (v >> 16)
}

#[allow(clippy::cast_possible_wrap)]
fn sign_extend_24(v: u32) -> i32 {
    ((v << 8) as i32) >> 8
}
