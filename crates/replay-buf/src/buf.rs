use replay_store::ByteStore;

use crate::error::ReadError;
use crate::swapped::SwappedReplayBuf;

/// Read-only view over a [`ByteStore`] that lets decode logic run as if the
/// full message had already arrived.
///
/// Every bounds-sensitive accessor computes the absolute end offset its
/// request implies and guards it against the store's write position:
///
/// ```text
///                  ┌───────────────┐ delegate unchanged
///   request ──────▶│ end ≤ writer? │────────────────────▶ store value
///                  └───────┬───────┘
///                          │ shortfall
///                  ┌───────▼───────┐
///                  │ terminated?   │── no ──▶ Err(Replay)    rewind + retry
///                  └───────┬───────┘
///                          └─ yes ─▶ Err(Exhausted { .. })   fatal
/// ```
///
/// While the buffer is live, capacity and readable-length reporting is
/// optimistic (unbounded), so straight-line decode code can ask "are there
/// at least N bytes left?" without special-casing the speculative phase.
/// After [`terminate`](Self::terminate) — a one-way flip, made once the
/// stream is known to never grow again — the view degrades to a transparent
/// bounds-checked proxy and all reporting reflects true store state.
///
/// Positional queries (`reader_position`, mark/reset) always delegate
/// directly: they reflect real progress and claim nothing about bytes that
/// have not arrived.
///
/// The view is a pure read projection. The handful of write-named methods it
/// carries exist only to fail: each returns [`ReadError::Unsupported`]
/// naming the call, in both live and terminated states. All mutation goes
/// through the [`ByteStore`] itself.
///
/// Multi-byte reads use network byte order; [`swapped`](Self::swapped)
/// yields the little-endian composition over the same guarded accessors.
///
/// # Example
///
/// ```
/// use replay_buf::{ReadError, ReplayBuf};
/// use replay_store::ByteStore;
///
/// let mut store = ByteStore::new();
/// store.append(&[0x00, 0x03, 0xAA]).unwrap();
///
/// let mut buf = ReplayBuf::new(&mut store);
/// let len = usize::from(buf.read_u16().unwrap());
/// // only one of the three body bytes has arrived: abort and retry later
/// assert_eq!(buf.read_bytes(len), Err(ReadError::Replay));
/// ```
pub struct ReplayBuf<'a> {
    store: &'a mut ByteStore,
    terminated: bool,
}

impl<'a> ReplayBuf<'a> {
    /// Wrap a store in a live (speculative) view.
    pub fn new(store: &'a mut ByteStore) -> Self {
        Self {
            store,
            terminated: false,
        }
    }

    /// Flip the view into terminated mode: the store will never grow again,
    /// so every further shortfall is a real [`ReadError::Exhausted`] failure
    /// instead of a retry signal. There is no way back.
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Whether [`terminate`](Self::terminate) has been called.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Little-endian view routing every multi-byte read back through this
    /// buffer's guarded accessors.
    pub fn swapped(&mut self) -> SwappedReplayBuf<'_, 'a> {
        SwappedReplayBuf::new(self)
    }

    // ── Guards ────────────────────────────────────────────────────────────

    fn shortfall(&self, requested: usize, available: usize) -> ReadError {
        if self.terminated {
            ReadError::Exhausted {
                requested,
                available,
            }
        } else {
            ReadError::Replay
        }
    }

    fn check_sequential(&self, len: usize) -> Result<(), ReadError> {
        let available = self.store.readable_bytes();
        if len > available {
            return Err(self.shortfall(len, available));
        }
        Ok(())
    }

    fn check_absolute(&self, index: usize, len: usize) -> Result<(), ReadError> {
        let writer = self.store.writer_position();
        match index.checked_add(len) {
            Some(end) if end <= writer => Ok(()),
            // an overflowing end offset can never be inside the written region
            _ => Err(self.shortfall(len, writer.saturating_sub(index))),
        }
    }

    fn read_chunk<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        self.check_sequential(N)?;
        Ok(self.store.read_array::<N>())
    }

    fn get_chunk<const N: usize>(&self, index: usize) -> Result<[u8; N], ReadError> {
        self.check_absolute(index, N)?;
        Ok(self.store.get_array::<N>(index))
    }

    // ── Sequential reads (network byte order) ─────────────────────────────

    /// Read one byte, interpreting any non-zero value as `true`.
    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        self.read_u8().map(|b| b != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.read_chunk::<1>().map(|[b]| b)
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        self.read_chunk::<1>().map(|[b]| b as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.read_chunk().map(u16::from_be_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        self.read_chunk().map(i16::from_be_bytes)
    }

    /// Read a 24-bit unsigned value into the low three bytes of a `u32`.
    pub fn read_u24(&mut self) -> Result<u32, ReadError> {
        let [a, b, c] = self.read_chunk::<3>()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Read a 24-bit two's-complement value, sign-extended into an `i32`.
    pub fn read_i24(&mut self) -> Result<i32, ReadError> {
        self.read_u24().map(sign_extend_24)
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.read_chunk().map(u32::from_be_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        self.read_chunk().map(i32::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        self.read_chunk().map(u64::from_be_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        self.read_chunk().map(i64::from_be_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        self.read_chunk().map(f32::from_be_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64, ReadError> {
        self.read_chunk().map(f64::from_be_bytes)
    }

    /// Read `len` bytes into a fresh `Vec`, advancing the read cursor.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReadError> {
        self.check_sequential(len)?;
        Ok(self.store.read_vec(len))
    }

    /// Fill `dst` from the read cursor, advancing it by `dst.len()`.
    pub fn read_exact(&mut self, dst: &mut [u8]) -> Result<(), ReadError> {
        self.check_sequential(dst.len())?;
        self.store.read_into(dst);
        Ok(())
    }

    /// Advance the read cursor by `len` without materializing the bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), ReadError> {
        self.check_sequential(len)?;
        self.store.skip(len);
        Ok(())
    }

    // ── Random-access reads (network byte order) ──────────────────────────

    pub fn get_bool(&self, index: usize) -> Result<bool, ReadError> {
        self.get_u8(index).map(|b| b != 0)
    }

    pub fn get_u8(&self, index: usize) -> Result<u8, ReadError> {
        self.get_chunk::<1>(index).map(|[b]| b)
    }

    pub fn get_i8(&self, index: usize) -> Result<i8, ReadError> {
        self.get_chunk::<1>(index).map(|[b]| b as i8)
    }

    pub fn get_u16(&self, index: usize) -> Result<u16, ReadError> {
        self.get_chunk(index).map(u16::from_be_bytes)
    }

    pub fn get_i16(&self, index: usize) -> Result<i16, ReadError> {
        self.get_chunk(index).map(i16::from_be_bytes)
    }

    pub fn get_u24(&self, index: usize) -> Result<u32, ReadError> {
        let [a, b, c] = self.get_chunk::<3>(index)?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    pub fn get_i24(&self, index: usize) -> Result<i32, ReadError> {
        self.get_u24(index).map(sign_extend_24)
    }

    pub fn get_u32(&self, index: usize) -> Result<u32, ReadError> {
        self.get_chunk(index).map(u32::from_be_bytes)
    }

    pub fn get_i32(&self, index: usize) -> Result<i32, ReadError> {
        self.get_chunk(index).map(i32::from_be_bytes)
    }

    pub fn get_u64(&self, index: usize) -> Result<u64, ReadError> {
        self.get_chunk(index).map(u64::from_be_bytes)
    }

    pub fn get_i64(&self, index: usize) -> Result<i64, ReadError> {
        self.get_chunk(index).map(i64::from_be_bytes)
    }

    pub fn get_f32(&self, index: usize) -> Result<f32, ReadError> {
        self.get_chunk(index).map(f32::from_be_bytes)
    }

    pub fn get_f64(&self, index: usize) -> Result<f64, ReadError> {
        self.get_chunk(index).map(f64::from_be_bytes)
    }

    /// Fill `dst` with the bytes at `[index, index + dst.len())`.
    pub fn get_bytes(&self, index: usize, dst: &mut [u8]) -> Result<(), ReadError> {
        self.check_absolute(index, dst.len())?;
        self.store.copy_into(index, dst);
        Ok(())
    }

    /// Copy `[index, index + len)` into a fresh `Vec`.
    pub fn copy(&self, index: usize, len: usize) -> Result<Vec<u8>, ReadError> {
        self.check_absolute(index, len)?;
        Ok(self.store.slice(index, index + len).to_vec())
    }

    // ── Positional queries (unguarded, direct delegation) ─────────────────

    /// Current position of the sequential read cursor.
    #[must_use]
    pub fn reader_position(&self) -> usize {
        self.store.reader_position()
    }

    /// Move the sequential read cursor to an absolute position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is past the store's write position.
    pub fn set_reader_position(&mut self, pos: usize) {
        self.store.set_reader_position(pos);
    }

    /// Count of valid bytes the store has received so far.
    #[must_use]
    pub fn writer_position(&self) -> usize {
        self.store.writer_position()
    }

    /// Bookmark the read cursor.
    pub fn mark_reader(&mut self) {
        self.store.mark_reader();
    }

    /// Rewind the read cursor to the last bookmark.
    pub fn reset_reader(&mut self) {
        self.store.reset_reader();
    }

    // ── Capacity and readability reporting ────────────────────────────────

    /// Reported capacity: unbounded while live, the store's true capacity
    /// once terminated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        if self.terminated {
            self.store.capacity()
        } else {
            usize::MAX
        }
    }

    /// Reported readable length: `usize::MAX - reader_position` while live
    /// (so optimistic "at least N bytes left?" checks never fail early), the
    /// true count once terminated.
    #[must_use]
    pub fn readable_bytes(&self) -> usize {
        if self.terminated {
            self.store.readable_bytes()
        } else {
            usize::MAX - self.store.reader_position()
        }
    }

    /// Whether more data can be read: always `true` while live.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        if self.terminated {
            self.store.is_readable()
        } else {
            true
        }
    }

    /// A read projection is never writable.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        false
    }

    /// A read projection has no room to write into.
    #[must_use]
    pub fn writable_bytes(&self) -> usize {
        0
    }

    // ── Search ────────────────────────────────────────────────────────────

    /// Find the first occurrence of `value` between the read cursor and the
    /// write position, returning its absolute offset.
    ///
    /// The window here is bounded by *availability*, so a miss is ambiguous
    /// while the buffer is live — the byte may simply not have arrived — and
    /// raises [`ReadError::Replay`]. After termination a miss is a genuine
    /// negative and comes back as `Ok(None)`. A hit is always definitive.
    pub fn find_readable(&self, value: u8) -> Result<Option<usize>, ReadError> {
        self.find_readable_where(|b| b == value)
    }

    /// Predicate form of [`find_readable`](Self::find_readable).
    pub fn find_readable_where(
        &self,
        predicate: impl Fn(u8) -> bool,
    ) -> Result<Option<usize>, ReadError> {
        let found = self.store.find_where(
            self.store.reader_position(),
            self.store.writer_position(),
            predicate,
        );
        match found {
            Some(at) => Ok(Some(at)),
            None if self.terminated => Ok(None),
            None => Err(ReadError::Replay),
        }
    }

    /// Find the first occurrence of `value` in the caller-supplied window
    /// `[from, to)`, returning its absolute offset.
    ///
    /// The window here is bounded by the *caller*, which changes what a miss
    /// means: if the whole window lies within written data, a miss is
    /// definitive (`Ok(None)`) even while the buffer is live — no future
    /// delivery can land inside it. Only when the window extends past the
    /// write position does a miss raise [`ReadError::Replay`] (after
    /// termination: `Ok(None)`, searching what exists).
    ///
    /// # Panics
    ///
    /// Panics if `from > to`.
    pub fn find_in(&self, from: usize, to: usize, value: u8) -> Result<Option<usize>, ReadError> {
        self.find_in_where(from, to, |b| b == value)
    }

    /// Predicate form of [`find_in`](Self::find_in).
    ///
    /// # Panics
    ///
    /// Panics if `from > to`.
    pub fn find_in_where(
        &self,
        from: usize,
        to: usize,
        predicate: impl Fn(u8) -> bool,
    ) -> Result<Option<usize>, ReadError> {
        assert!(from <= to, "search window start {from} past end {to}");
        if let Some(at) = self.store.find_where(from, to, predicate) {
            return Ok(Some(at));
        }
        if to > self.store.writer_position() && !self.terminated {
            return Err(ReadError::Replay);
        }
        Ok(None)
    }

    // ── Write-side surface (rejected unconditionally) ─────────────────────

    /// Appending through the read projection is not supported; append to the
    /// [`ByteStore`] directly.
    pub fn append(&mut self, _src: &[u8]) -> Result<(), ReadError> {
        Err(ReadError::Unsupported { op: "append" })
    }

    /// Overwriting a stored byte is not supported.
    pub fn set_u8(&mut self, _index: usize, _value: u8) -> Result<(), ReadError> {
        Err(ReadError::Unsupported { op: "set_u8" })
    }

    /// Moving the write cursor is not supported.
    pub fn set_writer_position(&mut self, _pos: usize) -> Result<(), ReadError> {
        Err(ReadError::Unsupported {
            op: "set_writer_position",
        })
    }

    /// Reclaiming consumed bytes is not supported.
    pub fn discard_read_bytes(&mut self) -> Result<(), ReadError> {
        Err(ReadError::Unsupported {
            op: "discard_read_bytes",
        })
    }

    /// Handing out a writable region is not supported.
    pub fn writable_slice(&mut self, _len: usize) -> Result<&mut [u8], ReadError> {
        Err(ReadError::Unsupported {
            op: "writable_slice",
        })
    }
}

/// Sign-extend the low 24 bits of `v` into an `i32`.
#[allow(clippy::cast_possible_wrap)]
fn sign_extend_24(v: u32) -> i32 {
    ((v << 8) as i32) >> 8
}

impl std::fmt::Debug for ReplayBuf<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayBuf")
            .field("reader", &self.store.reader_position())
            .field("writer", &self.store.writer_position())
            .field("terminated", &self.terminated)
            .finish()
    }
}
