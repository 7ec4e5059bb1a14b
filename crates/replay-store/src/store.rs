use bytes::BytesMut;

use crate::error::StoreError;

/// Append-only growable byte sequence with independent write and read cursors.
///
/// One `ByteStore` exists per connection. The ingestion side calls
/// [`append`](Self::append) as bytes arrive from the network; the decode side
/// walks the stored bytes through its own sequential cursor, bookmarks it,
/// and rewinds it between decode attempts.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ 0x17 0x03 0x03 0x00 0x2A 0x16 ...          (stored bytes)│
/// │           ▲                      ▲                       │
/// │           reader_position        writer_position         │
/// └──────────────────────────────────────────────────────────┘
///        0 ≤ reader_position ≤ writer_position ≤ capacity
/// ```
///
/// The store performs no speculative bounds handling of its own: random and
/// sequential reads panic when asked for bytes past `writer_position`, the
/// same contract as the accessors on [`bytes::Buf`]. Validating a request
/// against the written length *before* delegating here is the caller's job —
/// in this workspace that caller is `replay_buf::ReplayBuf`.
pub struct ByteStore {
    buf: BytesMut,
    reader: usize,
    mark: usize,
    limit: Option<usize>,
}

impl ByteStore {
    /// Create an empty store with no growth limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
            reader: 0,
            mark: 0,
            limit: None,
        }
    }

    /// Create an empty store that refuses to grow past `limit` bytes.
    ///
    /// A decode attempt that never completes keeps the connection buffering
    /// forever; the limit converts that into a hard [`StoreError`] at append
    /// time so the connection owner can shut it down.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            reader: 0,
            mark: 0,
            limit: Some(limit),
        }
    }

    // ── Growth ────────────────────────────────────────────────────────────

    /// Append bytes after the current write position.
    ///
    /// This is the only way the store grows; previously written bytes are
    /// never moved or discarded, so absolute offsets stay valid for the
    /// lifetime of the connection.
    ///
    /// # Errors
    ///
    /// [`StoreError::LimitExceeded`] if the store was built with
    /// [`with_limit`](Self::with_limit) and the append would cross it. The
    /// store is left unchanged in that case.
    pub fn append(&mut self, src: &[u8]) -> Result<(), StoreError> {
        if let Some(limit) = self.limit {
            if self.buf.len() + src.len() > limit {
                return Err(StoreError::LimitExceeded {
                    appended: src.len(),
                    written: self.buf.len(),
                    limit,
                });
            }
        }
        self.buf.extend_from_slice(src);
        Ok(())
    }

    // ── Cursor queries ────────────────────────────────────────────────────

    /// Count of valid bytes written so far.
    #[must_use]
    pub fn writer_position(&self) -> usize {
        self.buf.len()
    }

    /// Current position of the sequential read cursor.
    #[must_use]
    pub fn reader_position(&self) -> usize {
        self.reader
    }

    /// Move the sequential read cursor to an absolute position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is past [`writer_position`](Self::writer_position).
    pub fn set_reader_position(&mut self, pos: usize) {
        assert!(
            pos <= self.buf.len(),
            "reader position {pos} past written length {}",
            self.buf.len()
        );
        self.reader = pos;
    }

    /// Bytes between the read cursor and the write position.
    #[must_use]
    pub fn readable_bytes(&self) -> usize {
        self.buf.len() - self.reader
    }

    /// Whether any unread bytes remain.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.reader < self.buf.len()
    }

    /// The configured growth limit, or `usize::MAX` when unbounded.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.limit.unwrap_or(usize::MAX)
    }

    /// Bookmark the current read cursor for a later
    /// [`reset_reader`](Self::reset_reader).
    pub fn mark_reader(&mut self) {
        self.mark = self.reader;
    }

    /// Rewind the read cursor to the last bookmark (position 0 if none was
    /// ever set).
    pub fn reset_reader(&mut self) {
        self.reader = self.mark;
    }

    // ── Random access ─────────────────────────────────────────────────────

    /// Read one byte at an absolute offset.
    ///
    /// # Panics
    ///
    /// Panics if `index` is past the written region.
    #[must_use]
    pub fn get(&self, index: usize) -> u8 {
        self.buf[index]
    }

    /// Read `N` bytes at an absolute offset into a fixed array.
    ///
    /// # Panics
    ///
    /// Panics if `index + N` is past the written region.
    #[must_use]
    pub fn get_array<const N: usize>(&self, index: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[index..index + N]);
        out
    }

    /// Copy `dst.len()` bytes starting at an absolute offset into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if the requested range is past the written region.
    pub fn copy_into(&self, index: usize, dst: &mut [u8]) {
        dst.copy_from_slice(&self.buf[index..index + dst.len()]);
    }

    /// Borrow the written bytes in `[from, to)`.
    ///
    /// # Panics
    ///
    /// Panics if `from > to` or `to` is past the written region.
    #[must_use]
    pub fn slice(&self, from: usize, to: usize) -> &[u8] {
        &self.buf[from..to]
    }

    // ── Sequential access ─────────────────────────────────────────────────

    /// Read `N` bytes at the read cursor into a fixed array, advancing the
    /// cursor.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `N` readable bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let out = self.get_array::<N>(self.reader);
        self.reader += N;
        out
    }

    /// Read `dst.len()` bytes at the read cursor into `dst`, advancing the
    /// cursor.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `dst.len()` readable bytes remain.
    pub fn read_into(&mut self, dst: &mut [u8]) {
        self.copy_into(self.reader, dst);
        self.reader += dst.len();
    }

    /// Read `len` bytes at the read cursor into a fresh `Vec`, advancing the
    /// cursor.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `len` readable bytes remain.
    pub fn read_vec(&mut self, len: usize) -> Vec<u8> {
        let out = self.buf[self.reader..self.reader + len].to_vec();
        self.reader += len;
        out
    }

    /// Advance the read cursor by `len` without looking at the bytes.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `len` readable bytes remain.
    pub fn skip(&mut self, len: usize) {
        assert!(
            len <= self.readable_bytes(),
            "skip of {len} bytes past written length {}",
            self.buf.len()
        );
        self.reader += len;
    }

    // ── Search ────────────────────────────────────────────────────────────

    /// Find the first occurrence of `value` in `[from, to)`, clamped to the
    /// written region. Returns the absolute offset, or `None` if the value
    /// does not occur in the searched window.
    #[must_use]
    pub fn find_byte(&self, from: usize, to: usize, value: u8) -> Option<usize> {
        self.find_where(from, to, |b| b == value)
    }

    /// Find the first byte in `[from, to)` matching `predicate`, clamped to
    /// the written region. Returns the absolute offset.
    pub fn find_where(
        &self,
        from: usize,
        to: usize,
        predicate: impl Fn(u8) -> bool,
    ) -> Option<usize> {
        let to = to.min(self.buf.len());
        if from >= to {
            return None;
        }
        self.buf[from..to]
            .iter()
            .position(|&b| predicate(b))
            .map(|i| from + i)
    }
}

impl Default for ByteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ByteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStore")
            .field("reader", &self.reader)
            .field("writer", &self.buf.len())
            .field("limit", &self.limit)
            .finish()
    }
}
