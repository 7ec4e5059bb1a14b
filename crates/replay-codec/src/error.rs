use replay_buf::ReadError;
use replay_store::StoreError;

/// Errors surfaced while driving decode attempts over a byte stream.
///
/// Error hierarchy:
///
/// ```text
///   CodecError
///   ├── Read(ReadError)    ← from the replay buffer (incl. the retry signal)
///   ├── FrameTooLarge      ← declared frame length exceeds the decoder limit
///   ├── InvalidFrame       ← frame contents violate the decoder's format
///   ├── Closed             ← feed/finish called after finish
///   ├── Store(StoreError)  ← the byte store refused to grow further
///   └── Io(std::io::Error) ← from the underlying async reader
/// ```
///
/// `Read(ReadError::Replay)` is the one variant that is not a failure: the
/// driving loop consumes it internally by rewinding and waiting for more
/// bytes. It only escapes through [`Decode`](crate::Decode) implementations
/// — the loop never returns it to callers.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
  /// A guarded read failed. After termination this carries the
  /// requested-vs-available shortfall of a truncated final frame.
  #[error(transparent)]
  Read(#[from] ReadError),

  /// A frame declared a length past the decoder's configured limit.
  ///
  /// Checked against the declared length *before* the body is awaited, so
  /// an oversized frame fails immediately instead of buffering forever.
  #[error("frame of {size} bytes exceeds the {limit}-byte limit")]
  FrameTooLarge { size: usize, limit: usize },

  /// Frame contents violate the decoder's wire format.
  #[error("invalid frame: {reason}")]
  InvalidFrame { reason: &'static str },

  /// The stream was already finished; no further feeding or finishing.
  #[error("decoder already finished; the stream is closed")]
  Closed,

  /// The byte store refused an append (growth limit reached).
  #[error(transparent)]
  Store(#[from] StoreError),

  /// An I/O error from the underlying reader.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl CodecError {
  /// Whether this wraps the retry signal rather than a real failure.
  #[must_use]
  pub fn is_replay(&self) -> bool {
    matches!(self, Self::Read(ReadError::Replay))
  }
}
