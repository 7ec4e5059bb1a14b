/// Outcome of a guarded read against a [`ReplayBuf`](crate::ReplayBuf).
///
/// Two of these are real failures; one is not a failure at all:
///
/// ```text
///   ReadError
///   ├── Replay       ← retry signal: not enough data *yet*, rewind and wait
///   ├── Exhausted    ← the stream is closed and the bytes will never arrive
///   └── Unsupported  ← a write-side call reached the read-only view
/// ```
///
/// `Replay` is pure control flow. It is raised many times per message while
/// bytes trickle in, so it carries no payload, captures no diagnostics, and
/// costs nothing to construct — a raise leaves the underlying store
/// completely untouched (no cursor movement, no bytes consumed). Decode
/// logic must let it propagate with `?`; only the driving loop interprets
/// it, by rewinding the read cursor and waiting for the next delivery.
///
/// Whether a shortfall is `Replay` or `Exhausted` is purely a function of
/// whether the buffer has been terminated — decode logic never makes that
/// call itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// Not enough data has arrived yet; rerun the decode attempt once more
    /// bytes land.
    #[error("more data required to complete the read")]
    Replay,

    /// Shortfall after termination: no further bytes will ever arrive, so
    /// retrying is pointless. Carries requested-vs-available so the failure
    /// is diagnosable.
    #[error("read of {requested} bytes exceeds the {available} readable bytes of a closed stream")]
    Exhausted { requested: usize, available: usize },

    /// A write-side operation was attempted through the read-only view.
    /// Raised unconditionally, terminated or not; always names the call.
    #[error("unsupported operation `{op}` on a read-only replay buffer")]
    Unsupported { op: &'static str },
}

impl ReadError {
    /// Whether this is the retry signal rather than a real failure.
    #[must_use]
    pub fn is_replay(self) -> bool {
        matches!(self, Self::Replay)
    }
}
