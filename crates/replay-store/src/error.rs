#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An append would grow the store past its configured limit.
    ///
    /// The store itself never discards data, so the limit is the one
    /// backpressure hook a connection owner has: once it trips, the
    /// connection should be torn down rather than buffered further.
    #[error("append of {appended} bytes would exceed the store limit ({written} of {limit} bytes used)")]
    LimitExceeded {
        appended: usize,
        written: usize,
        limit: usize,
    },
}
