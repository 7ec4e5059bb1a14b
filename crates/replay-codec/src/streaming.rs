use std::collections::VecDeque;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::decoder::{Decode, ReplayDecoder};
use crate::error::CodecError;

/// Read chunk size for the ingestion buffer.
const READ_CHUNK: usize = 4096;

/// Asynchronous ingestion loop — pulls bytes from any [`AsyncRead`] source
/// and yields decoded messages one at a time.
///
/// This is the ready-made driving loop for sockets, files, and response
/// bodies: it reads a chunk, feeds it to the inner [`ReplayDecoder`], and
/// hands out whatever messages that delivery completed. At EOF it finishes
/// the decoder so a truncated trailing message fails loudly instead of
/// waiting forever.
///
/// Backpressure is natural: nothing is read from the source until the
/// caller awaits the next message.
///
/// # Example
///
/// ```rust,no_run
/// use replay_codec::{FrameStream, frames::LineDelimited};
/// use tokio::io::AsyncRead;
///
/// async fn consume(reader: impl AsyncRead + Unpin) {
///     let mut stream = FrameStream::new(reader, LineDelimited::new(8192));
///     while let Some(frame) = stream.next().await.transpose().unwrap() {
///         // handle one frame...
///     }
/// }
/// ```
pub struct FrameStream<R, D: Decode> {
  reader: R,
  inner: ReplayDecoder<D>,
  /// Messages decoded but not yet handed to the caller. One delivery can
  /// complete several messages; they are queued here and drained first.
  ready: VecDeque<D::Item>,
  chunk: Vec<u8>,
  done: bool,
}

impl<R: AsyncRead + Unpin, D: Decode> FrameStream<R, D> {
  /// Create a stream over the given reader and frame decoder.
  #[must_use]
  pub fn new(reader: R, decoder: D) -> Self {
    Self::with_decoder(reader, ReplayDecoder::new(decoder))
  }

  /// Create a stream over a pre-configured [`ReplayDecoder`] (for a store
  /// with a growth limit).
  #[must_use]
  pub fn with_decoder(reader: R, inner: ReplayDecoder<D>) -> Self {
    Self {
      reader,
      inner,
      ready: VecDeque::new(),
      chunk: vec![0u8; READ_CHUNK],
      done: false,
    }
  }

  /// Yield the next decoded message.
  ///
  /// Returns `Ok(Some(item))` per message, `Ok(None)` once the source is
  /// exhausted and every buffered message has been yielded, or `Err` on the
  /// first I/O or decode failure. After an error or `None` the stream
  /// yields nothing further.
  pub async fn next(&mut self) -> Option<Result<D::Item, CodecError>> {
    loop {
      if let Some(item) = self.ready.pop_front() {
        return Some(Ok(item));
      }
      if self.done {
        return None;
      }

      let n = match self.reader.read(&mut self.chunk).await {
        Ok(n) => n,
        Err(e) => {
          self.done = true;
          return Some(Err(CodecError::Io(e)));
        }
      };

      let fed = if n == 0 {
        // EOF: run the final attempts with shortfalls now fatal
        self.done = true;
        self.inner.finish()
      } else {
        self.inner.feed(&self.chunk[..n])
      };

      match fed {
        Ok(items) => self.ready.extend(items),
        Err(e) => {
          self.done = true;
          return Some(Err(e));
        }
      }
    }
  }
}
