use replay_buf::ReplayBuf;
use replay_store::ByteStore;

use crate::error::CodecError;

/// One decode attempt over a replay buffer.
///
/// Implementations read a single message with ordinary straight-line code —
/// "read the length, then read that many bytes" — and let any
/// [`ReadError::Replay`](replay_buf::ReadError::Replay) propagate with `?`.
/// The driving loop reruns the attempt from the start once more bytes
/// arrive, so an attempt must be safely re-runnable: keep no decoder-local
/// state across calls, or reconstruct it purely from bytes the attempt
/// itself reads. Nothing read during an aborted attempt is consumed — the
/// loop rewinds the cursor before retrying.
///
/// A successful return must leave the cursor advanced past exactly one
/// message.
pub trait Decode {
  /// The decoded message type.
  type Item;

  /// Attempt to decode one message starting at the current read cursor.
  ///
  /// # Errors
  ///
  /// Propagate [`ReadError::Replay`](replay_buf::ReadError::Replay)
  /// untouched; return any other [`CodecError`] for malformed input.
  fn decode(&mut self, buf: &mut ReplayBuf<'_>) -> Result<Self::Item, CodecError>;
}

/// Driving decode loop: feeds bytes into a [`ByteStore`], runs decode
/// attempts against a replay view of it, and interprets the retry signal.
///
/// ```text
///             feed(bytes)                       finish()
///                 │                                 │
///                 ▼                                 ▼
///   ┌─────────────────────────────┐   ┌──────────────────────────────┐
///   │ append → attempt → attempt… │   │ terminate → final attempts   │
///   │   Ok    ⇒ commit, go again  │   │   shortfall ⇒ Exhausted      │
///   │   Replay⇒ rewind, stop      │   │   (fatal, never retried)     │
///   │   other ⇒ fail              │   └──────────────────────────────┘
///   └─────────────────────────────┘
/// ```
///
/// Exactly one attempt is in flight at a time; the loop holds no internal
/// synchronization. Timeouts and connection teardown are the caller's
/// business — the loop's only bound is the store's optional growth limit.
///
/// # Example
///
/// ```
/// use replay_codec::{ReplayDecoder, frames::LengthDelimited};
///
/// let mut decoder = ReplayDecoder::new(LengthDelimited::new(1024));
/// // a 3-byte frame arrives split across two deliveries
/// assert!(decoder.feed(&[0x00, 0x00, 0x00, 0x03, 0xAA]).unwrap().is_empty());
/// let frames = decoder.feed(&[0xBB, 0xCC]).unwrap();
/// assert_eq!(frames, vec![vec![0xAA, 0xBB, 0xCC]]);
/// assert!(decoder.finish().unwrap().is_empty());
/// ```
pub struct ReplayDecoder<D: Decode> {
  store: ByteStore,
  decoder: D,
  finished: bool,
}

impl<D: Decode> ReplayDecoder<D> {
  /// Create a driving loop over an unbounded store.
  pub fn new(decoder: D) -> Self {
    Self::with_store(decoder, ByteStore::new())
  }

  /// Create a driving loop over a caller-configured store (typically
  /// [`ByteStore::with_limit`] to bound buffering).
  pub fn with_store(decoder: D, store: ByteStore) -> Self {
    Self {
      store,
      decoder,
      finished: false,
    }
  }

  /// Deliver newly arrived bytes and decode every message they complete.
  ///
  /// Messages decoded so far in this delivery are committed before a retry
  /// signal stops the loop, so a single feed can return zero, one, or many
  /// items.
  ///
  /// # Errors
  ///
  /// - [`CodecError::Closed`] if [`finish`](Self::finish) was already called.
  /// - [`CodecError::Store`] if the store's growth limit is reached.
  /// - Any non-replay decoder error, verbatim.
  pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<D::Item>, CodecError> {
    if self.finished {
      return Err(CodecError::Closed);
    }
    self.store.append(bytes)?;
    self.drain()
  }

  /// Mark the stream as ended and run the final decode attempts.
  ///
  /// After this, no more bytes will ever arrive: attempts run against a
  /// terminated view, so a trailing partial message surfaces as a fatal
  /// [`ReadError::Exhausted`](replay_buf::ReadError::Exhausted) instead of
  /// a retry signal. Called exactly once, at stream end or when decoding is
  /// permanently abandoned.
  ///
  /// # Errors
  ///
  /// - [`CodecError::Closed`] on a second call.
  /// - [`CodecError::Read`] with the terminal shortfall if the stream ends
  ///   mid-message.
  /// - Any non-replay decoder error, verbatim.
  pub fn finish(&mut self) -> Result<Vec<D::Item>, CodecError> {
    if self.finished {
      return Err(CodecError::Closed);
    }
    self.finished = true;
    self.drain()
  }

  /// Run decode attempts until the readable bytes run out, a retry signal
  /// stops the loop, or an attempt fails.
  fn drain(&mut self) -> Result<Vec<D::Item>, CodecError> {
    let ReplayDecoder {
      store,
      decoder,
      finished,
    } = self;

    let mut items = Vec::new();
    while store.is_readable() {
      let checkpoint = store.reader_position();
      let mut view = ReplayBuf::new(store);
      if *finished {
        view.terminate();
      }
      match decoder.decode(&mut view) {
        Ok(item) => {
          if store.reader_position() == checkpoint {
            return Err(CodecError::InvalidFrame {
              reason: "decoder produced a message without consuming bytes",
            });
          }
          items.push(item);
        }
        Err(err) if err.is_replay() => {
          // not enough data yet: undo this attempt and wait for the next
          // delivery; everything committed so far stands
          store.set_reader_position(checkpoint);
          break;
        }
        Err(err) => return Err(err),
      }
    }
    Ok(items)
  }

  /// Bytes delivered but not yet consumed by a committed message.
  #[must_use]
  pub fn buffered(&self) -> usize {
    self.store.readable_bytes()
  }

  /// Whether [`finish`](Self::finish) has been called.
  #[must_use]
  pub fn is_finished(&self) -> bool {
    self.finished
  }
}

#[cfg(test)]
mod tests {
  use replay_buf::ReadError;

  use super::*;
  use crate::frames::LengthDelimited;

  fn frame(body: &[u8]) -> Vec<u8> {
    let mut out = (u32::try_from(body.len()).unwrap()).to_be_bytes().to_vec();
    out.extend_from_slice(body);
    out
  }

  #[test]
  fn partial_frame_decodes_nothing() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(1024));
    let payload = frame(b"hello");
    let items = dec.feed(&payload[..6]).unwrap();
    assert!(items.is_empty());
    assert_eq!(dec.buffered(), 6);
  }

  #[test]
  fn completing_the_frame_commits_it() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(1024));
    let payload = frame(b"hello");
    dec.feed(&payload[..6]).unwrap();
    let items = dec.feed(&payload[6..]).unwrap();
    assert_eq!(items, vec![b"hello".to_vec()]);
    assert_eq!(dec.buffered(), 0);
  }

  #[test]
  fn one_feed_can_commit_many_frames() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(1024));
    let mut payload = frame(b"one");
    payload.extend_from_slice(&frame(b"two"));
    payload.extend_from_slice(&frame(b"three")[..4]); // header only
    let items = dec.feed(&payload).unwrap();
    assert_eq!(items, vec![b"one".to_vec(), b"two".to_vec()]);
    assert_eq!(dec.buffered(), 4);
  }

  #[test]
  fn retry_rewinds_to_the_message_start() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(1024));
    // full header, missing body: the attempt consumed the header before
    // raising, so the rewind must restore it
    dec.feed(&[0x00, 0x00, 0x00, 0x02, 0xAA]).unwrap();
    assert_eq!(dec.buffered(), 5);
    let items = dec.feed(&[0xBB]).unwrap();
    assert_eq!(items, vec![vec![0xAA, 0xBB]]);
  }

  #[test]
  fn finish_with_clean_boundary_returns_remaining_frames() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(1024));
    assert_eq!(dec.feed(&frame(b"tail")).unwrap(), vec![b"tail".to_vec()]);
    assert!(dec.finish().unwrap().is_empty());
    assert!(dec.is_finished());
  }

  #[test]
  fn finish_mid_frame_is_a_terminal_shortfall() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(1024));
    dec.feed(&[0x00, 0x00, 0x00, 0x05, 0x01]).unwrap();
    let err = dec.finish().unwrap_err();
    assert!(matches!(
      err,
      CodecError::Read(ReadError::Exhausted {
        requested: 5,
        available: 1,
      })
    ));
  }

  #[test]
  fn feed_after_finish_is_closed() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(1024));
    dec.finish().unwrap();
    assert!(matches!(dec.feed(&[1]), Err(CodecError::Closed)));
    assert!(matches!(dec.finish(), Err(CodecError::Closed)));
  }

  #[test]
  fn store_limit_bounds_buffering() {
    let mut dec =
      ReplayDecoder::with_store(LengthDelimited::new(1024), ByteStore::with_limit(4));
    dec.feed(&[0x00, 0x00, 0x00, 0x09]).unwrap();
    assert!(matches!(dec.feed(&[0x01]), Err(CodecError::Store(_))));
  }

  #[test]
  fn fatal_decoder_error_propagates() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(4));
    let err = dec.feed(&frame(b"way too long")).unwrap_err();
    assert!(matches!(
      err,
      CodecError::FrameTooLarge { size: 12, limit: 4 }
    ));
  }

  #[test]
  fn non_consuming_decoder_is_rejected() {
    struct Stuck;
    impl Decode for Stuck {
      type Item = ();
      fn decode(&mut self, _buf: &mut ReplayBuf<'_>) -> Result<(), CodecError> {
        Ok(())
      }
    }
    let mut dec = ReplayDecoder::new(Stuck);
    let err = dec.feed(&[1, 2, 3]).unwrap_err();
    assert!(matches!(err, CodecError::InvalidFrame { .. }));
  }
}
