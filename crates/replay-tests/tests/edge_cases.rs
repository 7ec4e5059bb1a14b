//! Edge case integration tests for the replay decode loop.
//!
//! Covered here:
//!
//! - **Clean end of stream**: finishing with no buffered bytes is not an
//!   error, whether or not anything was ever fed.
//! - **Truncated end of stream**: finishing mid-message is a terminal
//!   shortfall carrying requested-vs-available, not a retry signal.
//! - **Custom decoders**: protocol-specific `Decode` impls that peek with
//!   random access or read little-endian fields through the swapped view
//!   must retry correctly across arbitrary delivery boundaries.
//! - **Buffer bounding**: a store growth limit converts a never-completing
//!   message into a hard error instead of unbounded buffering.

use replay_buf::{ReadError, ReplayBuf};
use replay_codec::frames::LengthDelimited;
use replay_codec::{CodecError, Decode, ReplayDecoder};
use replay_store::ByteStore;

#[test]
fn finishing_an_untouched_decoder_yields_nothing() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(64));
    assert!(dec.finish().unwrap().is_empty());
}

#[test]
fn finishing_on_a_frame_boundary_yields_nothing_extra() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(64));
    let frames = dec.feed(&[0x00, 0x00, 0x00, 0x01, 0x99]).unwrap();
    assert_eq!(frames, vec![vec![0x99]]);
    assert!(dec.finish().unwrap().is_empty());
}

#[test]
fn finishing_mid_header_reports_the_shortfall() {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(64));
    dec.feed(&[0x00, 0x00]).unwrap();
    let err = dec.finish().unwrap_err();
    assert!(matches!(
        err,
        CodecError::Read(ReadError::Exhausted {
            requested: 4,
            available: 2,
        })
    ));
}

/// Record framing with a little-endian length, decoded through the swapped
/// view: tag byte, u32 LE body length, body.
struct LeRecords;

impl Decode for LeRecords {
    type Item = (u8, Vec<u8>);

    fn decode(&mut self, buf: &mut ReplayBuf<'_>) -> Result<Self::Item, CodecError> {
        let tag = buf.read_u8()?;
        let len = buf.swapped().read_u32()? as usize;
        let body = buf.read_bytes(len)?;
        Ok((tag, body))
    }
}

#[test]
fn little_endian_decoder_retries_across_all_boundaries() {
    let mut payload = Vec::new();
    for (tag, body) in [(0x01u8, &b"abc"[..]), (0x02, &[0xEE; 40][..])] {
        payload.push(tag);
        payload.extend_from_slice(&u32::try_from(body.len()).unwrap().to_le_bytes());
        payload.extend_from_slice(body);
    }

    for chunk in 1..=payload.len() {
        let mut dec = ReplayDecoder::new(LeRecords);
        let mut items = Vec::new();
        for part in payload.chunks(chunk) {
            items.extend(dec.feed(part).unwrap());
        }
        items.extend(dec.finish().unwrap());
        assert_eq!(
            items,
            vec![(0x01, b"abc".to_vec()), (0x02, vec![0xEE; 40])],
            "diverged at chunk size {chunk}"
        );
    }
}

/// Decoder that peeks at a type byte with random access before committing
/// to a sequential read path.
struct PeekThenRead;

impl Decode for PeekThenRead {
    type Item = Vec<u8>;

    fn decode(&mut self, buf: &mut ReplayBuf<'_>) -> Result<Self::Item, CodecError> {
        let at = buf.reader_position();
        let kind = buf.get_u8(at)?;
        match kind {
            // fixed four-byte record
            0x00 => Ok(buf.read_bytes(4)?),
            // length-prefixed record: peek the length too before consuming
            0x01 => {
                let len = usize::from(buf.get_u8(at + 1)?);
                buf.skip(2)?;
                Ok(buf.read_bytes(len)?)
            }
            _ => Err(CodecError::InvalidFrame {
                reason: "unknown record kind",
            }),
        }
    }
}

#[test]
fn peeking_decoder_replays_without_consuming() {
    let payload = [0x00, 0xAA, 0xBB, 0xCC, 0x01, 0x02, 0xDD, 0xEE];
    for chunk in 1..=payload.len() {
        let mut dec = ReplayDecoder::new(PeekThenRead);
        let mut items = Vec::new();
        for part in payload.chunks(chunk) {
            items.extend(dec.feed(part).unwrap());
        }
        items.extend(dec.finish().unwrap());
        assert_eq!(
            items,
            vec![vec![0x00, 0xAA, 0xBB, 0xCC], vec![0xDD, 0xEE]],
            "diverged at chunk size {chunk}"
        );
    }
}

#[test]
fn unknown_record_kind_fails_without_waiting_for_more() {
    let mut dec = ReplayDecoder::new(PeekThenRead);
    let err = dec.feed(&[0x7F]).unwrap_err();
    assert!(matches!(err, CodecError::InvalidFrame { .. }));
}

#[test]
fn growth_limit_stops_a_never_completing_message() {
    let store = ByteStore::with_limit(16);
    let mut dec = ReplayDecoder::with_store(LengthDelimited::new(1 << 20), store);

    // header promises 1 MiB; deliveries keep arriving but the frame never
    // completes before the limit trips
    dec.feed(&[0x00, 0x10, 0x00, 0x00]).unwrap();
    dec.feed(&[0x55; 12]).unwrap();
    let err = dec.feed(&[0x55; 1]).unwrap_err();
    assert!(matches!(err, CodecError::Store(_)));
}
