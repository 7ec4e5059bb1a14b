#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use replay_buf::{ReadError, ReplayBuf};
use replay_store::ByteStore;

// Fuzz target: arbitrary op streams against the guarded read view.
//
// Every operation must return cleanly (no panics from the underlying
// store — the guards validate first), and a raised retry signal must
// leave the read cursor exactly where it was.

#[derive(Arbitrary, Debug)]
enum Op {
    ReadBool,
    ReadU8,
    ReadU16,
    ReadU24,
    ReadU32,
    ReadU64,
    ReadF64,
    ReadBytes(u8),
    Skip(u8),
    GetU16(u8),
    GetU64(u8),
    Copy(u8, u8),
    FindReadable(u8),
    FindIn(u8, u8, u8),
    Mark,
    Reset,
    SwappedU16,
    SwappedU32,
    Append(u8),
    SetU8(u8, u8),
    Terminate,
}

fuzz_target!(|input: (Vec<u8>, Vec<Op>)| {
    let (bytes, ops) = input;
    let mut store = ByteStore::new();
    store.append(&bytes).unwrap();
    let mut buf = ReplayBuf::new(&mut store);

    for op in ops {
        let before = buf.reader_position();
        let result: Result<(), ReadError> = match op {
            Op::ReadBool => buf.read_bool().map(drop),
            Op::ReadU8 => buf.read_u8().map(drop),
            Op::ReadU16 => buf.read_u16().map(drop),
            Op::ReadU24 => buf.read_u24().map(drop),
            Op::ReadU32 => buf.read_u32().map(drop),
            Op::ReadU64 => buf.read_u64().map(drop),
            Op::ReadF64 => buf.read_f64().map(drop),
            Op::ReadBytes(n) => buf.read_bytes(usize::from(n)).map(drop),
            Op::Skip(n) => buf.skip(usize::from(n)),
            Op::GetU16(i) => buf.get_u16(usize::from(i)).map(drop),
            Op::GetU64(i) => buf.get_u64(usize::from(i)).map(drop),
            Op::Copy(i, n) => buf.copy(usize::from(i), usize::from(n)).map(drop),
            Op::FindReadable(v) => buf.find_readable(v).map(drop),
            Op::FindIn(a, b, v) => {
                let (from, to) = (usize::from(a.min(b)), usize::from(a.max(b)));
                buf.find_in(from, to, v).map(drop)
            }
            Op::Mark => {
                buf.mark_reader();
                Ok(())
            }
            Op::Reset => {
                buf.reset_reader();
                Ok(())
            }
            Op::SwappedU16 => buf.swapped().read_u16().map(drop),
            Op::SwappedU32 => buf.swapped().read_u32().map(drop),
            Op::Append(v) => buf.append(&[v]),
            Op::SetU8(i, v) => buf.set_u8(usize::from(i), v),
            Op::Terminate => {
                buf.terminate();
                Ok(())
            }
        };

        if result == Err(ReadError::Replay) {
            assert_eq!(buf.reader_position(), before);
        }
        if let Err(ReadError::Unsupported { .. }) = result {
            // write-side rejection never touches state either
            assert_eq!(buf.reader_position(), before);
        }
    }
});
