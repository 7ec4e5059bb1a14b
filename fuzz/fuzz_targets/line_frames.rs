#![no_main]

use libfuzzer_sys::fuzz_target;
use replay_codec::frames::LineDelimited;
use replay_codec::ReplayDecoder;

// Fuzz target: search-based framing over arbitrary bytes and splits.
//
// Catches bugs in:
// - The availability-bounded search raising instead of returning a miss
// - Cursor accounting around the consumed terminator
// - Finish-time handling of unterminated trailing bytes
fuzz_target!(|data: &[u8]| {
    let Some((&first, payload)) = data.split_first() else {
        return;
    };
    let chunk = usize::from(first).clamp(1, 32);

    let mut dec = ReplayDecoder::new(LineDelimited::new(64));
    let mut decoded = 0usize;
    for part in payload.chunks(chunk) {
        match dec.feed(part) {
            Ok(items) => decoded += items.len(),
            Err(_) => return, // overlong line: fine, just must not panic
        }
    }
    match dec.finish() {
        Ok(items) => decoded += items.len(),
        Err(_) => return, // unterminated trailing line
    }

    let newlines = payload.iter().filter(|&&b| b == b'\n').count();
    assert_eq!(decoded, newlines);
});
