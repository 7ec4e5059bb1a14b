#![no_main]

use libfuzzer_sys::fuzz_target;
use replay_codec::frames::LengthDelimited;
use replay_codec::ReplayDecoder;

// Fuzz target: delivery-boundary equivalence for the driving loop.
//
// Decodes the same payload once in a single delivery and once in
// fuzz-chosen chunks, asserting identical frames and identical failures.
// Catches bugs in:
// - Rewind-on-replay cursor handling
// - Commit boundaries when one delivery completes several frames
// - Terminal shortfall reporting at finish()

fn run(payload: &[u8], chunk: usize) -> Result<Vec<Vec<u8>>, String> {
    let mut dec = ReplayDecoder::new(LengthDelimited::new(256));
    let mut items = Vec::new();
    for part in payload.chunks(chunk) {
        items.extend(dec.feed(part).map_err(|e| e.to_string())?);
    }
    items.extend(dec.finish().map_err(|e| e.to_string())?);
    Ok(items)
}

fuzz_target!(|data: &[u8]| {
    let Some((&first, payload)) = data.split_first() else {
        return;
    };
    let chunk = usize::from(first).clamp(1, 64);

    let one_shot = run(payload, payload.len().max(1));
    let chunked = run(payload, chunk);
    assert_eq!(one_shot, chunked);
});
