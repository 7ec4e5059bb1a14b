/// Feed a file through the newline-delimited frame decoder in fixed-size
/// chunks, the way a socket would deliver it, and report what came out.
///
/// ```text
/// chunked_replay <file> [chunk-size]
/// ```
///
/// Useful for eyeballing decoder behavior against real inputs: every chunk
/// size must yield the same frames, and a file whose last line is missing
/// its newline fails at end of input.
use anyhow::{Context, Result, bail};
use replay_codec::ReplayDecoder;
use replay_codec::frames::LineDelimited;

/// Lines longer than this are treated as corrupt input.
const MAX_LINE: usize = 1 << 20;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: chunked_replay <file> [chunk-size]");
    };
    let chunk = args
        .next()
        .map(|raw| raw.parse::<usize>())
        .transpose()
        .context("chunk-size must be an integer")?
        .unwrap_or(4096);
    if chunk == 0 {
        bail!("chunk-size must be positive");
    }

    let data = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;

    let mut decoder = ReplayDecoder::new(LineDelimited::new(MAX_LINE));
    let mut frames = 0usize;
    let mut payload_bytes = 0usize;
    for part in data.chunks(chunk) {
        for frame in decoder.feed(part)? {
            frames += 1;
            payload_bytes += frame.len();
        }
    }
    for frame in decoder.finish()? {
        frames += 1;
        payload_bytes += frame.len();
    }

    println!(
        "{frames} frames, {payload_bytes} payload bytes from {} input bytes ({chunk}-byte chunks)",
        data.len()
    );
    Ok(())
}
