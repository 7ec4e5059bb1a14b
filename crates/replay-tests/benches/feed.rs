use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use replay_codec::ReplayDecoder;
use replay_codec::frames::{LengthDelimited, VarintDelimited};

/// Build `count` length-prefixed frames with `body_len`-byte bodies.
fn u32_payload(count: usize, body_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * (4 + body_len));
    for i in 0..count {
        out.extend_from_slice(&u32::try_from(body_len).unwrap().to_be_bytes());
        out.extend(std::iter::repeat_n(i as u8, body_len));
    }
    out
}

fn bench_feed(c: &mut Criterion) {
    let data = u32_payload(1_000, 256);

    let mut group = c.benchmark_group("feed");
    group.throughput(Throughput::Bytes(data.len() as u64));

    // whole stream in one delivery: no retries at all
    group.bench_function("one_shot", |b| {
        b.iter(|| {
            let mut dec = ReplayDecoder::new(LengthDelimited::new(4096));
            let frames = dec.feed(&data).unwrap();
            assert_eq!(frames.len(), 1_000);
        });
    });

    // 64-byte deliveries: most attempts abort at least once
    group.bench_function("trickle_64", |b| {
        b.iter(|| {
            let mut dec = ReplayDecoder::new(LengthDelimited::new(4096));
            let mut frames = 0;
            for chunk in data.chunks(64) {
                frames += dec.feed(chunk).unwrap().len();
            }
            assert_eq!(frames, 1_000);
        });
    });

    group.finish();
}

fn bench_varint_prefix(c: &mut Criterion) {
    // varint prefixes force byte-at-a-time guarded reads per header
    let mut data = Vec::new();
    for _ in 0..1_000 {
        data.extend_from_slice(&[0xAC, 0x02]); // 300, LEB128
        data.extend(std::iter::repeat_n(0x55u8, 300));
    }

    let mut group = c.benchmark_group("varint_prefix");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("one_shot", |b| {
        b.iter(|| {
            let mut dec = ReplayDecoder::new(VarintDelimited::new(4096));
            let frames = dec.feed(&data).unwrap();
            assert_eq!(frames.len(), 1_000);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_feed, bench_varint_prefix);
criterion_main!(benches);
