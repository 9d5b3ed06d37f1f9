use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flake58::{Encoder, Generator, LockSonyflakeGenerator, MonotonicClock, Settings};
use std::sync::Arc;
use std::thread::scope;

const TOTAL_IDS: usize = 4_096;

fn bench_codec(c: &mut Criterion) {
    let enc = Encoder::standard();
    let mut group = c.benchmark_group("base58");
    group.throughput(Throughput::Elements(1));

    group.bench_function("encode", |b| {
        b.iter(|| enc.encode(black_box(i64::MAX as u64)));
    });
    group.bench_function("encode_to_buf", |b| {
        let mut buf = [0_u8; flake58::MAX_ENCODED_LEN];
        b.iter(|| {
            let s = enc.encode_to_buf(black_box(i64::MAX as u64), &mut buf);
            black_box(s.len());
        });
    });
    group.bench_function("decode", |b| {
        b.iter(|| enc.decode(black_box("NQm6nKp8qFC")));
    });
    group.finish();
}

fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function("lock/sequential", |b| {
        let generator = LockSonyflakeGenerator::new(1, MonotonicClock::new().unwrap());
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().unwrap());
            }
        });
    });

    group.bench_function("lock/threads_8", |b| {
        let generator = Arc::new(LockSonyflakeGenerator::new(1, MonotonicClock::new().unwrap()));
        b.iter(|| {
            scope(|s| {
                for _ in 0..8 {
                    let generator = Arc::clone(&generator);
                    s.spawn(move || {
                        for _ in 0..TOTAL_IDS / 8 {
                            black_box(generator.next_id().unwrap());
                        }
                    });
                }
            });
        });
    });

    group.bench_function("facade/next_id", |b| {
        let generator = Generator::new(Settings::default().with_machine_id(1_u16)).unwrap();
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().unwrap());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_codec, bench_generator);
criterion_main!(benches);
