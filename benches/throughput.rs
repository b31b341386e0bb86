use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fixring::{RingBuffer, RingBufferAttr};

fn bench_single(c: &mut Criterion) {
    let mut rb = RingBuffer::new(1024, RingBufferAttr::default().with_item_size(16)).unwrap();
    let item = [0x11u8; 16];
    let mut out = [0u8; 16];

    c.bench_function("add_get_roundtrip_16b", |b| {
        b.iter(|| {
            rb.add(black_box(&item)).unwrap();
            rb.get(black_box(&mut out)).unwrap();
        })
    });
}

fn bench_multi(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_multi_get_multi");
    for batch in [4usize, 32, 256] {
        // odd capacity keeps the batches crossing the end of storage
        let mut rb = RingBuffer::new(1021, RingBufferAttr::default().with_item_size(8)).unwrap();
        let items = vec![0x22u8; batch * 8];
        let mut out = vec![0u8; batch * 8];
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, _| {
            b.iter(|| {
                rb.add_multi(black_box(&items)).unwrap();
                rb.get_multi(black_box(&mut out)).unwrap();
            })
        });
    }
    group.finish();
}

fn bench_override(c: &mut Criterion) {
    let attr = RingBufferAttr::default().with_item_size(4).with_override(true);
    let mut rb = RingBuffer::new(256, attr).unwrap();
    let mut v = 0u32;

    c.bench_function("override_add_u32", |b| {
        b.iter(|| {
            v = v.wrapping_add(1);
            rb.add_scalar(black_box(v)).unwrap();
        })
    });
}

fn bench_peek(c: &mut Criterion) {
    let mut rb = RingBuffer::new(64, RingBufferAttr::default().with_item_size(4)).unwrap();
    for v in 0..64u32 {
        rb.add_scalar(v).unwrap();
    }

    c.bench_function("get_by_index_newest", |b| {
        b.iter(|| rb.get_scalar_by_index::<u32>(black_box(-1)).unwrap())
    });
}

criterion_group!(benches, bench_single, bench_multi, bench_override, bench_peek);
criterion_main!(benches);
