//! Benchmarks for the polifunction value wire format

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polif_core::{Interval, PolifunctionValue, Real};
use polif_wire::{
    decode_value, encode_value, encode_value_into, encoded_len, ValueHeader, ValueVariant,
    HEADER_SIZE,
};

fn sample_set(len: usize) -> PolifunctionValue<Real> {
    let set: BTreeSet<Real> = (0..len).map(|i| Real::new(i as f64 * 0.5)).collect();
    PolifunctionValue::Set(set)
}

fn bench_header_parse(c: &mut Criterion) {
    let bytes = ValueHeader::new(ValueVariant::Set).to_bytes();

    c.bench_function("header_parse", |b| {
        b.iter(|| ValueHeader::parse(black_box(&bytes)))
    });
}

fn bench_header_serialize(c: &mut Criterion) {
    let header = ValueHeader::new(ValueVariant::Interval);

    c.bench_function("header_serialize", |b| {
        let mut buf = [0u8; HEADER_SIZE];
        b.iter(|| header.serialize(black_box(&mut buf)))
    });
}

fn bench_set_encode(c: &mut Criterion) {
    let value = sample_set(256);

    c.bench_function("set_encode_256", |b| {
        b.iter(|| encode_value(black_box(&value)).unwrap())
    });

    c.bench_function("set_encode_into_256", |b| {
        let mut buf = Vec::with_capacity(encoded_len(&value));
        b.iter(|| {
            buf.clear();
            encode_value_into(black_box(&value), &mut buf).unwrap();
        })
    });
}

fn bench_set_decode(c: &mut Criterion) {
    let bytes = encode_value(&sample_set(256)).unwrap();

    c.bench_function("set_decode_256", |b| {
        b.iter(|| {
            let decoded = decode_value::<Real>(black_box(&bytes)).unwrap();
            black_box(decoded)
        })
    });
}

fn bench_interval_roundtrip(c: &mut Criterion) {
    let interval = Interval::new(Real::new(-1.5), Real::new(2.5), true, false).unwrap();
    let value = PolifunctionValue::Interval(interval);

    c.bench_function("interval_roundtrip", |b| {
        b.iter(|| {
            let bytes = encode_value(black_box(&value)).unwrap();
            black_box(decode_value::<Real>(&bytes).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_header_parse,
    bench_header_serialize,
    bench_set_encode,
    bench_set_decode,
    bench_interval_roundtrip
);
criterion_main!(benches);
