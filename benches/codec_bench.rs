//! Payload codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use obscura_proto::{Payload, PayloadBuilder, PayloadReader};

fn mixed_payload() -> Payload {
    PayloadBuilder::new(0x0042)
        .add_param("a reasonably sized string parameter")
        .add_param(true)
        .add_param(-123456789i64)
        .add_param(3.141592653589793f64)
        .add_param(vec![0xABu8; 256])
        .build()
}

fn bench_payload_build(c: &mut Criterion) {
    c.bench_function("payload_build", |b| b.iter(|| black_box(mixed_payload())));
}

fn bench_payload_serialize(c: &mut Criterion) {
    let payload = mixed_payload();
    let wire_size = payload.serialize().len();

    let mut group = c.benchmark_group("payload_serialize");
    group.throughput(Throughput::Bytes(wire_size as u64));
    group.bench_function("mixed_params", |b| {
        b.iter(|| black_box(payload.serialize()))
    });
    group.finish();
}

fn bench_payload_deserialize(c: &mut Criterion) {
    let wire = mixed_payload().serialize();

    let mut group = c.benchmark_group("payload_deserialize");
    group.throughput(Throughput::Bytes(wire.len() as u64));
    group.bench_function("mixed_params", |b| {
        b.iter(|| black_box(Payload::deserialize(&wire).unwrap()))
    });
    group.finish();
}

fn bench_payload_read(c: &mut Criterion) {
    let payload = mixed_payload();

    c.bench_function("payload_read", |b| {
        b.iter(|| {
            let mut reader = PayloadReader::new(&payload);
            let s = reader.read_param::<String>().unwrap();
            let flag = reader.read_param::<bool>().unwrap();
            let n = reader.read_int().unwrap();
            let x = reader.read_float().unwrap();
            let bytes = reader.read_param::<Vec<u8>>().unwrap();
            black_box((s, flag, n, x, bytes))
        })
    });
}

criterion_group!(
    benches,
    bench_payload_build,
    bench_payload_serialize,
    bench_payload_deserialize,
    bench_payload_read,
);

criterion_main!(benches);
