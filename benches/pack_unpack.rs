//! Benchmark: unpack and pack of a flat list and of a list carrying nested bags.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use paramwire::{BagField, Codec, Descriptor, DescriptorSet, ParamId, Registry, ValueKind};

const fn id(type_index: u16) -> ParamId {
    ParamId::encode(false, 1, type_index)
}

static PEER_FIELDS: [BagField; 2] = [
    BagField::new("addr", 0, id(1), id(4)),
    BagField::new("name", 1, id(3), id(4)).optional(),
];

static BENCH_PARAMS: [Descriptor; 4] = [
    Descriptor::new("addr", ValueKind::UInt32),
    Descriptor::new("rate", ValueKind::Int32),
    Descriptor::new("name", ValueKind::String),
    Descriptor::new("peer", ValueKind::Bag).fields(&PEER_FIELDS),
];

fn flat_text(n: usize) -> String {
    (0..n)
        .map(|i| format!("bench.addr[{}]=0x{:x},bench.rate={},bench.name=\"n, {}\"", i % 100, i, -(i as i64), i))
        .collect::<Vec<_>>()
        .join(",")
}

fn bag_text(n: usize) -> String {
    (0..n)
        .map(|i| format!("bench.peer[{}]={{bench.addr=0x{:x},bench.name=p{}}}", i % 100, i, i))
        .collect::<Vec<_>>()
        .join(",")
}

fn bench_pack_unpack(c: &mut Criterion) {
    let mut registry = Registry::new();
    registry
        .init(DescriptorSet::new(1, "bench", &BENCH_PARAMS))
        .expect("register");
    let codec = Codec::new(&registry);

    for (label, text) in [("flat", flat_text(100)), ("bags", bag_text(100))] {
        let list = codec.unpack_list(&text, 1, None).expect("unpack");
        c.bench_function(&format!("unpack_{}", label), |b| {
            b.iter(|| codec.unpack_list(black_box(&text), 1, None).expect("unpack"))
        });
        c.bench_function(&format!("pack_{}", label), |b| {
            b.iter(|| codec.pack_list(black_box(&list)).expect("pack"))
        });
        c.bench_function(&format!("packed_len_{}", label), |b| {
            let mut empty = [0u8; 0];
            b.iter(|| codec.pack_list_into(black_box(&list), &mut empty).expect("size"))
        });
    }
}

criterion_group!(benches, bench_pack_unpack);
criterion_main!(benches);
