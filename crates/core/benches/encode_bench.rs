use criterion::{criterion_group, criterion_main, Criterion};
use huffroute_core::huffman::HuffmanTree;
use huffroute_core::{Capacity, Dispatcher};
use std::hint::black_box;

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let names: Vec<String> = (0..256)
        .map(|i| format!("Name{}xyz{}", i, "abcdefghij".repeat(i % 4 + 1)))
        .collect();

    group.bench_function("dispatcher", |b| {
        b.iter(|| {
            let mut d = Dispatcher::new(Capacity::new(64).unwrap());
            for name in &names {
                d.encode(black_box(name)).unwrap();
            }
            d.compact_order_statistics_store();
            d.compact_heap_store(8);
        })
    });

    // Fibonacci weights produce the most skewed trees
    let mut weights = vec![1u32, 1];
    while weights.len() < 24 {
        let n = weights.len();
        weights.push(weights[n - 1] + weights[n - 2]);
    }
    let leaves: Vec<(char, u32)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| ((b'a' + i as u8) as char, w))
        .collect();

    group.bench_function("huffman_skewed", |b| {
        b.iter(|| HuffmanTree::build(black_box(&leaves)).unwrap())
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
