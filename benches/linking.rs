use criterion::{Criterion, criterion_group, criterion_main};
use india_facts::geo::detect_states;
use india_facts::knowledge::fallback::fallback_collection;
use india_facts::links::inline::InlineLinker;
use std::hint::black_box;

const PASSAGE: &str = "The Mughal Empire under Akbar stretched from Kabul to Bengal. \
    Trade flowed through Surat in Gujarat and the ports of Kerala, while the \
    Deccan Sultanates held Hyderabad. Later the East India Company rose at Plassey \
    and the Indian National Congress met in Bombay. Photosynthesis research at \
    institutes in Bengaluru and Chennai continues today.";

pub fn criterion_benchmark(c: &mut Criterion) {
    let collection = fallback_collection();
    let linker = InlineLinker::new(&collection);
    let text = PASSAGE.repeat(20);

    c.bench_function("inline_linking", |b| {
        b.iter(|| linker.link(black_box(&text)))
    });
    c.bench_function("state_detection", |b| {
        b.iter(|| detect_states(black_box(&text)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
