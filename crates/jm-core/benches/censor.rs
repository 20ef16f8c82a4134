use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use jm_core::{Blocklist, Censor, EngineConfig, MemoryDocument, RedactionEngine};

const PARAGRAPH: &str = "We are hiring! Send your resume and portfolio, and prepare \
    for an interview about your experience, skills and career growth. \
    Nothing else in this sentence should be touched at all.";

fn bench_censor_text(c: &mut Criterion) {
    let censor = Censor::from_config(&EngineConfig::default()).unwrap();
    let text = PARAGRAPH.repeat(200);
    c.bench_function("censor_text_200_paragraphs", |b| {
        b.iter(|| censor.apply(black_box(&text)).len())
    });

    let words: Vec<String> = (0..1000).map(|i| format!("word{i}")).collect();
    let mut blocklist = Blocklist::builtin();
    blocklist.extend(&words);
    let large = Censor::with_blocklist(&blocklist, &EngineConfig::default()).unwrap();
    c.bench_function("censor_text_large_blocklist", |b| {
        b.iter(|| large.apply(black_box(&text)).len())
    });
}

fn bench_scan(c: &mut Criterion) {
    c.bench_function("scan_1000_nodes", |b| {
        b.iter_batched(
            || {
                let mut doc = MemoryDocument::new();
                let root = doc.root_id();
                for _ in 0..1000 {
                    let p = doc.element(root, "p");
                    doc.add_text(p, PARAGRAPH);
                }
                doc
            },
            |mut doc| {
                let mut engine = RedactionEngine::from_config(EngineConfig::default()).unwrap();
                engine.load(&mut doc, None);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_censor_text, bench_scan);
criterion_main!(benches);
