use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seqtag_core::{LabelSchema, MaxMatchSegmenter, NerDataset, SequenceEncoder, Vocabulary};

const CHARS: &[&str] = &["我", "爱", "北", "京", "天", "安", "门", "上", "海"];

fn vocab() -> Vocabulary {
    Vocabulary::from_lines(std::iter::once("[UNK]").chain(CHARS.iter().copied())).unwrap()
}

fn schema() -> LabelSchema {
    LabelSchema::from_json(r#"{"O": 0, "B-LOC": 1, "I-LOC": 2}"#).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let encoder = SequenceEncoder::chars(vocab(), schema(), 100);
    let tokens: Vec<&str> = CHARS.iter().cycle().take(80).copied().collect();
    let labels: Vec<i64> = (0..80).map(|i| i % 3).collect();

    c.bench_function("encode_char_example", |b| {
        b.iter(|| encoder.encode(black_box(tokens.as_slice()), black_box(&labels)).unwrap());
    });

    let segmenter = MaxMatchSegmenter::new(["北京", "天安门", "上海", "我", "爱"]);
    let words = SequenceEncoder::words(vocab(), segmenter, schema(), 100);
    c.bench_function("encode_word_example", |b| {
        b.iter(|| words.encode(black_box(tokens.as_slice()), black_box(&labels)).unwrap());
    });
}

fn bench_dataset(c: &mut Criterion) {
    let block: String = CHARS.iter().map(|ch| format!("{ch} O\n")).collect();
    let text = vec![block; 200].join("\n");

    c.bench_function("build_dataset_200", |b| {
        b.iter(|| {
            let encoder = SequenceEncoder::chars(vocab(), schema(), 50);
            NerDataset::from_text(black_box(&text), encoder).unwrap()
        });
    });
}

criterion_group!(benches, bench_encode, bench_dataset);
criterion_main!(benches);
