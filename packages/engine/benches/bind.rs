use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use iatibind_engine::markup::{parse, render};
use iatibind_engine::{decode, encode, Narratives};

fn narratives_document(count: usize) -> String {
    let mut xml = String::from("<title>");
    for i in 0..count {
        xml.push_str(&format!(r#"<narrative xml:lang="en">Narrative number {i}</narrative>"#));
    }
    xml.push_str("</title>");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let xml = narratives_document(100);
    c.bench_function("parse_100_narratives", |b| b.iter(|| parse(black_box(&xml))));
}

fn bench_decode(c: &mut Criterion) {
    let el = parse(&narratives_document(100)).unwrap();
    c.bench_function("decode_100_narratives", |b| {
        b.iter(|| decode::<Narratives>(black_box(&el)))
    });
}

fn bench_encode(c: &mut Criterion) {
    let el = parse(&narratives_document(100)).unwrap();
    let title = decode::<Narratives>(&el).unwrap().value;
    c.bench_function("encode_100_narratives", |b| {
        b.iter(|| encode(black_box(&title)).and_then(|el| Ok(render(&el)?)))
    });
}

criterion_group!(benches, bench_parse, bench_decode, bench_encode);
criterion_main!(benches);
