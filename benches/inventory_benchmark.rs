use criterion::{black_box, criterion_group, criterion_main, Criterion};
use objinv::codec;
use objinv::line_parser;

fn synthetic_plaintext(n: usize) -> String {
    let mut out = String::from(
        "# Sphinx inventory version 2\n\
         # Project: bench\n\
         # Version: 1.0\n\
         # The remainder of this file is compressed using zlib.\n",
    );
    for i in 0..n {
        out.push_str(&format!(
            "bench.item_{i} py:function 1 api.html#$ -\n"
        ));
    }
    out
}

fn bench_decompress(c: &mut Criterion) {
    let plaintext = synthetic_plaintext(2000);
    let compressed = codec::compress(plaintext.as_bytes()).unwrap();

    c.bench_function("codec_decompress", |b| {
        b.iter(|| codec::decompress(black_box(&compressed)).unwrap())
    });
}

fn bench_parse(c: &mut Criterion) {
    let plaintext = synthetic_plaintext(2000);
    let bytes = plaintext.into_bytes();

    c.bench_function("line_parser_parse", |b| {
        b.iter(|| line_parser::parse(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_decompress, bench_parse);
criterion_main!(benches);
