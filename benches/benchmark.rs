use criterion::{Criterion, black_box, criterion_group, criterion_main};

use wordlex::lex::{Kind, Lex, LexConfig};
use wordlex::number::Number;

pub fn criterion_benchmark(c: &mut Criterion) {
    // encode across small and large magnitudes
    c.bench_function("encode i64", |b| {
        b.iter(|| {
            for i in [-65536i64, -255, -1, 0, 1, 42, 255, 65536, i64::MAX] {
                black_box(Number::from_i64(black_box(i)));
            }
        })
    });

    let encoded: Vec<Vec<u8>> = (-1000i64..1000).map(|i| Number::from_i64(i).to_bytes()).collect();
    c.bench_function("decode 2k", |b| {
        b.iter(|| {
            for raw in &encoded {
                black_box(Number::from_raw(black_box(raw)).expect("canonical"));
            }
        })
    });

    let mut numbers: Vec<Number> = (-1000i64..1000).map(Number::from_i64).collect();
    c.bench_function("sort 2k by bytes", |b| {
        b.iter(|| {
            numbers.sort_unstable();
            black_box(numbers.first());
        })
    });

    let lex = Lex::new(LexConfig::default()).expect("lex");
    let me = lex.self_idn();
    let likes = lex.define(Kind::Verb, &me, "likes").expect("likes");
    let pie = lex.define(Kind::Noun, &me, "pie").expect("pie");
    c.bench_function("define existing", |b| {
        b.iter(|| {
            black_box(lex.define(Kind::Noun, &me, "pie").expect("idempotent"));
        })
    });
    c.bench_function("assert sentence", |b| {
        b.iter(|| {
            black_box(
                lex.assert_sentence(&me, likes.idn(), pie.idn(), Number::one(), "again")
                    .expect("sentence"),
            );
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
