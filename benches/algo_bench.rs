use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vcfx_algo::{full_matrix, hwe_exact_p, LdVariant, StreamingLd, VariantKey, DEFAULT_WINDOW};

fn bench_hwe_exact_p(c: &mut Criterion) {
    c.bench_function("hwe_exact_p/n=500", |b| {
        b.iter(|| black_box(hwe_exact_p(black_box(200), black_box(200), black_box(100))))
    });
}

fn make_variants(n: usize, n_samples: usize) -> Vec<LdVariant> {
    (0..n)
        .map(|i| {
            let codes: Vec<i8> = (0..n_samples).map(|s| ((i + s) % 3) as i8).collect();
            LdVariant { key: VariantKey { chrom: "chr1".to_string(), pos: (i as u64) * 100, id: ".".to_string() }, codes }
        })
        .collect()
}

fn bench_streaming_ld(c: &mut Criterion) {
    let variants = make_variants(2000, 50);
    c.bench_function("streaming_ld/2000_variants_window_1000", |b| {
        b.iter(|| {
            let mut ld = StreamingLd::new(DEFAULT_WINDOW, 0.0, None);
            let mut total = 0usize;
            for v in &variants {
                total += ld.push(v.clone()).len();
            }
            black_box(total)
        })
    });
}

fn bench_ld_matrix(c: &mut Criterion) {
    let variants = make_variants(200, 50);
    c.bench_function("full_matrix/200_variants", |b| b.iter(|| black_box(full_matrix(black_box(&variants)))));
}

criterion_group!(benches, bench_hwe_exact_p, bench_streaming_ld, bench_ld_matrix);
criterion_main!(benches);
