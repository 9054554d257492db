use std::collections::VecDeque;

use rayon::prelude::*;

pub const DEFAULT_WINDOW: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantKey {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct LdVariant {
    pub key: VariantKey,
    /// Per-sample genotype codes, `{0,1,2,-1}`.
    pub codes: Vec<i8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LdPairResult {
    pub var1: VariantKey,
    pub var2: VariantKey,
    pub r2: f64,
}

/// Skips samples missing in either variant; if either remaining variance
/// is `<= 0`, r^2 is `0`.
pub fn pairwise_r2(a: &[i8], b: &[i8]) -> f64 {
    let mut n = 0i64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0i64, 0i64, 0i64, 0i64, 0i64);
    for (&xa, &xb) in a.iter().zip(b.iter()) {
        if xa < 0 || xb < 0 {
            continue;
        }
        let (x, y) = (xa as i64, xb as i64);
        n += 1;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean_x = sum_x as f64 / nf;
    let mean_y = sum_y as f64 / nf;
    let cov = sum_xy as f64 / nf - mean_x * mean_y;
    let var_x = sum_x2 as f64 / nf - mean_x * mean_x;
    let var_y = sum_y2 as f64 / nf - mean_y * mean_y;
    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }
    let r = cov / (var_x * var_y).sqrt();
    r * r
}

/// Streaming sliding-window LD: a FIFO deque of the most recent `W`
/// variants, emitting r^2 >= `threshold` pairs (optionally bounded by
/// physical distance) as each new variant arrives.
pub struct StreamingLd {
    window: usize,
    threshold: f64,
    max_distance: Option<u64>,
    deque: VecDeque<LdVariant>,
}

impl StreamingLd {
    pub fn new(window: usize, threshold: f64, max_distance: Option<u64>) -> Self {
        Self { window, threshold, max_distance, deque: VecDeque::with_capacity(window) }
    }

    /// Compares `variant` against every variant currently in the window,
    /// then pushes it on (evicting the oldest entry once the window is
    /// full).
    pub fn push(&mut self, variant: LdVariant) -> Vec<LdPairResult> {
        let mut pairs = Vec::new();
        for prev in &self.deque {
            if let Some(max_dist) = self.max_distance {
                if variant.key.pos.abs_diff(prev.key.pos) > max_dist {
                    continue;
                }
            }
            let r2 = pairwise_r2(&prev.codes, &variant.codes);
            if r2 >= self.threshold {
                pairs.push(LdPairResult { var1: prev.key.clone(), var2: variant.key.clone(), r2 });
            }
        }
        self.deque.push_back(variant);
        if self.deque.len() > self.window {
            self.deque.pop_front();
        }
        pairs
    }
}

/// Full symmetric `V x V` r^2 matrix over a region loaded entirely into
/// memory, parallelized across rows.
pub fn full_matrix(variants: &[LdVariant]) -> Vec<Vec<f64>> {
    let n = variants.len();
    let mut matrix = vec![vec![0.0; n]; n];
    matrix.par_iter_mut().enumerate().for_each(|(i, row)| {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = if i == j { 1.0 } else { pairwise_r2(&variants[i].codes, &variants[j].codes) };
        }
    });
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(chrom: &str, pos: u64) -> VariantKey {
        VariantKey { chrom: chrom.to_string(), pos, id: ".".to_string() }
    }

    #[test]
    fn pairwise_r2_is_symmetric() {
        let a = vec![0, 1, 2, 1, 0];
        let b = vec![0, 2, 2, 0, 1];
        assert_eq!(pairwise_r2(&a, &b), pairwise_r2(&b, &a));
    }

    #[test]
    fn zero_variance_gives_zero_r2() {
        let a = vec![1, 1, 1, 1];
        let b = vec![0, 1, 2, 1];
        assert_eq!(pairwise_r2(&a, &b), 0.0);
    }

    #[test]
    fn missing_samples_are_skipped_before_computing_variance() {
        let a = vec![0, 1, -1, 2];
        let b = vec![1, 1, 2, -1];
        // usable pairs are (0,1) and (1,1): b has zero variance over them.
        assert_eq!(pairwise_r2(&a, &b), 0.0);
    }

    #[test]
    fn streaming_emits_all_pairs_without_distance_limit() {
        let mut ld = StreamingLd::new(DEFAULT_WINDOW, 0.0, None);
        let codes = vec![0, 1, 2, 1, 0];
        let mut all_pairs = Vec::new();
        all_pairs.extend(ld.push(LdVariant { key: key("chr1", 100), codes: codes.clone() }));
        all_pairs.extend(ld.push(LdVariant { key: key("chr1", 200), codes: codes.clone() }));
        all_pairs.extend(ld.push(LdVariant { key: key("chr1", 300), codes }));
        assert_eq!(all_pairs.len(), 3);
    }

    #[test]
    fn streaming_respects_max_distance() {
        let mut ld = StreamingLd::new(DEFAULT_WINDOW, 0.0, Some(150));
        let codes = vec![0, 1, 2, 1, 0];
        let mut all_pairs = Vec::new();
        all_pairs.extend(ld.push(LdVariant { key: key("chr1", 100), codes: codes.clone() }));
        all_pairs.extend(ld.push(LdVariant { key: key("chr1", 200), codes: codes.clone() }));
        all_pairs.extend(ld.push(LdVariant { key: key("chr1", 300), codes }));
        assert_eq!(all_pairs.len(), 2);
        assert!(all_pairs.iter().all(|p| p.var2.pos - p.var1.pos <= 150));
    }

    #[test]
    fn window_evicts_oldest_entry() {
        let mut ld = StreamingLd::new(1, 0.0, None);
        let codes = vec![0, 1, 2, 1];
        ld.push(LdVariant { key: key("chr1", 100), codes: codes.clone() });
        let pairs = ld.push(LdVariant { key: key("chr1", 200), codes: codes.clone() });
        assert_eq!(pairs.len(), 1);
        // window size 1: variant at 100 has been evicted by now.
        let pairs2 = ld.push(LdVariant { key: key("chr1", 300), codes });
        assert_eq!(pairs2.len(), 1);
        assert_eq!(pairs2[0].var1.pos, 200);
    }

    #[test]
    fn matrix_diagonal_is_one_and_symmetric() {
        let variants = vec![
            LdVariant { key: key("chr1", 100), codes: vec![0, 1, 2, 1] },
            LdVariant { key: key("chr1", 200), codes: vec![0, 2, 2, 0] },
            LdVariant { key: key("chr1", 300), codes: vec![1, 1, 0, 2] },
        ];
        let m = full_matrix(&variants);
        for i in 0..3 {
            assert_eq!(m[i][i], 1.0);
        }
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
    }
}
