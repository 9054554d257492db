/// Exact Hardy-Weinberg equilibrium test via enumeration of all
/// heterozygote counts consistent with the observed allele totals.
///
/// Returns `1.0` for a monomorphic site (`N == 0` or the allele counts
/// don't add up to `2N`, which can't happen for counts actually tallied
/// from genotypes but is guarded against defensively).
pub fn hwe_exact_p(hom_ref: u64, het: u64, hom_alt: u64) -> f64 {
    let n = hom_ref + het + hom_alt;
    if n == 0 {
        return 1.0;
    }
    let x = 2 * hom_alt + het;
    let y = 2 * hom_ref + het;
    if x + y != 2 * n {
        return 1.0;
    }

    let log_fact = log_factorials(n as usize);
    let total_alleles = (x + y) as f64;
    let p = y as f64 / total_alleles;
    let q = x as f64 / total_alleles;
    let log_p = if p > 0.0 { p.ln() } else { f64::NEG_INFINITY };
    let log_q = if q > 0.0 { q.ln() } else { f64::NEG_INFINITY };
    let log_2pq = if p > 0.0 && q > 0.0 { (2.0 * p * q).ln() } else { f64::NEG_INFINITY };

    let max_a = x.min(y);
    let mut configs: Vec<(u64, f64)> = Vec::new();
    for a in 0..=max_a {
        if (y - a) % 2 != 0 || (x - a) % 2 != 0 {
            continue;
        }
        let hom_ref_p = (y - a) / 2;
        let hom_alt_p = (x - a) / 2;
        let log_coef =
            log_fact[n as usize] - log_fact[hom_ref_p as usize] - log_fact[a as usize] - log_fact[hom_alt_p as usize];
        let log_prob = log_coef + scaled_term(hom_ref_p, 2, log_p) + scaled_term(a, 1, log_2pq) + scaled_term(hom_alt_p, 2, log_q);
        configs.push((a, log_prob));
    }
    if configs.is_empty() {
        return 1.0;
    }

    let shift = configs
        .iter()
        .map(|&(_, lp)| lp)
        .filter(|lp| lp.is_finite())
        .fold(f64::INFINITY, f64::min);
    if !shift.is_finite() {
        return 1.0;
    }

    let probs: Vec<f64> = configs.iter().map(|&(_, lp)| if lp.is_finite() { (lp - shift).exp() } else { 0.0 }).collect();
    let total: f64 = probs.iter().sum();
    if total <= 0.0 {
        return 1.0;
    }
    let normalized: Vec<f64> = probs.iter().map(|p| p / total).collect();

    let observed_idx = configs.iter().position(|&(a, _)| a == het).expect("observed config always satisfies its own constraints");
    let observed = normalized[observed_idx];

    let p_value: f64 = normalized.iter().filter(|&&np| np <= observed + 1e-12).sum();
    p_value.clamp(0.0, 1.0)
}

fn scaled_term(count: u64, multiplier: u64, log_value: f64) -> f64 {
    if count == 0 {
        0.0
    } else {
        (count * multiplier) as f64 * log_value
    }
}

fn log_factorials(max_n: usize) -> Vec<f64> {
    let mut out = vec![0.0f64; max_n + 1];
    for i in 1..=max_n {
        out[i] = out[i - 1] + (i as f64).ln();
    }
    out
}
