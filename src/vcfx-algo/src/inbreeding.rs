/// Controls whether a homozygous multi-allelic call (e.g. `2/2`) collapses
/// to a plain homozygous-alt code `2`, or is treated as invalid alongside
/// `vcfx_genotype`'s default biallelic-only codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InbreedingGenotypeMode {
    #[default]
    ReferenceFree,
    CollapseMultiallelicHomozygous,
}

/// `LeaveOneOut` (default) recomputes each sample's expected heterozygosity
/// excluding its own allele; `Global` uses one frequency derived from all
/// valid samples at the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InbreedingFreqMode {
    #[default]
    LeaveOneOut,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InbreedingResult {
    NotAvailable,
    F(f64),
}

/// Per-sample running `obsHet`/`expHet` accumulation across every
/// biallelic site with >= 2 valid genotypes.
pub struct InbreedingAccumulator {
    freq_mode: InbreedingFreqMode,
    genotype_mode: InbreedingGenotypeMode,
    obs_het: Vec<u64>,
    exp_het: Vec<f64>,
    sites_used: Vec<u64>,
}

impl InbreedingAccumulator {
    pub fn new(n_samples: usize, freq_mode: InbreedingFreqMode, genotype_mode: InbreedingGenotypeMode) -> Self {
        Self { freq_mode, genotype_mode, obs_het: vec![0; n_samples], exp_het: vec![0.0; n_samples], sites_used: vec![0; n_samples] }
    }

    /// Codes one site, pre-computed by the caller (`code_diploid_biallelic_collapsed`
    /// so that `1/1` contributes as homAlt rather than missing). Sites with
    /// fewer than 2 valid (non-missing) calls contribute nothing.
    pub fn add_site(&mut self, codes: &[i8]) {
        debug_assert_eq!(codes.len(), self.obs_het.len());
        let valid: Vec<usize> = (0..codes.len()).filter(|&i| codes[i] >= 0).collect();
        if valid.len() < 2 {
            return;
        }
        let valid_samples = valid.len();
        let alt_count_total: i64 = valid.iter().map(|&i| codes[i] as i64).sum();
        let global_p = alt_count_total as f64 / (2.0 * valid_samples as f64);

        for &i in &valid {
            let code = codes[i] as i64;
            let p = match self.freq_mode {
                InbreedingFreqMode::Global => global_p,
                InbreedingFreqMode::LeaveOneOut => {
                    let alt_count_s = alt_count_total - code;
                    let valid_ex = valid_samples - 1;
                    alt_count_s as f64 / (2.0 * valid_ex as f64)
                }
            };
            self.exp_het[i] += 2.0 * p * (1.0 - p);
            if codes[i] == 1 {
                self.obs_het[i] += 1;
            }
            self.sites_used[i] += 1;
        }
    }

    pub fn genotype_mode(&self) -> InbreedingGenotypeMode {
        self.genotype_mode
    }

    pub fn finish(&self) -> Vec<InbreedingResult> {
        (0..self.obs_het.len())
            .map(|i| {
                if self.sites_used[i] == 0 {
                    InbreedingResult::NotAvailable
                } else if self.exp_het[i] == 0.0 {
                    InbreedingResult::F(1.0)
                } else {
                    InbreedingResult::F(1.0 - self.obs_het[i] as f64 / self.exp_het[i])
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_with_no_sites_is_not_available() {
        let acc = InbreedingAccumulator::new(3, InbreedingFreqMode::LeaveOneOut, InbreedingGenotypeMode::ReferenceFree);
        assert_eq!(acc.finish(), vec![InbreedingResult::NotAvailable; 3]);
    }

    #[test]
    fn all_homozygous_sample_has_f_one() {
        let mut acc = InbreedingAccumulator::new(3, InbreedingFreqMode::LeaveOneOut, InbreedingGenotypeMode::ReferenceFree);
        acc.add_site(&[0, 0, 0]);
        acc.add_site(&[0, 0, 0]);
        for result in acc.finish() {
            assert_eq!(result, InbreedingResult::F(1.0));
        }
    }

    #[test]
    fn site_skipped_when_fewer_than_two_valid_samples() {
        let mut acc = InbreedingAccumulator::new(2, InbreedingFreqMode::LeaveOneOut, InbreedingGenotypeMode::ReferenceFree);
        acc.add_site(&[0, -1]);
        assert_eq!(acc.finish(), vec![InbreedingResult::NotAvailable; 2]);
    }

    #[test]
    fn global_mode_uses_one_frequency_for_every_sample() {
        let mut acc = InbreedingAccumulator::new(4, InbreedingFreqMode::Global, InbreedingGenotypeMode::ReferenceFree);
        acc.add_site(&[0, 1, 1, 2]);
        let results = acc.finish();
        assert!(results.iter().all(|r| matches!(r, InbreedingResult::F(_))));
    }
}
