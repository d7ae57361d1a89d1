use serde::Serialize;

use crate::config::PopulationConfig;
use crate::events::Cohort;
use crate::random::RandomSource;

/// Cohort sizes for one run. Fixed before the first year is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulationCounts {
    pub children: u64,
    pub young: u64,
    pub old: u64,
}

impl PopulationCounts {
    /// Size the population from a random number of synthetic facilities.
    ///
    /// Draw order: facility count, secondary count, then one child count per
    /// facility. The facility count is split 90/10 young/old and the
    /// secondary count 10/90 young/old; facilities carry a weight of 2:
    ///
    /// `old = 2·facilities_old + secondary_old`,
    /// `young = 2·facilities_young + secondary_young`.
    pub fn initialize(config: &PopulationConfig, rng: &mut impl RandomSource) -> Self {
        let (f_lo, f_hi) = config.facility_count;
        let (s_lo, s_hi) = config.secondary_count;
        let (c_lo, c_hi) = config.children_per_facility;

        let facilities = rng.uniform_int(f_lo, f_hi);
        let secondary = rng.uniform_int(s_lo, s_hi);
        let children: u64 = (0..facilities).map(|_| rng.uniform_int(c_lo, c_hi)).sum();

        let facilities_old = share_of(facilities, config.facility_old_share);
        let facilities_young = facilities - facilities_old;
        let secondary_young = share_of(secondary, config.secondary_young_share);
        let secondary_old = secondary - secondary_young;

        let w = config.facility_weight;
        let counts = PopulationCounts {
            children,
            young: w * facilities_young + secondary_young,
            old: w * facilities_old + secondary_old,
        };

        log::info!(
            "population: {facilities} facilities, secondary count {secondary} -> \
             children={} young={} old={}",
            counts.children,
            counts.young,
            counts.old
        );
        for cohort in counts.empty_cohorts() {
            log::warn!("population: {cohort:?} cohort is empty; it will never incur cost");
        }

        counts
    }

    pub fn get(&self, cohort: Cohort) -> u64 {
        match cohort {
            Cohort::Pediatric => self.children,
            Cohort::Young => self.young,
            Cohort::Old => self.old,
        }
    }

    pub fn empty_cohorts(&self) -> Vec<Cohort> {
        Cohort::ALL.into_iter().filter(|&c| self.get(c) == 0).collect()
    }
}

/// `round(share × n)`, half-to-even, clamped to `n`.
fn share_of(n: u64, share: f64) -> u64 {
    ((share * n as f64).round_ties_even() as u64).min(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::random::{ChaChaSource, ScriptedSource};

    fn config() -> PopulationConfig {
        SimulationConfig::canonical().population
    }

    #[test]
    fn scripted_draws_produce_expected_split() {
        // 20 facilities with 2 children each; secondary count 15.
        // facilities_old = round(2.0) = 2, facilities_young = 18
        // secondary_young = round(1.5) = 2 (half-to-even), secondary_old = 13
        let mut rng = ScriptedSource::new()
            .with_ints([20, 15])
            .with_ints(std::iter::repeat_n(2, 20));
        let counts = PopulationCounts::initialize(&config(), &mut rng);
        assert_eq!(counts, PopulationCounts { children: 40, young: 2 * 18 + 2, old: 2 * 2 + 13 });
        assert!(rng.is_exhausted(), "one child draw per facility");
    }

    #[test]
    fn facility_split_rounds_half_to_even() {
        // 25 facilities: round(2.5) = 2 old, 23 young.
        // secondary 5: round(0.5) = 0 young, 5 old.
        let mut rng = ScriptedSource::new()
            .with_ints([25, 5])
            .with_ints(std::iter::repeat_n(0, 25));
        let counts = PopulationCounts::initialize(&config(), &mut rng);
        assert_eq!(counts.children, 0);
        assert_eq!(counts.old, 2 * 2 + 5);
        assert_eq!(counts.young, 2 * 23);
        assert_eq!(counts.empty_cohorts(), vec![Cohort::Pediatric]);
    }

    #[test]
    fn seeded_population_within_canonical_bounds() {
        for seed in 0..20 {
            let mut rng = ChaChaSource::new(seed);
            let counts = PopulationCounts::initialize(&config(), &mut rng);
            assert!(counts.children <= 200 * 4, "seed {seed}: children {}", counts.children);
            // young: at least 2·18 + 0, at most 2·180 + 5
            assert!((36..=365).contains(&counts.young), "seed {seed}: young {}", counts.young);
            // old: at least 2·2 + 5, at most 2·20 + 45
            assert!((9..=85).contains(&counts.old), "seed {seed}: old {}", counts.old);
        }
    }

    #[test]
    fn get_follows_fields() {
        let counts = PopulationCounts { children: 10, young: 5, old: 3 };
        assert_eq!(counts.get(Cohort::Pediatric), 10);
        assert_eq!(counts.get(Cohort::Young), 5);
        assert_eq!(counts.get(Cohort::Old), 3);
        assert!(counts.empty_cohorts().is_empty());
    }
}
