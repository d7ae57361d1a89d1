use serde::Serialize;

use crate::config::{SimulationConfig, check_year_count};
use crate::error::SimResult;
use crate::events::{CareEvent, Cohort};
use crate::population::PopulationCounts;
use crate::random::RandomSource;
use crate::types::Year;
use crate::year::{YearResult, YearSimulator};

/// Premium collected across all simulated years under each scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PremiumTotals {
    pub traditional: u64,
    pub smart: u64,
}

/// Premiums collected in one year and the cost that year actually incurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearOutcome {
    pub year: Year,
    pub traditional_premium: u64,
    pub smart_premium: u64,
    pub cost: YearResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub population: PopulationCounts,
    pub years: u32,
    pub totals: PremiumTotals,
    /// One entry per simulated year, in order.
    pub outcomes: Vec<YearOutcome>,
}

/// Flattened view of a report for printing or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub population: PopulationCounts,
    pub years: u32,
    pub average_traditional_premium: f64,
    pub average_smart_premium: f64,
    /// `None` when no traditional premium was collected.
    pub savings_pct: Option<f64>,
    pub mean_pediatric_cost: f64,
    pub mean_young_cost: f64,
    pub mean_old_cost: f64,
}

impl ComparisonReport {
    pub fn average_traditional_premium(&self) -> f64 {
        self.totals.traditional as f64 / self.years as f64
    }

    pub fn average_smart_premium(&self) -> f64 {
        self.totals.smart as f64 / self.years as f64
    }

    /// `(traditional − smart) × 100 / traditional`. Negative when the smart
    /// scheme collected more.
    pub fn savings_pct(&self) -> Option<f64> {
        savings_pct(&self.totals)
    }

    /// Mean cost per simulated year for one cohort.
    pub fn mean_annual_cost(&self, cohort: Cohort) -> f64 {
        let sum: u64 = self.outcomes.iter().map(|o| o.cost.get(cohort)).sum();
        sum as f64 / self.years as f64
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            population: self.population,
            years: self.years,
            average_traditional_premium: self.average_traditional_premium(),
            average_smart_premium: self.average_smart_premium(),
            savings_pct: self.savings_pct(),
            mean_pediatric_cost: self.mean_annual_cost(Cohort::Pediatric),
            mean_young_cost: self.mean_annual_cost(Cohort::Young),
            mean_old_cost: self.mean_annual_cost(Cohort::Old),
        }
    }
}

pub fn savings_pct(totals: &PremiumTotals) -> Option<f64> {
    if totals.traditional == 0 {
        return None;
    }
    let traditional = totals.traditional as f64;
    Some((traditional - totals.smart as f64) * 100.0 / traditional)
}

/// Runs the year loop and prices both funding schemes.
///
/// Traditional: every member pays the cohort's flat annual rate each year.
/// Smart contract: year 1 collects the traditional amount; every later year
/// collects exactly what the previous year cost, no margin.
pub struct PremiumComparator<'a> {
    config: &'a SimulationConfig,
}

impl<'a> PremiumComparator<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        PremiumComparator { config }
    }

    pub fn traditional_premium(&self, population: &PopulationCounts) -> u64 {
        Cohort::ALL
            .iter()
            .map(|&c| population.get(c) * self.config.cohort(c).annual_premium())
            .sum()
    }

    pub fn run(
        &self,
        years: u32,
        population: PopulationCounts,
        rng: &mut impl RandomSource,
    ) -> SimResult<ComparisonReport> {
        self.compare(years, population, rng, None)
    }

    /// Like `run`, but hands each year's processed events to `on_events` as
    /// soon as that year finishes. Nothing is kept once the callback returns.
    pub fn run_with_trace(
        &self,
        years: u32,
        population: PopulationCounts,
        rng: &mut impl RandomSource,
        mut on_events: impl FnMut(&[CareEvent]),
    ) -> SimResult<ComparisonReport> {
        self.compare(years, population, rng, Some(&mut on_events))
    }

    fn compare(
        &self,
        years: u32,
        population: PopulationCounts,
        rng: &mut impl RandomSource,
        mut on_events: Option<&mut dyn FnMut(&[CareEvent])>,
    ) -> SimResult<ComparisonReport> {
        check_year_count(years)?;
        self.config.validate_tables()?;

        let mut sim = YearSimulator::new(self.config, &population);
        if on_events.is_some() {
            sim = sim.with_trace();
        }

        let traditional_premium = self.traditional_premium(&population);
        let mut totals = PremiumTotals::default();
        let mut outcomes = Vec::new();
        let mut last_year_cost: Option<u64> = None;

        log::info!(
            "comparing premiums over {years} years, traditional premium {traditional_premium} per year"
        );

        for y in 1..=years {
            let year = Year(y);
            let smart_premium = last_year_cost.unwrap_or(traditional_premium);

            let cost = sim.run(year, rng);
            last_year_cost = Some(cost.total);
            if let Some(sink) = on_events.as_deref_mut() {
                sink(sim.log.as_slice());
            }

            totals.traditional += traditional_premium;
            totals.smart += smart_premium;
            outcomes.push(YearOutcome { year, traditional_premium, smart_premium, cost });

            log::debug!("Year {y} complete: cost {}, smart premium {smart_premium}", cost.total);
        }

        Ok(ComparisonReport { population, years, totals, outcomes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_YEARS;
    use crate::error::SimError;
    use crate::random::{ChaChaSource, ScriptedSource};
    use crate::types::Day;

    fn config() -> SimulationConfig {
        SimulationConfig::canonical()
    }

    fn small_population() -> PopulationCounts {
        PopulationCounts { children: 10, young: 5, old: 3 }
    }

    #[test]
    fn traditional_premium_uses_flat_annual_rates() {
        let config = config();
        let comparator = PremiumComparator::new(&config);
        // 3·9600 + 5·4800 + 10·2400
        assert_eq!(comparator.traditional_premium(&small_population()), 28_800 + 24_000 + 24_000);
    }

    #[test]
    fn first_year_smart_premium_equals_traditional() {
        let config = config();
        let mut rng = ChaChaSource::new(1);
        let report = PremiumComparator::new(&config).run(5, small_population(), &mut rng).unwrap();
        let first = report.outcomes[0];
        assert_eq!(first.year, Year(1));
        assert_eq!(first.smart_premium, first.traditional_premium);
    }

    #[test]
    fn later_smart_premium_equals_previous_year_cost() {
        let config = config();
        let mut rng = ChaChaSource::new(2);
        let report = PremiumComparator::new(&config).run(50, small_population(), &mut rng).unwrap();
        assert_eq!(report.outcomes.len(), 50);
        for pair in report.outcomes.windows(2) {
            assert_eq!(pair[1].smart_premium, pair[0].cost.total, "year {:?}", pair[1].year);
        }
    }

    #[test]
    fn totals_are_sums_of_yearly_premiums() {
        let config = config();
        let mut rng = ChaChaSource::new(3);
        let report = PremiumComparator::new(&config).run(20, small_population(), &mut rng).unwrap();
        let trad: u64 = report.outcomes.iter().map(|o| o.traditional_premium).sum();
        let smart: u64 = report.outcomes.iter().map(|o| o.smart_premium).sum();
        assert_eq!(report.totals, PremiumTotals { traditional: trad, smart });
        assert!((report.average_traditional_premium() - trad as f64 / 20.0).abs() < 1e-9);
        assert!((report.average_smart_premium() - smart as f64 / 20.0).abs() < 1e-9);
    }

    #[test]
    fn savings_recomputed_from_totals_matches_report() {
        let config = config();
        let mut rng = ChaChaSource::new(4);
        let report = PremiumComparator::new(&config).run(30, small_population(), &mut rng).unwrap();
        let t = report.totals.traditional as f64;
        let s = report.totals.smart as f64;
        let expected = (t - s) * 100.0 / t;
        let got = report.savings_pct().expect("traditional total is positive");
        assert!((got - expected).abs() < 1e-9, "{got} vs {expected}");
    }

    #[test]
    fn savings_undefined_without_traditional_premium() {
        assert_eq!(savings_pct(&PremiumTotals { traditional: 0, smart: 0 }), None);
        assert_eq!(savings_pct(&PremiumTotals { traditional: 200, smart: 150 }), Some(25.0));
        assert_eq!(savings_pct(&PremiumTotals { traditional: 100, smart: 150 }), Some(-50.0));
    }

    #[test]
    fn empty_population_reports_no_savings() {
        let config = config();
        let mut rng = ScriptedSource::new();
        let population = PopulationCounts { children: 0, young: 0, old: 0 };
        let report = PremiumComparator::new(&config).run(3, population, &mut rng).unwrap();
        assert_eq!(report.totals, PremiumTotals::default());
        assert_eq!(report.savings_pct(), None);
    }

    #[test]
    fn empty_pediatric_cohort_costs_nothing_for_a_century() {
        let config = config();
        let mut rng = ChaChaSource::new(99);
        let population = PopulationCounts { children: 0, young: 5, old: 3 };
        let report = PremiumComparator::new(&config).run(100, population, &mut rng).unwrap();
        assert_eq!(report.outcomes.len(), 100);
        for o in &report.outcomes {
            assert_eq!(o.cost.pediatric, 0, "year {:?}", o.year);
        }
        assert!(report.outcomes.iter().any(|o| o.cost.young > 0), "other cohorts still incur cost");
        assert_eq!(report.mean_annual_cost(Cohort::Pediatric), 0.0);
    }

    #[test]
    fn zero_years_rejected_before_any_draw() {
        let config = config();
        let mut rng = ScriptedSource::new();
        let err = PremiumComparator::new(&config).run(0, small_population(), &mut rng).unwrap_err();
        assert_eq!(err, SimError::InvalidYearCount(0));
    }

    #[test]
    fn invalid_table_rejected_before_any_draw() {
        let mut config = config();
        config.severities[0].probability = 0.5;
        // An empty script panics on the first draw, so reaching Err proves none happened.
        let mut rng = ScriptedSource::new();
        let result = PremiumComparator::new(&config).run(3, small_population(), &mut rng);
        assert!(matches!(result, Err(SimError::ProbabilitiesDoNotSumToOne { .. })));
    }

    #[test]
    fn oversized_year_count_rejected_before_any_draw() {
        let config = config();
        let mut rng = ScriptedSource::new();
        let comparator = PremiumComparator::new(&config);
        let err = comparator.run(u32::MAX, small_population(), &mut rng).unwrap_err();
        assert_eq!(err, SimError::InvalidYearCount(u32::MAX));
        let err = comparator.run(MAX_YEARS + 1, small_population(), &mut rng).unwrap_err();
        assert_eq!(err, SimError::InvalidYearCount(MAX_YEARS + 1));
    }

    #[test]
    fn trace_streams_one_batch_per_year() {
        let config = config();
        let mut rng = ChaChaSource::new(8);
        let mut batches: Vec<Vec<CareEvent>> = Vec::new();
        let report = PremiumComparator::new(&config)
            .run_with_trace(3, small_population(), &mut rng, |events| batches.push(events.to_vec()))
            .unwrap();
        assert_eq!(batches.len(), report.outcomes.len());
        for (batch, o) in batches.iter().zip(&report.outcomes) {
            assert!(batch.iter().all(|e| e.year == o.year && e.day < Day::YEAR_END));
            let traced: u64 = batch.iter().map(|e| e.cost).sum();
            assert_eq!(traced, o.cost.total, "year {:?}", o.year);
        }
    }

    #[test]
    fn traced_and_untraced_runs_agree() {
        let config = config();
        let plain = PremiumComparator::new(&config)
            .run(4, small_population(), &mut ChaChaSource::new(8))
            .unwrap();
        let traced = PremiumComparator::new(&config)
            .run_with_trace(4, small_population(), &mut ChaChaSource::new(8), |_| {})
            .unwrap();
        assert_eq!(plain, traced);
    }
}
