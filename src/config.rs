use crate::error::{SimError, SimResult};
use crate::events::{Cohort, Severity};

// ── Run shape ─────────────────────────────────────────────────────────────────

pub const DEFAULT_SEED: u64 = 42;
/// Number of simulated years. Averages divide by this same count.
pub const DEFAULT_YEARS: u32 = 1000;
/// Upper bound on the year count; a run keeps one outcome per year.
pub const MAX_YEARS: u32 = 1_000_000;
pub const MONTHS_PER_YEAR: u64 = 12;
/// Allowed drift of the severity probability sum away from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

// ── Traditional premium: flat monthly rates per member ───────────────────────

pub const PEDIATRIC_MONTHLY_PREMIUM: u64 = 200;
pub const YOUNG_MONTHLY_PREMIUM: u64 = 400;
pub const OLD_MONTHLY_PREMIUM: u64 = 800;

// ── Cost multipliers: young typically cheaper, pediatric more expensive ──────

pub const PEDIATRIC_COST_MULTIPLIER: f64 = 1.5;
pub const YOUNG_COST_MULTIPLIER: f64 = 0.75;
pub const OLD_COST_MULTIPLIER: f64 = 1.0;

// ── Mean inter-arrival time: mu = (scale / population) × factor days ─────────

pub const PEDIATRIC_MEAN_TIME_SCALE: f64 = 200.0;
pub const PEDIATRIC_MEAN_TIME_FACTOR: f64 = 2.0;
pub const YOUNG_MEAN_TIME_SCALE: f64 = 50.0;
pub const YOUNG_MEAN_TIME_FACTOR: f64 = 9.0;
pub const OLD_MEAN_TIME_SCALE: f64 = 50.0;
pub const OLD_MEAN_TIME_FACTOR: f64 = 6.0;

// ── Severity bands: (low, high) cost and selection probability ───────────────

pub const CLINICAL_VISIT_COST: (u64, u64) = (60, 200);
pub const OUTPATIENT_PROCEDURE_COST: (u64, u64) = (1_000, 10_000);
pub const INPATIENT_PROCEDURE_COST: (u64, u64) = (3_000, 100_000);
pub const CLINICAL_VISIT_PROBABILITY: f64 = 0.90;
pub const OUTPATIENT_PROCEDURE_PROBABILITY: f64 = 0.07;
pub const INPATIENT_PROCEDURE_PROBABILITY: f64 = 0.03;

// ── Population sizing ─────────────────────────────────────────────────────────

pub const FACILITY_COUNT_RANGE: (u64, u64) = (20, 200);
pub const CHILDREN_PER_FACILITY_RANGE: (u64, u64) = (0, 4);
pub const SECONDARY_COUNT_RANGE: (u64, u64) = (5, 50);
/// Share of facilities assigned to the older cohort.
pub const FACILITY_OLD_SHARE: f64 = 0.1;
/// Share of the secondary count assigned to the young cohort.
pub const SECONDARY_YOUNG_SHARE: f64 = 0.1;
pub const FACILITY_WEIGHT: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBand {
    pub low: u64,
    pub high: u64,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortConfig {
    pub monthly_premium: u64,
    pub cost_multiplier: f64,
    pub mean_time_scale: f64,
    pub mean_time_factor: f64,
}

impl CohortConfig {
    pub fn annual_premium(&self) -> u64 {
        self.monthly_premium * MONTHS_PER_YEAR
    }

    /// Expected days between consecutive care events for a cohort of
    /// `population` members. `None` for an empty cohort: it never fires.
    pub fn mean_interarrival(&self, population: u64) -> Option<f64> {
        if population == 0 {
            return None;
        }
        Some((self.mean_time_scale / population as f64) * self.mean_time_factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationConfig {
    pub facility_count: (u64, u64),
    pub children_per_facility: (u64, u64),
    pub secondary_count: (u64, u64),
    pub facility_old_share: f64,
    pub secondary_young_share: f64,
    pub facility_weight: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub seed: u64,
    pub years: u32,
    pub population: PopulationConfig,
    pub pediatric: CohortConfig,
    pub young: CohortConfig,
    pub old: CohortConfig,
    /// Indexed by `Severity::index()`.
    pub severities: [SeverityBand; 3],
}

impl SimulationConfig {
    pub fn canonical() -> Self {
        SimulationConfig {
            seed: DEFAULT_SEED,
            years: DEFAULT_YEARS,
            population: PopulationConfig {
                facility_count: FACILITY_COUNT_RANGE,
                children_per_facility: CHILDREN_PER_FACILITY_RANGE,
                secondary_count: SECONDARY_COUNT_RANGE,
                facility_old_share: FACILITY_OLD_SHARE,
                secondary_young_share: SECONDARY_YOUNG_SHARE,
                facility_weight: FACILITY_WEIGHT,
            },
            pediatric: CohortConfig {
                monthly_premium: PEDIATRIC_MONTHLY_PREMIUM,
                cost_multiplier: PEDIATRIC_COST_MULTIPLIER,
                mean_time_scale: PEDIATRIC_MEAN_TIME_SCALE,
                mean_time_factor: PEDIATRIC_MEAN_TIME_FACTOR,
            },
            young: CohortConfig {
                monthly_premium: YOUNG_MONTHLY_PREMIUM,
                cost_multiplier: YOUNG_COST_MULTIPLIER,
                mean_time_scale: YOUNG_MEAN_TIME_SCALE,
                mean_time_factor: YOUNG_MEAN_TIME_FACTOR,
            },
            old: CohortConfig {
                monthly_premium: OLD_MONTHLY_PREMIUM,
                cost_multiplier: OLD_COST_MULTIPLIER,
                mean_time_scale: OLD_MEAN_TIME_SCALE,
                mean_time_factor: OLD_MEAN_TIME_FACTOR,
            },
            severities: [
                SeverityBand {
                    low: CLINICAL_VISIT_COST.0,
                    high: CLINICAL_VISIT_COST.1,
                    probability: CLINICAL_VISIT_PROBABILITY,
                },
                SeverityBand {
                    low: OUTPATIENT_PROCEDURE_COST.0,
                    high: OUTPATIENT_PROCEDURE_COST.1,
                    probability: OUTPATIENT_PROCEDURE_PROBABILITY,
                },
                SeverityBand {
                    low: INPATIENT_PROCEDURE_COST.0,
                    high: INPATIENT_PROCEDURE_COST.1,
                    probability: INPATIENT_PROCEDURE_PROBABILITY,
                },
            ],
        }
    }

    pub fn cohort(&self, cohort: Cohort) -> &CohortConfig {
        match cohort {
            Cohort::Pediatric => &self.pediatric,
            Cohort::Young => &self.young,
            Cohort::Old => &self.old,
        }
    }

    pub fn severity(&self, severity: Severity) -> &SeverityBand {
        &self.severities[severity.index()]
    }

    /// Categorical weights in `Severity::ALL` order.
    pub fn severity_probabilities(&self) -> [f64; 3] {
        self.severities.map(|b| b.probability)
    }

    /// Check the year count and every table. Called before any random draw is made.
    pub fn validate(&self) -> SimResult<()> {
        check_year_count(self.years)?;
        self.validate_tables()
    }

    /// Severity, cohort and population tables only.
    pub fn validate_tables(&self) -> SimResult<()> {
        for severity in Severity::ALL {
            let band = self.severity(severity);
            if !band.probability.is_finite() || band.probability < 0.0 {
                return Err(SimError::InvalidProbability { severity, probability: band.probability });
            }
            if band.low > band.high {
                return Err(SimError::InvertedCostRange { severity, low: band.low, high: band.high });
            }
        }
        let sum: f64 = self.severity_probabilities().iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(SimError::ProbabilitiesDoNotSumToOne { sum });
        }

        for cohort in Cohort::ALL {
            let c = self.cohort(cohort);
            if !c.cost_multiplier.is_finite() || c.cost_multiplier < 0.0 {
                return Err(SimError::InvalidCostMultiplier { cohort, multiplier: c.cost_multiplier });
            }
            let positive = |x: f64| x.is_finite() && x > 0.0;
            if !positive(c.mean_time_scale) || !positive(c.mean_time_factor) {
                return Err(SimError::InvalidMeanTime {
                    cohort,
                    scale: c.mean_time_scale,
                    factor: c.mean_time_factor,
                });
            }
        }

        let p = &self.population;
        for (name, (lo, hi)) in [
            ("facility_count", p.facility_count),
            ("children_per_facility", p.children_per_facility),
            ("secondary_count", p.secondary_count),
        ] {
            if lo > hi {
                return Err(SimError::InvertedDrawRange { name, lo, hi });
            }
        }
        for (name, share) in [
            ("facility_old_share", p.facility_old_share),
            ("secondary_young_share", p.secondary_young_share),
        ] {
            if !(0.0..=1.0).contains(&share) {
                return Err(SimError::InvalidSplitShare { name, share });
            }
        }

        Ok(())
    }
}

/// `1..=MAX_YEARS`.
pub fn check_year_count(years: u32) -> SimResult<()> {
    if years == 0 || years > MAX_YEARS {
        return Err(SimError::InvalidYearCount(years));
    }
    Ok(())
}
