use thiserror::Error;

use crate::events::{Cohort, Severity};

/// Configuration problems, all detected before any simulation work starts.
///
/// A cohort with zero members is not an error: its clock never fires and it
/// contributes no cost.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("year count must be between 1 and {max}, got {0}", max = crate::config::MAX_YEARS)]
    InvalidYearCount(u32),

    #[error("severity probabilities must sum to 1, got {sum}")]
    ProbabilitiesDoNotSumToOne { sum: f64 },

    #[error("probability for {severity:?} must be finite and non-negative, got {probability}")]
    InvalidProbability { severity: Severity, probability: f64 },

    #[error("cost range for {severity:?} is inverted: low {low} > high {high}")]
    InvertedCostRange { severity: Severity, low: u64, high: u64 },

    #[error("cost multiplier for {cohort:?} must be finite and non-negative, got {multiplier}")]
    InvalidCostMultiplier { cohort: Cohort, multiplier: f64 },

    #[error("mean-time scale and factor for {cohort:?} must be finite and positive, got {scale} x {factor}")]
    InvalidMeanTime { cohort: Cohort, scale: f64, factor: f64 },

    #[error("population draw range '{name}' is inverted: {lo} > {hi}")]
    InvertedDrawRange { name: &'static str, lo: u64, hi: u64 },

    #[error("population split share '{name}' must lie in [0, 1], got {share}")]
    InvalidSplitShare { name: &'static str, share: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
