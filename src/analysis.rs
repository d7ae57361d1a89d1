use serde::Serialize;

use crate::premium::ComparisonReport;

/// Distribution statistics for a continuous metric across N simulation runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistStats {
    pub n: usize,
    pub min: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Cross-run distribution of the headline comparison figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunDistribution {
    pub runs: usize,
    pub average_traditional_premium: DistStats,
    pub average_smart_premium: DistStats,
    /// Runs whose savings percentage is undefined are left out.
    pub savings_pct: Option<DistStats>,
    pub undefined_savings: usize,
}

/// Quantile `q` in `[0, 1]` of an ascending, non-empty slice, interpolating
/// linearly between the two closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    match sorted.get(below + 1) {
        Some(&above) => sorted[below] + (above - sorted[below]) * (rank - below as f64),
        None => sorted[below],
    }
}

impl DistStats {
    /// `None` for an empty sample. The standard deviation uses the n − 1
    /// denominator and is 0 for a single value.
    pub fn from_sample(mut sample: Vec<f64>) -> Option<Self> {
        if sample.is_empty() {
            return None;
        }
        sample.sort_by(f64::total_cmp);
        let n = sample.len();
        let mean = sample.iter().sum::<f64>() / n as f64;
        let squared_dev: f64 = sample.iter().map(|x| (x - mean) * (x - mean)).sum();
        let std_dev = if n > 1 { (squared_dev / (n - 1) as f64).sqrt() } else { 0.0 };

        Some(DistStats {
            n,
            min: sample[0],
            p5: quantile(&sample, 0.05),
            p25: quantile(&sample, 0.25),
            p50: quantile(&sample, 0.50),
            p75: quantile(&sample, 0.75),
            p95: quantile(&sample, 0.95),
            max: sample[n - 1],
            mean,
            std_dev,
        })
    }
}

/// Summarise replicate runs. Needs at least two runs.
pub fn summarise_runs(reports: &[ComparisonReport]) -> Option<RunDistribution> {
    if reports.len() < 2 {
        return None;
    }

    let savings: Vec<f64> = reports.iter().filter_map(|r| r.savings_pct()).collect();
    let undefined_savings = reports.len() - savings.len();

    Some(RunDistribution {
        runs: reports.len(),
        average_traditional_premium: DistStats::from_sample(
            reports.iter().map(|r| r.average_traditional_premium()).collect(),
        )?,
        average_smart_premium: DistStats::from_sample(
            reports.iter().map(|r| r.average_smart_premium()).collect(),
        )?,
        savings_pct: DistStats::from_sample(savings),
        undefined_savings,
    })
}
