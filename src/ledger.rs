use crate::events::Cohort;

/// Per-cohort cost incurred so far in the current year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostLedger {
    totals: [u64; 3],
}

impl CostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.totals = [0; 3];
    }

    /// Add `cost` to the cohort's total and return the new total.
    pub fn record(&mut self, cohort: Cohort, cost: u64) -> u64 {
        let total = &mut self.totals[cohort.index()];
        *total += cost;
        *total
    }

    pub fn total(&self, cohort: Cohort) -> u64 {
        self.totals[cohort.index()]
    }

    pub fn sum(&self) -> u64 {
        self.totals.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.totals.iter().all(|&t| t == 0)
    }
}
