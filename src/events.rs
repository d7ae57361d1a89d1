use serde::Serialize;

use crate::types::{Day, Year};

/// Age-based population segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Cohort {
    Pediatric,
    Young,
    Old,
}

impl Cohort {
    /// Processing order within a day: pediatric, young, old.
    pub const ALL: [Cohort; 3] = [Cohort::Pediatric, Cohort::Young, Cohort::Old];

    pub fn index(self) -> usize {
        match self {
            Cohort::Pediatric => 0,
            Cohort::Young => 1,
            Cohort::Old => 2,
        }
    }
}

/// Care event category. Clinical visits are the most likely and cheapest,
/// inpatient procedures the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    ClinicalVisit,
    OutpatientProcedure,
    InpatientProcedure,
}

impl Severity {
    /// Order of the categorical draw outcomes.
    pub const ALL: [Severity; 3] = [
        Severity::ClinicalVisit,
        Severity::OutpatientProcedure,
        Severity::InpatientProcedure,
    ];

    pub fn index(self) -> usize {
        match self {
            Severity::ClinicalVisit => 0,
            Severity::OutpatientProcedure => 1,
            Severity::InpatientProcedure => 2,
        }
    }
}

/// One processed care event. Only produced when the year simulator runs with
/// tracing enabled; a run's trace is streamed as NDJSON, one line per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareEvent {
    pub year: Year,
    pub day: Day,
    pub cohort: Cohort,
    pub severity: Severity,
    /// Uniform draw from the severity's cost range, before the cohort multiplier.
    pub sampled_cost: u64,
    /// `sampled_cost × multiplier`, rounded half-to-even. This is what the ledger records.
    pub cost: u64,
    /// Cohort ledger total after this event.
    pub cumulative_cost: u64,
}
