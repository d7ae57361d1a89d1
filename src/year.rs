use serde::Serialize;

use crate::clock::CohortEventClock;
use crate::config::{SeverityBand, SimulationConfig};
use crate::events::{CareEvent, Cohort};
use crate::ledger::CostLedger;
use crate::population::PopulationCounts;
use crate::random::RandomSource;
use crate::types::{Day, Year};

/// Cost incurred by each cohort over one simulated year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearResult {
    pub pediatric: u64,
    pub young: u64,
    pub old: u64,
    pub total: u64,
}

impl YearResult {
    fn from_ledger(ledger: &CostLedger) -> Self {
        YearResult {
            pediatric: ledger.total(Cohort::Pediatric),
            young: ledger.total(Cohort::Young),
            old: ledger.total(Cohort::Old),
            total: ledger.sum(),
        }
    }

    pub fn get(&self, cohort: Cohort) -> u64 {
        match cohort {
            Cohort::Pediatric => self.pediatric,
            Cohort::Young => self.young,
            Cohort::Old => self.old,
        }
    }
}

/// Runs one year of care events for the three cohorts.
///
/// The three clocks advance in lockstep: each step jumps to the earliest
/// scheduled day and processes every cohort whose clock sits on that day,
/// in pediatric, young, old order. Events that land on or after day 365
/// are dropped; the next year primes its clocks from scratch.
pub struct YearSimulator {
    clocks: [CohortEventClock; 3],
    ledger: CostLedger,
    severities: [SeverityBand; 3],
    probabilities: [f64; 3],
    multipliers: [f64; 3],
    trace: bool,
    /// Processed events of the most recent year, in order. Only filled when
    /// tracing is enabled; cleared at the start of every `run`.
    pub log: Vec<CareEvent>,
}

impl YearSimulator {
    pub fn new(config: &SimulationConfig, population: &PopulationCounts) -> Self {
        let clock = |cohort: Cohort| {
            CohortEventClock::new(cohort, config.cohort(cohort).mean_interarrival(population.get(cohort)))
        };
        YearSimulator {
            clocks: Cohort::ALL.map(clock),
            ledger: CostLedger::new(),
            severities: config.severities,
            probabilities: config.severity_probabilities(),
            multipliers: Cohort::ALL.map(|c| config.cohort(c).cost_multiplier),
            trace: false,
            log: Vec::new(),
        }
    }

    /// Record a `CareEvent` for every processed event.
    pub fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    pub fn clock(&self, cohort: Cohort) -> &CohortEventClock {
        &self.clocks[cohort.index()]
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    /// Clocks back to day 0, ledgers to zero.
    pub fn reset(&mut self) {
        for clock in &mut self.clocks {
            clock.reset();
        }
        self.ledger.reset();
    }

    /// Simulate `year` from a clean state and return the per-cohort totals.
    pub fn run(&mut self, year: Year, rng: &mut impl RandomSource) -> YearResult {
        self.reset();
        self.log.clear();
        for clock in &mut self.clocks {
            clock.advance(&self.probabilities, rng);
        }

        loop {
            let day = self.earliest_day();
            if !day.within_year() {
                break;
            }
            for cohort in Cohort::ALL {
                let i = cohort.index();
                if self.clocks[i].next_event_day() == day && day.within_year() {
                    self.process_event(year, day, cohort, rng);
                    self.clocks[i].advance(&self.probabilities, rng);
                }
            }
        }

        YearResult::from_ledger(&self.ledger)
    }

    fn earliest_day(&self) -> Day {
        self.clocks.iter().map(|c| c.next_event_day()).min().unwrap_or(Day::NEVER)
    }

    /// Draw a cost for the cohort's pending severity, scale it by the cohort
    /// multiplier and book it.
    fn process_event(&mut self, year: Year, day: Day, cohort: Cohort, rng: &mut impl RandomSource) {
        let i = cohort.index();
        let Some(severity) = self.clocks[i].pending_severity() else {
            unreachable!("{cohort:?} clock due on day {} without a severity", day.0);
        };
        let band = self.severities[severity.index()];
        let sampled_cost = rng.uniform_int(band.low, band.high);
        let cost = (sampled_cost as f64 * self.multipliers[i]).round_ties_even() as u64;
        let cumulative_cost = self.ledger.record(cohort, cost);

        if self.trace {
            self.log.push(CareEvent { year, day, cohort, severity, sampled_cost, cost, cumulative_cost });
        }
    }
}
