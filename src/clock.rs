use crate::events::{Cohort, Severity};
use crate::random::RandomSource;
use crate::types::Day;

/// Next scheduled care event for one cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortEventClock {
    pub cohort: Cohort,
    /// Mean days between events; `None` for an empty cohort.
    mean: Option<f64>,
    next_event_day: Day,
    pending_severity: Option<Severity>,
}

impl CohortEventClock {
    pub fn new(cohort: Cohort, mean: Option<f64>) -> Self {
        CohortEventClock { cohort, mean, next_event_day: Day(0), pending_severity: None }
    }

    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    pub fn next_event_day(&self) -> Day {
        self.next_event_day
    }

    pub fn pending_severity(&self) -> Option<Severity> {
        self.pending_severity
    }

    /// Back to day 0 with no pending event.
    pub fn reset(&mut self) {
        self.next_event_day = Day(0);
        self.pending_severity = None;
    }

    /// Schedule the next event: an exponential delay (rounded half-to-even)
    /// added to the current day, then a severity draw. An empty cohort goes
    /// straight to `Day::NEVER` without drawing anything.
    pub fn advance(&mut self, probabilities: &[f64], rng: &mut impl RandomSource) {
        let Some(mean) = self.mean else {
            self.next_event_day = Day::NEVER;
            self.pending_severity = None;
            return;
        };

        let delay = rng.exponential(mean).round_ties_even();
        // Float-to-int casts saturate; a huge delay lands on NEVER.
        self.next_event_day = self.next_event_day.offset(delay as u64);
        self.pending_severity = Some(Severity::ALL[rng.categorical(probabilities)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ChaChaSource, ScriptedSource};

    const PROBS: [f64; 3] = [0.90, 0.07, 0.03];

    #[test]
    fn advance_adds_rounded_delay_and_sets_severity() {
        let mut rng = ScriptedSource::new()
            .with_exponentials([12.4, 0.5, 2.5])
            .with_categoricals([1, 0, 2]);
        let mut clock = CohortEventClock::new(Cohort::Young, Some(90.0));
        assert_eq!(clock.pending_severity(), None);

        clock.advance(&PROBS, &mut rng);
        assert_eq!(clock.next_event_day(), Day(12));
        assert_eq!(clock.pending_severity(), Some(Severity::OutpatientProcedure));

        // 0.5 rounds to 0: a same-day follow-up event.
        clock.advance(&PROBS, &mut rng);
        assert_eq!(clock.next_event_day(), Day(12));
        assert_eq!(clock.pending_severity(), Some(Severity::ClinicalVisit));

        clock.advance(&PROBS, &mut rng);
        assert_eq!(clock.next_event_day(), Day(14));
        assert_eq!(clock.pending_severity(), Some(Severity::InpatientProcedure));

        assert_eq!(rng.requested_means, vec![90.0, 90.0, 90.0]);
    }

    #[test]
    fn every_scheduled_day_carries_a_severity() {
        let mut rng = ChaChaSource::new(21);
        let mut clock = CohortEventClock::new(Cohort::Young, Some(3.0));
        for _ in 0..500 {
            clock.advance(&PROBS, &mut rng);
            assert!(clock.next_event_day() != Day::NEVER);
            assert!(clock.pending_severity().is_some(), "day {:?}", clock.next_event_day());
        }
    }

    #[test]
    #[should_panic(expected = "out of 3 outcomes")]
    fn out_of_range_severity_draw_is_not_skipped() {
        let mut rng = ScriptedSource::new().with_exponentials([1.0]).with_categoricals([3]);
        CohortEventClock::new(Cohort::Old, Some(100.0)).advance(&PROBS, &mut rng);
    }

    #[test]
    fn empty_cohort_never_fires_and_draws_nothing() {
        let mut rng = ScriptedSource::new();
        let mut clock = CohortEventClock::new(Cohort::Pediatric, None);
        clock.advance(&PROBS, &mut rng);
        assert_eq!(clock.next_event_day(), Day::NEVER);
        assert_eq!(clock.pending_severity(), None);
        assert!(rng.requested_means.is_empty());
    }

    #[test]
    fn reset_returns_to_day_zero() {
        let mut rng = ChaChaSource::new(3);
        let mut clock = CohortEventClock::new(Cohort::Old, Some(100.0));
        for _ in 0..5 {
            clock.advance(&PROBS, &mut rng);
        }
        clock.reset();
        assert_eq!(clock.next_event_day(), Day(0));
        assert_eq!(clock.pending_severity(), None);
    }

    #[test]
    fn days_never_decrease() {
        let mut rng = ChaChaSource::new(11);
        let mut clock = CohortEventClock::new(Cohort::Pediatric, Some(2.5));
        let mut last = clock.next_event_day();
        for _ in 0..1_000 {
            clock.advance(&PROBS, &mut rng);
            assert!(clock.next_event_day() >= last);
            last = clock.next_event_day();
        }
    }
}
