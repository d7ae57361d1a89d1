use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Year(pub u32);

/// Simulation time in days within one simulated year (1 unit = 1 day).
/// Each year starts again at `Day(0)`; nothing carries across the boundary.
/// Time jumps directly from one care event to the next — there is no clock
/// ticking through the gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Day(pub u64);

impl Day {
    pub const DAYS_PER_YEAR: u64 = 365;

    /// Sentinel for a clock that never fires (a cohort with no members).
    pub const NEVER: Day = Day(u64::MAX);

    /// First day past the end of the year; events on or after it are dropped.
    pub const YEAR_END: Day = Day(Self::DAYS_PER_YEAR);

    /// Advance by a number of days, saturating at `Day::NEVER`.
    pub fn offset(self, days: u64) -> Self {
        Day(self.0.saturating_add(days))
    }

    pub fn within_year(self) -> bool {
        self < Self::YEAR_END
    }
}
