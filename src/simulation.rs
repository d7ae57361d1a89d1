use crate::config::SimulationConfig;
use crate::error::SimResult;
use crate::events::CareEvent;
use crate::population::PopulationCounts;
use crate::premium::{ComparisonReport, PremiumComparator};
use crate::random::ChaChaSource;

/// One complete run: a seeded random stream, a population sized from it, and
/// the multi-year premium comparison.
pub struct Simulation {
    rng: ChaChaSource,
    config: SimulationConfig,
}

impl Simulation {
    /// Construct from a config. The random stream is seeded from `config.seed`.
    pub fn from_config(config: SimulationConfig) -> Self {
        Simulation { rng: ChaChaSource::new(config.seed), config }
    }

    /// Validate the config, size the population, then compare premiums for
    /// `config.years` years. Nothing is drawn if validation fails.
    pub fn run(&mut self) -> SimResult<ComparisonReport> {
        let population = self.prepare()?;
        PremiumComparator::new(&self.config).run(self.config.years, population, &mut self.rng)
    }

    /// `run`, streaming each year's care events to `on_events` as the year ends.
    pub fn run_with_trace(&mut self, on_events: impl FnMut(&[CareEvent])) -> SimResult<ComparisonReport> {
        let population = self.prepare()?;
        PremiumComparator::new(&self.config).run_with_trace(
            self.config.years,
            population,
            &mut self.rng,
            on_events,
        )
    }

    fn prepare(&mut self) -> SimResult<PopulationCounts> {
        self.config.validate()?;
        log::info!("run seed {}: {} years", self.config.seed, self.config.years);
        Ok(PopulationCounts::initialize(&self.config.population, &mut self.rng))
    }
}

/// Run `runs` independent replicates one after another, seeded
/// `config.seed`, `config.seed + 1`, ….
pub fn run_replicates(config: &SimulationConfig, runs: u64) -> SimResult<Vec<ComparisonReport>> {
    config.validate()?;
    (0..runs)
        .map(|i| {
            let mut c = config.clone();
            c.seed = config.seed.wrapping_add(i);
            Simulation::from_config(c).run()
        })
        .collect()
}
