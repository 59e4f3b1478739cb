use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::analysis::MetricsReport;
use crate::config::SimulationParameters;
use crate::error::SimulationError;
use crate::layers::{self, LayeredLosses};
use crate::perils::ScenarioGenerator;
use crate::types::{LossSeries, Year, YearLoss};

/// Every series and the summary of one run. Nothing here is mutated after `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub single_event: LossSeries,
    /// Multi-event gross loss.
    pub gross: LossSeries,
    pub layered: LayeredLosses,
    pub report: MetricsReport,
}

impl SimulationResult {
    /// One record per simulated year, in year order.
    pub fn year_losses(&self) -> Vec<YearLoss> {
        (0..self.gross.len())
            .map(|i| YearLoss {
                year: Year(i as u32 + 1),
                single_event: self.single_event.as_slice()[i],
                gross: self.gross.as_slice()[i],
                insured: self.layered.insured.as_slice()[i],
                reinsurer_payout: self.layered.reinsurer_payout.as_slice()[i],
                net: self.layered.net.as_slice()[i],
            })
            .collect()
    }
}

/// Scenario generation → layering → summary, driven by one seeded rng.
pub struct Simulation {
    params: SimulationParameters,
    generator: ScenarioGenerator,
    rng: ChaCha20Rng,
}

impl Simulation {
    /// Validate `params` and seed the rng from `params.seed`.
    pub fn new(params: SimulationParameters) -> Result<Self, SimulationError> {
        params.validate()?;
        let generator = ScenarioGenerator::from_params(&params)?;
        let rng = ChaCha20Rng::seed_from_u64(params.seed);
        Ok(Simulation { params, generator, rng })
    }

    /// Run the full pipeline. Single-event draws come first, then the multi-event
    /// years, so the same seed always yields bit-identical series.
    ///
    /// Consumes the simulation: a second run needs a fresh `Simulation` (and so a reset rng).
    pub fn run(mut self) -> Result<SimulationResult, SimulationError> {
        let years = self.params.years;
        info!(
            "simulation start: seed={} years={} λ={} portfolio={}",
            self.params.seed, years, self.params.annual_frequency, self.params.portfolio_value
        );

        let single_event = self.generator.single_event_losses(years, &mut self.rng);
        let gross = self.generator.multi_event_losses(years, &mut self.rng);
        debug!(
            "scenarios drawn: single-event max={:?} multi-event max={:?}",
            single_event.max(),
            gross.max()
        );

        let layered = layers::apply_layers(&gross, &self.params.layers);
        let report = MetricsReport::new(&single_event, &gross, &layered.insured, &layered.net)?;

        info!(
            "simulation done: gross EAL={:.0} PML99={:.0}, net EAL={:.0} PML99={:.0}",
            report.gross.eal, report.gross.pml_99, report.net.eal, report.net.pml_99
        );

        Ok(SimulationResult { single_event, gross, layered, report })
    }
}

/// Validate, seed and run in one call.
pub fn simulate(params: SimulationParameters) -> Result<SimulationResult, SimulationError> {
    Simulation::new(params)?.run()
}

/// The `runs` consecutive seeds starting at `seed`.
/// Fails instead of wrapping when the last seed would pass `u64::MAX`.
pub fn batch_seeds(seed: u64, runs: u64) -> Result<Vec<u64>, SimulationError> {
    if runs == 0 {
        return Ok(Vec::new());
    }
    let last = seed.checked_add(runs - 1).ok_or(SimulationError::SeedOverflow { seed, runs })?;
    Ok((seed..=last).collect())
}

/// One report per seed in `batch_seeds(params.seed, runs)`, run in parallel, in seed order.
pub fn simulate_batch(
    params: &SimulationParameters,
    runs: u64,
) -> Result<Vec<MetricsReport>, SimulationError> {
    let seeds = batch_seeds(params.seed, runs)?;
    let reports = seeds
        .par_iter()
        .map(|&seed| simulate(SimulationParameters { seed, ..params.clone() }).map(|r| r.report))
        .collect::<Result<Vec<_>, _>>()?;
    info!("{} runs complete (first seed {})", reports.len(), params.seed);
    Ok(reports)
}
