use catloss::config::{DamageRatio, LayerTerms, SimulationParameters};
use catloss::perils::ScenarioGenerator;
use catloss::types::LossSeries;

pub struct Scenario {
    pub years: u32,
    pub annual_frequency: f64,
}

pub const SMALL: Scenario = Scenario { years: 1_000, annual_frequency: 2.0 };

pub const MEDIUM: Scenario = Scenario { years: 10_000, annual_frequency: 2.0 };

pub const LARGE: Scenario = Scenario { years: 100_000, annual_frequency: 5.0 };

pub fn params(scenario: &Scenario, seed: u64) -> SimulationParameters {
    SimulationParameters {
        seed,
        years: scenario.years,
        annual_frequency: scenario.annual_frequency,
        ..SimulationParameters::canonical()
    }
}

pub fn generator(annual_frequency: f64) -> ScenarioGenerator {
    ScenarioGenerator::new(1e9, DamageRatio { mean: 0.02, std_dev: 0.05 }, annual_frequency)
        .expect("valid benchmark generator")
}

pub fn terms() -> LayerTerms {
    SimulationParameters::canonical().layers
}

/// Deterministic gross series spanning zero, sub-deductible, in-layer and above-limit years.
pub fn gross_series(years: usize) -> LossSeries {
    (0..years).map(|i| (i % 400) as f64 * 1_000_000.0).collect()
}
