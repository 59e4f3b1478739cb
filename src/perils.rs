use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use serde::Serialize;

use crate::config::{DamageRatio, SimulationParameters};
use crate::error::SimulationError;
use crate::types::{LossSeries, Year};

/// Per-event damage ratio: Normal(mean, std_dev) clipped to [0, 1].
/// std_dev = 0 gives the same ratio on every draw.
#[derive(Debug, Clone)]
pub struct DamageRatioModel {
    normal: Normal<f64>,
}

impl DamageRatioModel {
    pub fn new(params: DamageRatio) -> Result<Self, SimulationError> {
        let normal = Normal::new(params.mean, params.std_dev).map_err(|_| {
            SimulationError::InvalidParameter {
                name: "damage_ratio.std_dev",
                value: params.std_dev,
                reason: "not a valid normal standard deviation",
            }
        })?;
        Ok(DamageRatioModel { normal })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        self.normal.sample(rng).clamp(0.0, 1.0)
    }
}

/// Annual event count, Poisson(λ).
/// λ = 0 means no events at all; `Poisson` itself rejects λ = 0, so no draw is taken.
#[derive(Debug, Clone)]
pub struct EventFrequency {
    poisson: Option<Poisson<f64>>,
}

impl EventFrequency {
    pub fn new(annual_frequency: f64) -> Result<Self, SimulationError> {
        if annual_frequency <= 0.0 {
            return Ok(EventFrequency { poisson: None });
        }
        let poisson = Poisson::new(annual_frequency).map_err(|_| {
            SimulationError::InvalidParameter {
                name: "annual_frequency",
                value: annual_frequency,
                reason: "not a valid Poisson rate",
            }
        })?;
        Ok(EventFrequency { poisson: Some(poisson) })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u64 {
        match &self.poisson {
            Some(poisson) => poisson.sample(rng) as u64,
            None => 0,
        }
    }
}

/// One event of the multi-event model, as written by the `event_catalog` binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub year: Year,
    /// 0-based index of the event within its year.
    pub event: u32,
    /// Clipped damage ratio.
    pub damage_ratio: f64,
    /// damage_ratio × portfolio value.
    pub loss: f64,
}

/// Draws annual portfolio losses under the single-event and multi-event models.
///
/// The generator holds no randomness of its own; every method advances the
/// caller's `rng`, so a reseeded rng replays the same losses.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    pub portfolio_value: f64,
    damage: DamageRatioModel,
    frequency: EventFrequency,
}

impl ScenarioGenerator {
    pub fn new(
        portfolio_value: f64,
        damage_ratio: DamageRatio,
        annual_frequency: f64,
    ) -> Result<Self, SimulationError> {
        Ok(ScenarioGenerator {
            portfolio_value,
            damage: DamageRatioModel::new(damage_ratio)?,
            frequency: EventFrequency::new(annual_frequency)?,
        })
    }

    pub fn from_params(params: &SimulationParameters) -> Result<Self, SimulationError> {
        Self::new(params.portfolio_value, params.damage_ratio, params.annual_frequency)
    }

    /// Single-event model: one clipped damage ratio per year × portfolio value.
    pub fn single_event_losses(&self, years: u32, rng: &mut impl Rng) -> LossSeries {
        (0..years).map(|_| self.damage.sample(rng) * self.portfolio_value).collect()
    }

    /// Clipped damage ratios of every event in one year of the multi-event model.
    /// Draws the event count first, then one ratio per event.
    pub fn sample_year_events(&self, rng: &mut impl Rng) -> Vec<f64> {
        let n = self.frequency.sample(rng);
        (0..n).map(|_| self.damage.sample(rng)).collect()
    }

    /// Multi-event model: per year, the sum of clipped event ratios × portfolio value.
    /// A year without events has zero loss.
    pub fn multi_event_losses(&self, years: u32, rng: &mut impl Rng) -> LossSeries {
        (0..years)
            .map(|_| {
                // fold from +0.0: an empty year must be 0.0, not the -0.0 of `Sum`
                let ratio = self.sample_year_events(rng).iter().fold(0.0_f64, |acc, r| acc + r);
                ratio * self.portfolio_value
            })
            .collect()
    }

    /// Per-event view of the multi-event model. Consumes the rng exactly like
    /// `multi_event_losses`, so summing `loss` by year reproduces that series.
    pub fn event_catalog(&self, years: u32, rng: &mut impl Rng) -> Vec<CatalogEntry> {
        let mut out = Vec::new();
        for y in 1..=years {
            for (i, ratio) in self.sample_year_events(rng).into_iter().enumerate() {
                out.push(CatalogEntry {
                    year: Year(y),
                    event: i as u32,
                    damage_ratio: ratio,
                    loss: ratio * self.portfolio_value,
                });
            }
        }
        out
    }
}
