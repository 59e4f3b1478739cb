use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Normal damage-ratio distribution shared by both scenario models.
/// Draws are clipped to [0, 1] before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRatio {
    pub mean: f64,
    pub std_dev: f64,
}

/// Primary policy and reinsurance terms, in currency units per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerTerms {
    pub deductible: f64,
    pub policy_limit: f64,
    pub reins_retention: f64,
    pub reins_limit: f64,
}

impl LayerTerms {
    /// True when some gross loss gives a reinsurer payout above the insured loss,
    /// i.e. a negative net loss for the insurer.
    pub fn allows_negative_net(&self) -> bool {
        self.reins_retention < self.deductible || self.reins_limit > self.policy_limit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub seed: u64,
    /// Number of simulated years; every loss series has this length.
    pub years: u32,
    pub portfolio_value: f64,
    pub damage_ratio: DamageRatio,
    /// Poisson λ: expected number of events per year in the multi-event model.
    pub annual_frequency: f64,
    pub layers: LayerTerms,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::canonical()
    }
}

impl SimulationParameters {
    pub fn canonical() -> Self {
        // ── Dashboard defaults ───────────────────────────────────────────────
        SimulationParameters {
            seed: 42,
            years: 10_000,
            portfolio_value: 1e9,
            damage_ratio: DamageRatio { mean: 0.02, std_dev: 0.05 },
            annual_frequency: 2.0,
            layers: LayerTerms {
                deductible: 10_000_000.0,
                policy_limit: 100_000_000.0,
                reins_retention: 100_000_000.0,
                reins_limit: 200_000_000.0,
            },
        }
    }

    /// Load from a JSON file. Fields missing from the file keep their canonical value.
    /// The result is not validated; call `validate` after applying any overrides.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reject parameters the pipeline cannot give a meaningful answer for.
    ///
    /// Limits below retentions are allowed; they only trigger a warning because
    /// the insurer's net loss can then go negative.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.years == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "years",
                value: 0.0,
                reason: "at least one simulated year is required",
            });
        }
        positive("portfolio_value", self.portfolio_value)?;
        finite("damage_ratio.mean", self.damage_ratio.mean)?;
        non_negative("damage_ratio.std_dev", self.damage_ratio.std_dev)?;
        non_negative("annual_frequency", self.annual_frequency)?;
        non_negative("deductible", self.layers.deductible)?;
        non_negative("policy_limit", self.layers.policy_limit)?;
        non_negative("reins_retention", self.layers.reins_retention)?;
        non_negative("reins_limit", self.layers.reins_limit)?;

        if self.layers.allows_negative_net() {
            warn!(
                "layer structure allows negative net loss: deductible={} policy_limit={} \
                 reins_retention={} reins_limit={}",
                self.layers.deductible,
                self.layers.policy_limit,
                self.layers.reins_retention,
                self.layers.reins_limit
            );
        }
        Ok(())
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::InvalidParameter { name, value, reason: "must be finite" })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), SimulationError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(SimulationError::InvalidParameter { name, value, reason: "must be non-negative" });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), SimulationError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(SimulationError::InvalidParameter { name, value, reason: "must be positive" });
    }
    Ok(())
}
