//! Monte Carlo catastrophe loss model: simulated annual losses for a property
//! portfolio, a primary policy and reinsurance layer applied on top, and
//! EAL / PML summaries of each perspective.

pub mod analysis;
pub mod config;
pub mod error;
pub mod layers;
pub mod perils;
pub mod simulation;
pub mod types;
