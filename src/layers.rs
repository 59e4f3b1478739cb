//! Primary insurance and reinsurance applied to gross annual losses.
//!
//! Every function here is element-wise: year `i` of an output series depends
//! only on year `i` of the gross series and the layer terms.

use log::debug;

use crate::config::LayerTerms;
use crate::types::LossSeries;

/// Loss paid by the primary insurer: the part above the deductible, capped at the policy limit.
pub fn insured_loss(gross: f64, terms: &LayerTerms) -> f64 {
    (gross - terms.deductible).max(0.0).min(terms.policy_limit)
}

/// Reinsurer's share: the part of the gross loss above the retention, capped at the reinsurance limit.
///
/// The retention applies to the gross loss, not the insured loss.
pub fn reinsurer_payout(gross: f64, terms: &LayerTerms) -> f64 {
    // max/min rather than clamp: clamp panics on a negative or NaN limit.
    (gross - terms.reins_retention).max(0.0).min(terms.reins_limit)
}

/// Insurer's loss after reinsurance recoveries. Not floored at zero: when the
/// reinsurance layer sits outside the primary layer the payout can exceed the insured loss.
pub fn net_loss(insured: f64, payout: f64) -> f64 {
    insured - payout
}

/// The three derived series of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredLosses {
    pub insured: LossSeries,
    pub reinsurer_payout: LossSeries,
    pub net: LossSeries,
}

/// Apply `terms` to every year of `gross`.
///
/// Limits are expected to be non-negative (see `SimulationParameters::validate`).
pub fn apply_layers(gross: &LossSeries, terms: &LayerTerms) -> LayeredLosses {
    let insured = gross.map(|g| insured_loss(g, terms));
    let payout = gross.map(|g| reinsurer_payout(g, terms));
    let net = insured.zip_with(&payout, net_loss);

    debug!(
        "layers applied: {} years, {} years hit the policy, {} years hit reinsurance",
        gross.len(),
        insured.iter().filter(|&&x| x > 0.0).count(),
        payout.iter().filter(|&&x| x > 0.0).count()
    );

    LayeredLosses { insured, reinsurer_payout: payout, net }
}
