use serde::{Deserialize, Serialize};

/// Simulated year, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Year(pub u32);

/// One simulated year's aggregate loss per year, in simulation order.
///
/// A series is never mutated after creation. Derived series (insured, net, ...)
/// come from `map` / `zip_with`, which always yield a new series of the same length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LossSeries(Vec<f64>);

impl LossSeries {
    pub fn new(values: Vec<f64>) -> Self {
        LossSeries(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Element-wise transform.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        LossSeries(self.0.iter().map(|&x| f(x)).collect())
    }

    /// Element-wise combination of two series of equal length.
    ///
    /// Panics if the lengths differ; every series of a run shares the run's year count.
    pub fn zip_with(&self, other: &LossSeries, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(self.len(), other.len(), "loss series length mismatch");
        LossSeries(self.0.iter().zip(other.0.iter()).map(|(&a, &b)| f(a, b)).collect())
    }

    pub fn max(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::max)
    }
}

impl FromIterator<f64> for LossSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        LossSeries(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LossSeries {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// All losses of one simulated year, one NDJSON line in the year-loss log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearLoss {
    pub year: Year,
    /// Gross loss under the single-event model.
    pub single_event: f64,
    /// Gross loss under the multi-event model. Layering applies to this one.
    pub gross: f64,
    pub insured: f64,
    pub reinsurer_payout: f64,
    /// insured − reinsurer_payout; can be negative.
    pub net: f64,
}
