use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::types::{LossSeries, YearLoss};

/// EAL and PML of one loss series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossMetrics {
    /// Expected Annual Loss: arithmetic mean of the series.
    pub eal: f64,
    /// 95th percentile (1-in-20-year loss).
    pub pml_95: f64,
    /// 99th percentile (1-in-100-year loss).
    pub pml_99: f64,
}

impl LossMetrics {
    pub fn from_losses(losses: &[f64]) -> Result<Self, SimulationError> {
        if losses.is_empty() {
            return Err(SimulationError::EmptySeries);
        }
        let mut sorted = losses.to_vec();
        sorted.sort_by(f64::total_cmp);
        Ok(LossMetrics {
            eal: mean(losses),
            pml_95: percentile_sorted(&sorted, 0.95),
            pml_99: percentile_sorted(&sorted, 0.99),
        })
    }

    pub fn from_series(series: &LossSeries) -> Result<Self, SimulationError> {
        Self::from_losses(series.as_slice())
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear interpolation between closest ranks: h = p·(n−1).
/// `sorted` must be non-empty and ascending.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let h = p * (n - 1) as f64;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let t = h - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    let diff = b - a;
    // Interpolate from the nearer rank so the result stays monotone in p.
    let value = if t >= 0.5 { b - diff * (1.0 - t) } else { a + diff * t };
    value.clamp(a, b)
}

/// Summary of one simulation run, one row per loss perspective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Multi-event gross loss.
    pub gross: LossMetrics,
    /// After the primary policy.
    pub insured: LossMetrics,
    /// Insurer net of reinsurance recoveries.
    pub net: LossMetrics,
    /// Single-event gross loss, for comparison with the multi-event model.
    pub single_event: LossMetrics,
}

impl MetricsReport {
    pub const GROSS: &'static str = "Gross Loss";
    pub const INSURED: &'static str = "After Insurance";
    pub const NET: &'static str = "After Reinsurance";

    pub fn new(
        single_event: &LossSeries,
        gross: &LossSeries,
        insured: &LossSeries,
        net: &LossSeries,
    ) -> Result<Self, SimulationError> {
        Ok(MetricsReport {
            gross: LossMetrics::from_series(gross)?,
            insured: LossMetrics::from_series(insured)?,
            net: LossMetrics::from_series(net)?,
            single_event: LossMetrics::from_series(single_event)?,
        })
    }

    /// Rebuild a report from a year-loss log.
    pub fn from_year_losses(years: &[YearLoss]) -> Result<Self, SimulationError> {
        let column = |f: fn(&YearLoss) -> f64| years.iter().map(f).collect::<LossSeries>();
        Self::new(
            &column(|y| y.single_event),
            &column(|y| y.gross),
            &column(|y| y.insured),
            &column(|y| y.net),
        )
    }

    /// Labelled rows in display order.
    pub fn rows(&self) -> [(&'static str, LossMetrics); 3] {
        [(Self::GROSS, self.gross), (Self::INSURED, self.insured), (Self::NET, self.net)]
    }
}

/// Distribution statistics for one metric across N simulation runs.
#[derive(Debug, Clone)]
pub struct DistStats {
    pub n: usize,
    pub min: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

fn dist_stats(values: &mut [f64]) -> Option<DistStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = mean(values);
    let variance = if n > 1 {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };

    Some(DistStats {
        n,
        min: values[0],
        p5: percentile_sorted(values, 0.05),
        p50: percentile_sorted(values, 0.50),
        p95: percentile_sorted(values, 0.95),
        max: values[n - 1],
        mean,
        std_dev: variance.sqrt(),
    })
}

/// Cross-run distribution of one report row.
#[derive(Debug, Clone)]
pub struct RowDist {
    pub label: &'static str,
    pub eal: DistStats,
    pub pml_95: DistStats,
    pub pml_99: DistStats,
}

/// Summarise how each metric of each row varies across runs (e.g. consecutive seeds).
///
/// Returns an empty Vec for fewer than 2 runs: a single run has no spread to report.
pub fn analyse_distributions(reports: &[MetricsReport]) -> Vec<RowDist> {
    if reports.len() < 2 {
        return Vec::new();
    }

    let mut result = Vec::new();
    for row in 0..3 {
        let metrics: Vec<(&'static str, LossMetrics)> =
            reports.iter().map(|r| r.rows()[row]).collect();
        let label = metrics[0].0;

        let mut eal: Vec<f64> = metrics.iter().map(|(_, m)| m.eal).collect();
        let mut p95: Vec<f64> = metrics.iter().map(|(_, m)| m.pml_95).collect();
        let mut p99: Vec<f64> = metrics.iter().map(|(_, m)| m.pml_99).collect();

        if let (Some(eal), Some(pml_95), Some(pml_99)) =
            (dist_stats(&mut eal), dist_stats(&mut p95), dist_stats(&mut p99))
        {
            result.push(RowDist { label, eal, pml_95, pml_99 });
        }
    }
    result
}

/// Round to whole currency units and group thousands: `1234567.6` → `"1,234,568"`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Plain-text metrics table, one row per loss perspective.
pub fn render_table(report: &MetricsReport) -> String {
    let mut out = format!(
        "{:<20} {:>26} {:>20} {:>20}\n",
        "", "Expected Annual Loss", "95% PML", "99% PML"
    );
    for (label, m) in report.rows() {
        out.push_str(&format!(
            "{:<20} {:>26} {:>20} {:>20}\n",
            label,
            format_amount(m.eal),
            format_amount(m.pml_95),
            format_amount(m.pml_99)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::types::Year;

    fn metrics(eal: f64) -> LossMetrics {
        LossMetrics { eal, pml_95: eal * 2.0, pml_99: eal * 3.0 }
    }

    fn report(eal: f64) -> MetricsReport {
        MetricsReport {
            gross: metrics(eal),
            insured: metrics(eal / 2.0),
            net: metrics(eal / 4.0),
            single_event: metrics(eal),
        }
    }

    #[test]
    fn empty_series_is_an_error() {
        assert!(matches!(LossMetrics::from_losses(&[]), Err(SimulationError::EmptySeries)));
    }

    #[test]
    fn single_value_series() {
        let m = LossMetrics::from_losses(&[42.0]).unwrap();
        assert_eq!(m, LossMetrics { eal: 42.0, pml_95: 42.0, pml_99: 42.0 });
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        // 0..=100: percentile p is exactly 100·p.
        let values: Vec<f64> = (0..=100u32).map(f64::from).collect();
        let m = LossMetrics::from_losses(&values).unwrap();
        assert_relative_eq!(m.eal, 50.0);
        assert_relative_eq!(m.pml_95, 95.0);
        assert_relative_eq!(m.pml_99, 99.0);
    }

    #[test]
    fn percentile_between_ranks() {
        // n=4: h = 0.95·3 = 2.85 → 30 + 0.85·(40 − 30) = 38.5
        let m = LossMetrics::from_losses(&[40.0, 10.0, 30.0, 20.0]).unwrap();
        assert_relative_eq!(m.pml_95, 38.5, epsilon = 1e-9);
        assert_relative_eq!(m.pml_99, 39.7, epsilon = 1e-9);
        assert_relative_eq!(m.eal, 25.0);
    }

    #[test]
    fn percentile_bounds() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(percentile_sorted(&values, 0.0), 1.0);
        assert_eq!(percentile_sorted(&values, 1.0), 3.0);
        assert_eq!(percentile_sorted(&values, 0.5), 2.0);
    }

    #[test]
    fn negative_net_values_are_summarised_as_is() {
        let m = LossMetrics::from_losses(&[-100.0, 0.0, 50.0]).unwrap();
        assert_relative_eq!(m.eal, -50.0 / 3.0);
    }

    #[test]
    fn rows_are_in_display_order() {
        let r = report(8.0);
        let rows = r.rows();
        assert_eq!(rows[0].0, "Gross Loss");
        assert_eq!(rows[1].0, "After Insurance");
        assert_eq!(rows[2].0, "After Reinsurance");
        assert_eq!(rows[2].1, r.net);
    }

    #[test]
    fn report_from_year_losses_matches_columns() {
        let years: Vec<YearLoss> = (1..=10)
            .map(|y| YearLoss {
                year: Year(y),
                single_event: y as f64,
                gross: 10.0 * y as f64,
                insured: 5.0 * y as f64,
                reinsurer_payout: y as f64,
                net: 4.0 * y as f64,
            })
            .collect();
        let r = MetricsReport::from_year_losses(&years).unwrap();
        assert_relative_eq!(r.gross.eal, 55.0);
        assert_relative_eq!(r.insured.eal, 27.5);
        assert_relative_eq!(r.net.eal, 22.0);
        assert_relative_eq!(r.single_event.eal, 5.5);
    }

    #[test]
    fn report_from_empty_log_is_an_error() {
        assert!(MetricsReport::from_year_losses(&[]).is_err());
    }

    #[test]
    fn distributions_need_two_runs() {
        assert!(analyse_distributions(&[]).is_empty());
        assert!(analyse_distributions(&[report(1.0)]).is_empty());
    }

    #[test]
    fn distributions_summarise_each_row() {
        let reports: Vec<MetricsReport> = (1..=5).map(|i| report(i as f64 * 10.0)).collect();
        let dists = analyse_distributions(&reports);
        assert_eq!(dists.len(), 3);
        assert_eq!(dists[0].label, "Gross Loss");
        assert_eq!(dists[0].eal.n, 5);
        assert_relative_eq!(dists[0].eal.min, 10.0);
        assert_relative_eq!(dists[0].eal.max, 50.0);
        assert_relative_eq!(dists[0].eal.mean, 30.0);
        assert_relative_eq!(dists[0].eal.p50, 30.0);
        assert_relative_eq!(dists[1].eal.mean, 15.0);
        assert_relative_eq!(dists[2].pml_99.max, 50.0 / 4.0 * 3.0);
        // sample std of 10,20,30,40,50
        assert_relative_eq!(dists[0].eal.std_dev, 250.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn amounts_are_rounded_and_grouped() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.4), "999");
        assert_eq!(format_amount(1_000.0), "1,000");
        assert_eq!(format_amount(1_234_567.6), "1,234,568");
        assert_eq!(format_amount(-100_000_000.0), "-100,000,000");
        assert_eq!(format_amount(-0.2), "0");
    }

    #[test]
    fn table_has_header_and_three_rows() {
        let table = render_table(&report(1_000_000.0));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Expected Annual Loss"));
        assert!(lines[1].starts_with("Gross Loss"));
        assert!(lines[1].contains("1,000,000"));
        assert!(lines[3].starts_with("After Reinsurance"));
        assert!(lines[3].contains("250,000"));
    }

    proptest! {
        #[test]
        fn mean_is_arithmetic_average(values in prop::collection::vec(-1e9f64..1e9, 1..500)) {
            let m = LossMetrics::from_losses(&values).unwrap();
            let expected = values.iter().sum::<f64>() / values.len() as f64;
            prop_assert!((m.eal - expected).abs() <= 1e-6 * expected.abs().max(1.0));
        }

        #[test]
        fn pml_99_never_below_pml_95(values in prop::collection::vec(0.0f64..1e10, 1..500)) {
            let m = LossMetrics::from_losses(&values).unwrap();
            prop_assert!(m.pml_99 >= m.pml_95);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m.pml_95 >= min && m.pml_99 <= max);
        }
    }
}
