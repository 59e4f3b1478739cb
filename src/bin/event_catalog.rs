use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufWriter, Write};
use std::process;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use catloss::config::SimulationParameters;
use catloss::perils::ScenarioGenerator;

fn main() {
    env_logger::init();
    let params = SimulationParameters::canonical();

    let n_years: u32 = env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(params.years);

    let generator = match ScenarioGenerator::from_params(&params) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let mut rng = ChaCha20Rng::seed_from_u64(params.seed);
    let entries = generator.event_catalog(n_years, &mut rng);

    // NDJSON to stdout.
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for entry in &entries {
        let written = serde_json::to_writer(&mut out, entry)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(out));
        if let Err(e) = written {
            eprintln!("error: failed to write catalog: {e}");
            process::exit(1);
        }
    }
    if let Err(e) = out.flush() {
        eprintln!("error: failed to write catalog: {e}");
        process::exit(1);
    }

    // Event-count histogram to stderr.
    let mut per_year = vec![0u32; n_years as usize];
    for e in &entries {
        per_year[e.year.0 as usize - 1] += 1;
    }
    let mut count_hist: BTreeMap<u32, u32> = BTreeMap::new();
    for &c in &per_year {
        *count_hist.entry(c).or_insert(0) += 1;
    }

    let mean_df = if entries.is_empty() {
        0.0
    } else {
        entries.iter().map(|e| e.damage_ratio).sum::<f64>() / entries.len() as f64
    };
    let max_df = entries.iter().map(|e| e.damage_ratio).fold(0.0, f64::max);
    eprintln!(
        "event_catalog: {} years, {} events (expected ~{:.1}), mean_df={mean_df:.4} max_df={max_df:.4}",
        n_years,
        entries.len(),
        params.annual_frequency * n_years as f64
    );
    for (count, years) in count_hist {
        eprintln!("  events/year={count:>3}  years={years:>6}");
    }
}
