//! Re-summarise a year-loss log written by `catloss --output`.
//!
//! Reads NDJSON `YearLoss` records (default `losses.ndjson`), prints the
//! metrics table, then a few checks on the layered series.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    process,
};

use catloss::{
    analysis::{self, MetricsReport},
    types::YearLoss,
};

fn main() {
    env_logger::init();

    // ── Resolve path: first positional arg, else default ────────────────────
    let path = std::env::args().nth(1).unwrap_or_else(|| "losses.ndjson".to_string());

    let file = File::open(&path).unwrap_or_else(|e| {
        eprintln!("error: cannot open {path}: {e}");
        eprintln!("Run `cargo run --release -- --output {path}` first to generate the log.");
        process::exit(1);
    });

    let mut years: Vec<YearLoss> = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.unwrap_or_else(|e| {
            eprintln!("error reading line {}: {}", line_no + 1, e);
            process::exit(1);
        });
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<YearLoss>(&line) {
            Ok(rec) => years.push(rec),
            Err(e) => {
                eprintln!("error: failed to deserialize line {}: {}", line_no + 1, e);
                eprintln!("  line: {line}");
                process::exit(1);
            }
        }
    }

    let report = match MetricsReport::from_year_losses(&years) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {path}: {e}");
            process::exit(1);
        }
    };

    println!("=== Loss Metrics ({} years) ===", years.len());
    print!("{}", analysis::render_table(&report));

    // ── Checks ───────────────────────────────────────────────────────────────
    let status = |ok: bool| if ok { "PASS" } else { "FAIL" };
    let gross_non_negative = years.iter().all(|y| y.gross >= 0.0 && y.single_event >= 0.0);
    let insured_non_negative = years.iter().all(|y| y.insured >= 0.0);
    let net_consistent = years.iter().all(|y| y.net == y.insured - y.reinsurer_payout);
    let insured_below_gross = years.iter().all(|y| y.insured <= y.gross);
    let negative_net_years = years.iter().filter(|y| y.net < 0.0).count();

    println!("\n=== Checks ===");
    println!("  gross >= 0                        {}", status(gross_non_negative));
    println!("  insured >= 0                      {}", status(insured_non_negative));
    println!("  insured <= gross                  {}", status(insured_below_gross));
    println!("  net == insured - payout           {}", status(net_consistent));
    println!("  years with negative net loss      {negative_net_years}");
}
