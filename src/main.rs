use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::info;

use catloss::analysis::{self, RowDist};
use catloss::config::SimulationParameters;
use catloss::error::SimulationError;
use catloss::simulation::{self, SimulationResult};

#[derive(Parser, Debug)]
#[command(
    name = "catloss",
    about = "Monte Carlo catastrophe loss model: EAL and PML before and after insurance and reinsurance"
)]
struct Cli {
    #[arg(long, help = "JSON parameter file; flags below override its values")]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, help = "Number of simulated years")]
    years: Option<u32>,
    #[arg(long)]
    portfolio_value: Option<f64>,
    #[arg(long)]
    mean_damage_ratio: Option<f64>,
    #[arg(long)]
    std_damage_ratio: Option<f64>,
    #[arg(long, help = "Average events per year (Poisson λ)")]
    lambda: Option<f64>,
    #[arg(long)]
    deductible: Option<f64>,
    #[arg(long)]
    policy_limit: Option<f64>,
    #[arg(long)]
    reins_retention: Option<f64>,
    #[arg(long)]
    reins_limit: Option<f64>,
    #[arg(
        long,
        conflicts_with = "runs",
        help = "Write one NDJSON line per simulated year to this file (single run only)"
    )]
    output: Option<PathBuf>,
    #[arg(long, help = "Repeat the run under N consecutive seeds and report the spread")]
    runs: Option<u64>,
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn parameters(&self) -> Result<SimulationParameters, SimulationError> {
        let mut p = match &self.config {
            Some(path) => SimulationParameters::from_json_file(path)?,
            None => SimulationParameters::canonical(),
        };
        if let Some(v) = self.seed {
            p.seed = v;
        }
        if let Some(v) = self.years {
            p.years = v;
        }
        if let Some(v) = self.portfolio_value {
            p.portfolio_value = v;
        }
        if let Some(v) = self.mean_damage_ratio {
            p.damage_ratio.mean = v;
        }
        if let Some(v) = self.std_damage_ratio {
            p.damage_ratio.std_dev = v;
        }
        if let Some(v) = self.lambda {
            p.annual_frequency = v;
        }
        if let Some(v) = self.deductible {
            p.layers.deductible = v;
        }
        if let Some(v) = self.policy_limit {
            p.layers.policy_limit = v;
        }
        if let Some(v) = self.reins_retention {
            p.layers.reins_retention = v;
        }
        if let Some(v) = self.reins_limit {
            p.layers.reins_limit = v;
        }
        Ok(p)
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), SimulationError> {
    let params = cli.parameters()?;

    if let Some(n) = cli.runs {
        let seeds = simulation::batch_seeds(params.seed, n)?;
        let reports = simulation::simulate_batch(&params, n)?;

        if !cli.quiet {
            for (seed, report) in seeds.iter().zip(&reports) {
                println!("── Seed {seed} ──");
                print!("{}", analysis::render_table(report));
            }
            if n < 2 {
                eprintln!("Warning: Distribution requires >= 2 runs");
            } else {
                print_distributions(&analysis::analyse_distributions(&reports), n);
            }
        }
        return Ok(());
    }

    let result = simulation::simulate(params)?;

    if let Some(path) = &cli.output {
        write_year_losses(&result, path)?;
        info!("wrote {} years to {}", result.gross.len(), path.display());
    }

    if !cli.quiet {
        print!("{}", analysis::render_table(&result.report));
        let single = result.report.single_event;
        println!(
            "\nSingle-event model: EAL {}  95% PML {}  99% PML {}",
            analysis::format_amount(single.eal),
            analysis::format_amount(single.pml_95),
            analysis::format_amount(single.pml_99)
        );
    }
    Ok(())
}

fn write_year_losses(result: &SimulationResult, path: &Path) -> Result<(), SimulationError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for rec in result.year_losses() {
        serde_json::to_writer(&mut writer, &rec)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_distributions(dists: &[RowDist], n: u64) {
    println!("\n=== Distribution across {n} runs ===");
    println!(
        "{:<20} {:<8} {:>18} {:>18} {:>18} {:>18}",
        "", "metric", "p5", "p50", "p95", "std dev"
    );
    for d in dists {
        for (metric, s) in [("EAL", &d.eal), ("PML95", &d.pml_95), ("PML99", &d.pml_99)] {
            println!(
                "{:<20} {:<8} {:>18} {:>18} {:>18} {:>18}",
                d.label,
                metric,
                analysis::format_amount(s.p5),
                analysis::format_amount(s.p50),
                analysis::format_amount(s.p95),
                analysis::format_amount(s.std_dev)
            );
        }
    }
}
