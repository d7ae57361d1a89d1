use std::io::{self, BufWriter, Write};
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use carefund::analysis::{self, DistStats, RunDistribution};
use carefund::config::SimulationConfig;
use carefund::events::CareEvent;
use carefund::premium::{ComparisonReport, ReportSummary};
use carefund::simulation::{Simulation, run_replicates};

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    seed: Option<u64>,
    years: Option<u32>,
    runs: Option<u64>,
    json: bool,
    trace: bool,
    quiet: bool,
}

fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str, what: &str) -> Result<T> {
    let raw = args.get(i).with_context(|| format!("{flag} requires {what}"))?;
    raw.parse().map_err(|_| anyhow::anyhow!("{flag} requires {what}, got '{raw}'"))
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                cli.seed = Some(parse_value(args, i, "--seed", "a u64")?);
            }
            "--years" => {
                i += 1;
                cli.years = Some(parse_value(args, i, "--years", "a positive integer")?);
            }
            "--runs" => {
                i += 1;
                let runs: u64 = parse_value(args, i, "--runs", "a positive integer")?;
                if runs == 0 {
                    bail!("--runs requires a positive integer, got '0'");
                }
                cli.runs = Some(runs);
            }
            "--json" => cli.json = true,
            "--trace" => cli.trace = true,
            "--quiet" => cli.quiet = true,
            other => bail!("unknown argument '{other}'"),
        }
        i += 1;
    }
    if cli.trace && cli.runs.is_some() {
        bail!("--trace streams a single run; drop --runs");
    }
    if cli.trace && cli.json {
        bail!("--trace owns stdout as NDJSON; drop --json");
    }
    Ok(cli)
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let mut config = SimulationConfig::canonical();
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(years) = cli.years {
        config.years = years;
    }

    if let Some(n) = cli.runs {
        let reports = run_replicates(&config, n).context("invalid configuration")?;
        let dist = analysis::summarise_runs(&reports);
        if cli.json {
            let summaries: Vec<ReportSummary> = reports.iter().map(|r| r.summary()).collect();
            let value = serde_json::json!({ "runs": summaries, "distribution": dist });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else if !cli.quiet {
            print_runs(&reports, config.seed);
            match dist {
                Some(d) => print_distribution(&d),
                None => eprintln!("Warning: Distribution requires >= 2 runs"),
            }
        }
        return Ok(());
    }

    let mut sim = Simulation::from_config(config);

    if cli.trace {
        // Each year's events are written as soon as that year finishes.
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        let mut write_error: Option<io::Error> = None;
        let report = sim
            .run_with_trace(|events| {
                if write_error.is_none() {
                    write_error = write_ndjson(&mut writer, events).err();
                }
            })
            .context("invalid configuration")?;
        if let Some(e) = write_error {
            return Err(e.into());
        }
        writer.flush()?;

        // The NDJSON trace owns stdout; the report moves to stderr.
        if !cli.quiet {
            print_report(&mut io::stderr().lock(), &report)?;
        }
        return Ok(());
    }

    let report = sim.run().context("invalid configuration")?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else if !cli.quiet {
        print_report(&mut io::stdout().lock(), &report)?;
    }

    Ok(())
}

fn write_ndjson(out: &mut impl Write, events: &[CareEvent]) -> io::Result<()> {
    for e in events {
        serde_json::to_writer(&mut *out, e)?;
        writeln!(out)?;
    }
    Ok(())
}

fn print_report(out: &mut impl Write, report: &ComparisonReport) -> io::Result<()> {
    let s = report.summary();
    writeln!(out, "Number of children: {}", s.population.children)?;
    writeln!(out, "Number of young adults: {}", s.population.young)?;
    writeln!(out, "Number of old adults: {}", s.population.old)?;
    writeln!(out)?;
    writeln!(out, "=== Premium comparison ({} years) ===", s.years)?;
    writeln!(out, "  Average traditional premium per year:    {:>14.2}", s.average_traditional_premium)?;
    writeln!(out, "  Average smart contract premium per year: {:>14.2}", s.average_smart_premium)?;
    match s.savings_pct {
        Some(pct) => writeln!(out, "  Smart contract savings:                  {pct:>13.2}%")?,
        None => writeln!(out, "  Smart contract savings:                  {:>14}", "n/a")?,
    }
    writeln!(out)?;
    writeln!(out, "=== Mean annual cost by cohort ===")?;
    writeln!(out, "  {:<10} | {:>8} | {:>14}", "Cohort", "Members", "Cost/year")?;
    writeln!(out, "  {}", "-".repeat(38))?;
    for (name, members, cost) in [
        ("Pediatric", s.population.children, s.mean_pediatric_cost),
        ("Young", s.population.young, s.mean_young_cost),
        ("Old", s.population.old, s.mean_old_cost),
    ] {
        writeln!(out, "  {name:<10} | {members:>8} | {cost:>14.2}")?;
    }
    Ok(())
}

fn print_runs(reports: &[ComparisonReport], start_seed: u64) {
    println!("=== Per-Run Results ===");
    println!(
        "{:>6} | {:>8} | {:>6} | {:>4} | {:>14} | {:>14} | {:>9}",
        "Seed", "Children", "Young", "Old", "AvgTrad", "AvgSmart", "Savings%"
    );
    println!("{}", "-".repeat(80));
    for (i, r) in reports.iter().enumerate() {
        let savings = r.savings_pct().map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}"));
        println!(
            "{:>6} | {:>8} | {:>6} | {:>4} | {:>14.2} | {:>14.2} | {:>9}",
            start_seed.wrapping_add(i as u64),
            r.population.children,
            r.population.young,
            r.population.old,
            r.average_traditional_premium(),
            r.average_smart_premium(),
            savings,
        );
    }
}

fn print_dist_row(name: &str, ds: &DistStats) {
    println!(
        "{:<9} | {:>12.2} | {:>12.2} | {:>12.2} | {:>12.2} | {:>12.2} | {:>12.2} | {:>12.2} | {:>12.2}",
        name, ds.min, ds.p5, ds.p25, ds.p50, ds.p75, ds.p95, ds.max, ds.std_dev
    );
}

fn print_distribution(dist: &RunDistribution) {
    println!("\n=== Multi-Run Distribution (N={} runs) ===", dist.runs);
    println!(
        "{:<9} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12} | {:>12}",
        "Metric", "min", "p5", "p25", "p50", "p75", "p95", "max", "stddev"
    );
    print_dist_row("AvgTrad", &dist.average_traditional_premium);
    print_dist_row("AvgSmart", &dist.average_smart_premium);
    match &dist.savings_pct {
        Some(ds) => print_dist_row("Savings%", ds),
        None => println!("{:<9} | n/a", "Savings%"),
    }
    if dist.undefined_savings > 0 {
        println!("  ({} run(s) with undefined savings excluded)", dist.undefined_savings);
    }
}
