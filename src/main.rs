use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use league_analyzer::CellOrigin;
use league_analyzer::catalog::{self, MetricFamily};
use league_analyzer::config::AppConfig;
use league_analyzer::export::{self, RunSummary};
use league_analyzer::logging;
use league_analyzer::pipeline::aggregate;
use league_analyzer::source::{self, DataSource};
use league_analyzer::style;

const USAGE: &str = "usage: league_analyzer [--file PATH | --url URL | --synthetic] [--seed N] [--out DIR] [--xlsx] [-v|-q]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    file: Option<PathBuf>,
    url: Option<String>,
    synthetic: bool,
    seed: Option<u64>,
    out: Option<PathBuf>,
    xlsx: bool,
    verbose: u8,
    quiet: u8,
    help: bool,
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut cfg = AppConfig::from_env();
    logging::init_logging(logging::level_for(args.verbose, args.quiet));

    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(out) = args.out.clone() {
        cfg.out_dir = out;
    }
    if let Some(url) = args.url.clone() {
        cfg.data_url = url;
        cfg.data_file = None;
    }
    if let Some(file) = args.file.clone() {
        cfg.data_file = Some(file);
    }
    let data_source = if args.synthetic {
        DataSource::Synthetic { seed: cfg.seed }
    } else {
        cfg.source()
    };

    let loaded = source::load_with_fallback(&data_source, &cfg.fetch, cfg.seed);
    let aggregation = aggregate(&loaded.table, &cfg.options)
        .with_context(|| format!("failed to aggregate {}", loaded.source))?;
    let styles = style::classify(&aggregation.leagues);

    println!("League metrics");
    println!("Source: {}", loaded.source);
    if loaded.used_fallback {
        println!("Using synthetic sample data ({data_source} unavailable)");
    }
    println!(
        "Leagues: {} (dropped {})  Players: {}",
        aggregation.leagues.len(),
        aggregation.dropped.len(),
        aggregation.players.len()
    );
    for row in &aggregation.leagues.rows {
        println!(
            "  {}: players={} squads={} defaulted={}/{}",
            row.league,
            row.players,
            row.squads,
            row.defaulted_count(),
            row.cells.len()
        );
    }
    for family in MetricFamily::ALL {
        let computed = aggregation
            .leagues
            .rows
            .iter()
            .flat_map(|row| catalog::family_rules(family).filter_map(move |r| row.origin(r.name)))
            .filter(|o| *o == CellOrigin::Computed)
            .count();
        let total = catalog::family_rules(family).count() * aggregation.leagues.len();
        println!("  {:<14} computed {computed}/{total}", family.label());
    }
    for s in &styles {
        let labels = s
            .labels
            .iter()
            .map(|(axis, label)| format!("{axis}: {label}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {} -> {labels}", s.league);
    }

    let summary = RunSummary::new(&aggregation, &loaded.source.to_string(), loaded.used_fallback);
    let report = export::export_all(&cfg.out_dir, &aggregation, &styles, &summary, args.xlsx)?;
    for file in &report.files {
        println!("Wrote {}", file.display());
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f, Some(v.to_string())),
            _ => (arg, None),
        };
        let mut value = |name: &str| -> Result<String> {
            if let Some(v) = inline.clone() {
                return Ok(v);
            }
            idx += 1;
            args.get(idx)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{name} needs a value\n{USAGE}"))
        };
        match flag {
            "--file" => out.file = Some(PathBuf::from(value("--file")?)),
            "--url" => out.url = Some(value("--url")?),
            "--out" => out.out = Some(PathBuf::from(value("--out")?)),
            "--seed" => {
                let raw = value("--seed")?;
                out.seed = Some(raw.trim().parse::<u64>().with_context(|| format!("invalid seed {raw}"))?);
            }
            "--synthetic" => out.synthetic = true,
            "--xlsx" => out.xlsx = true,
            "-h" | "--help" => out.help = true,
            "-q" | "--quiet" => out.quiet = out.quiet.saturating_add(1),
            "--verbose" => out.verbose = out.verbose.saturating_add(1),
            other if other.len() > 1 && other.starts_with('-') && other[1..].chars().all(|c| c == 'v') => {
                out.verbose = out.verbose.saturating_add((other.len() - 1) as u8);
            }
            other => return Err(anyhow!("unknown argument {other}\n{USAGE}")),
        }
        idx += 1;
    }
    Ok(out)
}
