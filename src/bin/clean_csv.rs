use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use oe_dataset::{CleanOptions, Granularity, PairingMode, clean, ingest};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let granularity = Granularity::from_str(&arg_value("--split").unwrap_or_default())
        .context("pass --split team or --split player")?;

    let mut options = load_options()?;
    if has_flag("--legacy") {
        options.pairing = PairingMode::LegacyCursor;
    }

    let raw = if let Some(input) = arg_value("--input") {
        ingest::load_csv(&PathBuf::from(input))?
    } else {
        let dir = arg_value("--data-dir")
            .or_else(|| std::env::var("OE_DATA_DIR").ok())
            .context("pass --input, or --data-dir / OE_DATA_DIR with --years")?;
        let years = parse_years(&arg_value("--years").unwrap_or_default())?;
        ingest::load_years(&PathBuf::from(dir), &years)?
    };
    let rows_in = raw.n_rows();

    let cleaned = clean(raw, granularity, &options)?;

    let output = arg_value("--output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("cleaned_{}.csv", granularity.as_str())));
    ingest::write_csv(&output, &cleaned)?;

    println!("Clean complete");
    println!("Granularity: {}", granularity.as_str());
    println!("Rows: {} -> {}", rows_in, cleaned.n_rows());
    println!(
        "Games: {}",
        cleaned.n_rows() / granularity.rows_per_game().max(1)
    );
    println!("Output: {}", output.display());
    Ok(())
}

fn load_options() -> Result<CleanOptions> {
    let Some(path) = arg_value("--options") else {
        return Ok(CleanOptions::default());
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("read options {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse options {path}"))
}

fn parse_years(raw: &str) -> Result<Vec<i32>> {
    let years = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i32>().ok())
        .collect::<Vec<_>>();
    if years.is_empty() {
        return Err(anyhow!("pass --years as a comma separated list, e.g. 2022,2023"));
    }
    Ok(years)
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&format!("{name}=")) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
