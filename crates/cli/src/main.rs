mod args;
mod report;

use std::io::Write;

use anyhow::{Context, Result};
use tracelane_core::parsers::parse_auto;
use tracelane_core::{TimelineConfig, TimelineModel};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = match args::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n{}", args::USAGE);
            std::process::exit(1);
        }
    };

    let config = match &args.config {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            TimelineConfig::from_json_slice(&data)?
        }
        None => TimelineConfig::default(),
    };

    let data = std::fs::read(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let snapshot = parse_auto(&data)?;
    info!(path = %args.trace.display(), events = snapshot.events.len(), "loaded trace");

    let mut model = TimelineModel::new(config);
    model.reload(&snapshot);
    for category in &args.expand {
        model.set_expanded(*category, true);
    }

    let mut out = std::io::stdout().lock();
    report::write_summary(&mut out, &model)?;
    if let Some((from, to)) = args.range {
        writeln!(out)?;
        report::write_range(&mut out, &model, from, to, args.details)?;
    }
    out.flush()?;
    Ok(())
}
