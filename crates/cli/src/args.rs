use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracelane_protocol::EventCategory;

pub const USAGE: &str = "Usage: tracelane <trace.json> [--config <file>] [--expand <category>]... \
[--range <from_ns> <to_ns>] [--details]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub trace: PathBuf,
    pub config: Option<PathBuf>,
    pub expand: Vec<EventCategory>,
    pub range: Option<(i64, i64)>,
    pub details: bool,
}

/// Parse command-line arguments, excluding the program name.
pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut trace = None;
    let mut config = None;
    let mut expand = Vec::new();
    let mut range = None;
    let mut details = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file")?;
                config = Some(PathBuf::from(path));
            }
            "--expand" => {
                let name = args.next().context("--expand needs a category")?;
                expand.push(name.parse::<EventCategory>()?);
            }
            "--range" => {
                let from = next_time(&mut args, "--range <from>")?;
                let to = next_time(&mut args, "--range <to>")?;
                range = Some((from, to));
            }
            "--details" => details = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if trace.is_none() => trace = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg}"),
        }
    }

    let Some(trace) = trace else {
        bail!("missing trace file");
    };

    Ok(Args {
        trace,
        config,
        expand,
        range,
        details,
    })
}

fn next_time(args: &mut impl Iterator<Item = String>, what: &str) -> Result<i64> {
    let value = args.next().with_context(|| format!("{what} is missing"))?;
    value
        .parse()
        .with_context(|| format!("{what}: {value:?} is not a time in nanoseconds"))
}
