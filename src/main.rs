use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod model;
mod render;
mod trace;
mod view;

use config::{LabelStyle, MarkerStyle, PlotStyle};
use error::CliError;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "netsim-trace-viz")]
#[command(version, about = "Network simulation trace plotter", long_about = None)]
struct Cli {
    /// Trace file written by the simulator (*.json).
    input: Option<PathBuf>,

    /// Report path. Defaults to the input path with an .html extension.
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Axis label style.
    #[arg(long, value_enum, default_value_t = LabelStyle::Units)]
    labels: LabelStyle,

    /// How samples are drawn.
    #[arg(long, value_enum, default_value_t = MarkerStyle::Line)]
    marker: MarkerStyle,

    /// Link or flow id to start hidden in every subplot (repeatable).
    #[arg(long, value_name = "ID")]
    hide: Vec<String>,

    /// Log progress to stderr (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprint!("{err}");
            eprintln!("{}", error::USAGE);
            process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => eprintln!("{cli_err}"),
            None => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let input = check_input_path(cli.input.as_deref())?;
    let out = cli.out.unwrap_or_else(|| input.with_extension("html"));
    let style = PlotStyle {
        labels: cli.labels,
        marker: cli.marker,
    };

    // 1) Read trace.
    let trace = trace::load_trace_file(input)
        .with_context(|| format!("load trace {}", input.display()))?;

    // 2) Reshape into per-entity columns.
    let tables =
        model::reshape(&trace).with_context(|| format!("load trace {}", input.display()))?;
    info!(
        events = tables.times.len(),
        links = tables.links.len(),
        flows = tables.flows.len(),
        "loaded trace"
    );

    // 3) Lay out figures.
    let mut viewer = view::Viewer::new(&tables, style);
    for id in &cli.hide {
        if viewer.hide_entity(id) == 0 {
            warn!(id = %id, "--hide names no link or flow in the trace");
        }
    }

    // 4) Render HTML.
    let html = render::render_html_report(&viewer)?;
    std::fs::write(&out, html).with_context(|| format!("write report {}", out.display()))?;
    println!("Wrote {}", out.display());

    Ok(())
}

/// The input must be present and carry a `.json` extension.
fn check_input_path(input: Option<&Path>) -> std::result::Result<&Path, CliError> {
    let path = input.ok_or(CliError::MissingArgument)?;
    if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        Ok(path)
    } else {
        debug!(path = %path.display(), "rejected input path");
        Err(CliError::InvalidFileFormat)
    }
}
