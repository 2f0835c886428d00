//! relocate-chart - Rewrite the image registry and namespace of a Helm chart tarball

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;
mod util;

use commands::relocate::RelocateArgs;

const LONG_ABOUT: &str = "\
Rewrites the default authored registry and namespace for images in a given helm chart tarball.

Sets `global.imageRegistry` and `global.imageNamespace` in the chart's top-level
values.yaml and copies every other file unchanged. The chart and its sub-charts
must follow the `global.imageRegistry` / `global.imageNamespace` image
referencing convention.";

const EXAMPLE: &str = "\
Example:
  relocate-chart /path/to/chart.tgz --registry new.registry.local --namespace new-namespace

  Writes /path/to/chart.tgz.tgz with image paths set to new.registry.local/new-namespace/";

#[derive(Parser)]
#[command(name = "relocate-chart")]
#[command(version)]
#[command(about = "A tool for relocating images in a helm chart", long_about = LONG_ABOUT)]
#[command(after_help = EXAMPLE)]
struct Cli {
    /// Path to the chart tarball
    chart: PathBuf,

    /// New registry to use in the chart
    #[arg(short, long, default_value = "")]
    registry: String,

    /// New namespace to use in the chart
    #[arg(short, long, default_value = "")]
    namespace: String,

    /// Output path (default: <CHART>.tgz)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gzip compression level of the output (0-9)
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    compression: u32,

    /// Overwrite the output file if it already exists
    #[arg(long)]
    force: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(exit_codes::USAGE_ERROR);
        }
        Err(err) => err.exit(),
    };

    init_tracing(cli.debug);

    let args = RelocateArgs {
        chart: cli.chart,
        output: cli.output,
        registry: cli.registry,
        namespace: cli.namespace,
        compression: cli.compression,
        force: cli.force,
        json: cli.json,
    };

    if let Err(err) = commands::relocate::run(&args) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log to stderr, honoring `RUST_LOG` over the `--debug` default
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
