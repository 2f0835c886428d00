//! Relocate command - rewrite the image location of a chart tarball

use console::style;
use flate2::Compression;
use relocate_core::{Relocation, TranscodeOptions, TranscodeReport, relocate_file};
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};
use crate::util::{default_output_path, ensure_path_to_a_file, format_size, same_file};

pub struct RelocateArgs {
    pub chart: PathBuf,
    pub output: Option<PathBuf>,
    pub registry: String,
    pub namespace: String,
    pub compression: u32,
    pub force: bool,
    pub json: bool,
}

pub fn run(args: &RelocateArgs) -> Result<()> {
    ensure_path_to_a_file(&args.chart)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.chart));
    check_output(&args.chart, &output, args.force)?;
    tracing::debug!(
        "Writing {} at compression level {}",
        output.display(),
        args.compression
    );

    let relocation = Relocation::new(args.registry.as_str(), args.namespace.as_str());
    let options = TranscodeOptions {
        compression: Compression::new(args.compression),
    };

    if !args.json {
        println!(
            "{} {}",
            style("Relocating").cyan().bold(),
            args.chart.display()
        );
    }

    let report = relocate_file(&args.chart, &output, &relocation, &options)?;

    if args.json {
        print_json(&args.chart, &output, &relocation, &report)
    } else {
        print_report(&output, &relocation, &report);
        Ok(())
    }
}

fn check_output(chart: &Path, output: &Path, force: bool) -> Result<()> {
    if same_file(chart, output) {
        return Err(CliError::input_with_help(
            format!("Output {} would overwrite the input chart", output.display()),
            "Choose a different --output path",
        ));
    }

    if output.is_dir() {
        return Err(CliError::input(format!(
            "Output {} is a directory",
            output.display()
        )));
    }

    if output.exists() && !force {
        return Err(CliError::input_with_help(
            format!("Output {} already exists", output.display()),
            "Pass --force to overwrite it",
        ));
    }

    Ok(())
}

fn print_report(output: &Path, relocation: &Relocation, report: &TranscodeReport) {
    match &report.rewritten {
        Some(entry) => println!(
            "  {} {} ({} -> {})",
            style("Rewrote").green().bold(),
            entry.path,
            format_size(entry.original_size),
            format_size(entry.new_size)
        ),
        None => println!(
            "  {} no values.yaml at the chart root, archive copied unchanged",
            style("Warning").yellow().bold()
        ),
    }

    println!(
        "  {} {}",
        style("Images").dim(),
        display_prefix(relocation)
    );
    println!("  {} {}", style("Entries").dim(), report.entries);
    println!(
        "  {} {}",
        style("Created").green().bold(),
        output.display()
    );

    if let Ok(metadata) = std::fs::metadata(output) {
        println!("  {} {}", style("Size").dim(), format_size(metadata.len()));
    }
}

fn print_json(
    chart: &Path,
    output: &Path,
    relocation: &Relocation,
    report: &TranscodeReport,
) -> Result<()> {
    let json = serde_json::json!({
        "chart": chart.display().to_string(),
        "output": output.display().to_string(),
        "relocation": relocation,
        "imagePrefix": relocation.image_prefix(),
        "entries": report.entries,
        "rewritten": report.rewritten,
    });

    let text = serde_json::to_string_pretty(&json).map_err(|e| CliError::Internal {
        message: e.to_string(),
    })?;
    println!("{}", text);
    Ok(())
}

fn display_prefix(relocation: &Relocation) -> String {
    let prefix = relocation.image_prefix();
    if prefix.is_empty() {
        "(registry and namespace cleared)".to_string()
    } else {
        prefix
    }
}
