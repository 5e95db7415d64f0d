use anyhow::{Context, Result};
use clap::Parser;
use img_compact::cli::Args;
use img_compact::constants::{
    ERROR_PREFIX, INPUT_PREFIX, START_PREFIX, SUCCESS_PREFIX, SUMMARY_PREFIX, WARNING_PREFIX,
};
use img_compact::{finalize, logger, resolve, run_batch, BatchOptions, CompressionReport};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", ERROR_PREFIX, e);
            ExitCode::FAILURE
        }
    }
}

/// Per-file failures are reported, not returned: only invalid settings or a
/// missing input make this fail.
fn run(args: &Args) -> Result<()> {
    let profile = args.profile()?;
    let overrides = args.overrides()?;
    let plan = resolve(profile, &overrides).context("Invalid compression settings")?;
    debug!("Resolved plan: {}", plan);

    println!(
        "{} Compressing with profile '{}': {}",
        START_PREFIX,
        profile,
        profile.description()
    );
    println!("{} Input: {:?}", INPUT_PREFIX, args.input);
    if let Some(output) = &args.output {
        println!("{} Output: {:?}", INPUT_PREFIX, output);
    }

    let options = BatchOptions {
        output_dir: args.output.clone(),
        recursive: args.recursive,
        show_progress: !args.no_progress,
    };
    let results = run_batch(&args.input, &plan, &options)
        .with_context(|| format!("Cannot compress {:?}", args.input))?;

    let report = finalize(&results);
    print_summary(&report);

    Ok(())
}

fn print_summary(report: &CompressionReport) {
    if report.is_empty() {
        println!("{} No image files found in the input path", WARNING_PREFIX);
        return;
    }

    println!("\n{} Compression report:", SUMMARY_PREFIX);
    println!("{}", report);

    if report.succeeded == 0 {
        println!("{} No image was compressed successfully", WARNING_PREFIX);
    } else if report.reduction_ratio() < 0.0 {
        println!(
            "{} Total size increased by {:.1}%",
            WARNING_PREFIX,
            report.reduction_ratio().abs() * 100.0
        );
    } else {
        println!(
            "{} Reduced total size by {:.1}%",
            SUCCESS_PREFIX,
            report.reduction_ratio() * 100.0
        );
    }
}
