use std::process::ExitCode;

use alnpipe::cli::Cli;
use alnpipe::{Pipeline, RunOutputs};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let pipeline = match Pipeline::new(cli.into_config()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if pipeline.config().dry_run {
        print_plan(&pipeline);
        return ExitCode::SUCCESS;
    }

    match pipeline.execute() {
        Ok(outputs) => {
            print_outputs(&outputs);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG overrides the level picked on the command line
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_plan(pipeline: &Pipeline) {
    for step in pipeline.plan() {
        println!("{}", step.command);
    }
    if pipeline.config().plot {
        println!(
            "# coverage plot -> {}",
            pipeline.layout().coverage_plot.display()
        );
    }
}

fn print_outputs(outputs: &RunOutputs) {
    let layout = &outputs.layout;
    let removed = if outputs.removed.contains(&layout.sam) {
        " (removed)"
    } else {
        ""
    };
    println!("Pipeline complete.");
    println!("SAM: {}{}", layout.sam.display(), removed);
    if outputs.removed.contains(&layout.bam) {
        println!("BAM: {} (removed)", layout.bam.display());
    }
    println!("Sorted BAM: {}", layout.sorted_bam.display());
    println!(
        "Stats: {}, {}",
        layout.flagstat.display(),
        layout.idxstats.display()
    );
    if outputs.depth_written {
        println!("Depth: {}", layout.depth.display());
    }
    if outputs.plot_written {
        println!("Plot: {}", layout.coverage_plot.display());
    }
    println!("Summary: {}", layout.summary.display());
}
