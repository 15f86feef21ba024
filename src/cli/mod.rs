// src/cli/mod.rs
// CLI argument parsing module for alnpipe
// Contains the Cli struct and its conversion into a PipelineConfig

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::PipelineConfig;
use crate::plotting::themes::THEME_NAMES;
use crate::preset::Preset;
use crate::tools::ToolPaths;

#[derive(Parser, Debug)]
#[command(name = "alnpipe", version)]
#[command(about = "Minimap2 alignment + BAM processing pipeline", long_about = None)]
pub struct Cli {
    /// Input FASTQ file
    #[arg(long = "fastq")]
    pub fastq: PathBuf,

    /// Reference FASTA
    #[arg(long = "reference")]
    pub reference: PathBuf,

    /// Output directory
    #[arg(long = "outdir", default_value = "results")]
    pub outdir: PathBuf,

    /// Thread count forwarded to minimap2
    #[arg(short = 't', long = "threads", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Minimap2 preset (e.g., map-ont, map-pb, sr)
    #[arg(long = "preset", value_enum, default_value_t = Preset::MapOnt)]
    pub preset: Preset,

    /// Compute per-base depth and draw a coverage plot
    #[arg(long = "plot")]
    pub plot: bool,

    /// Color theme for the coverage plot
    #[arg(long = "theme", default_value = "latte",
          value_parser = clap::builder::PossibleValuesParser::new(THEME_NAMES))]
    pub theme: String,

    /// Stem shared by every output file
    #[arg(long = "prefix", default_value = "aligned")]
    pub prefix: String,

    /// minimap2 executable (name on PATH or explicit path)
    #[arg(long = "minimap2", default_value = "minimap2")]
    pub minimap2: String,

    /// samtools executable (name on PATH or explicit path)
    #[arg(long = "samtools", default_value = "samtools")]
    pub samtools: String,

    /// Print the commands that would run and exit
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Delete the SAM and unsorted BAM once the run succeeds
    #[arg(long = "remove-intermediates")]
    pub remove_intermediates: bool,

    /// Log debug messages
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Default log directive when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    pub fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            fastq: self.fastq,
            reference: self.reference,
            outdir: self.outdir,
            threads: self.threads,
            preset: self.preset,
            plot: self.plot,
            theme: self.theme,
            prefix: self.prefix,
            tools: ToolPaths {
                minimap2: self.minimap2,
                samtools: self.samtools,
            },
            dry_run: self.dry_run,
            remove_intermediates: self.remove_intermediates,
        }
    }
}
