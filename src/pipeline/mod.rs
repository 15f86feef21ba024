// src/pipeline/mod.rs
// The alignment pipeline: output layout, ordered step plan and execution

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::io::{parse_depth, parse_idxstats};
use crate::io::summary::RunSummary;
use crate::plotting::plot_coverage;
use crate::plotting::themes::get_theme;
use crate::preset::Preset;
use crate::tools::{require_tool, ToolCommand, ToolPaths};

/// Everything a run needs, assembled from the command line
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fastq: PathBuf,
    pub reference: PathBuf,
    pub outdir: PathBuf,
    pub threads: u32,
    pub preset: Preset,
    pub plot: bool,
    pub theme: String,
    pub prefix: String,
    pub tools: ToolPaths,
    pub dry_run: bool,
    pub remove_intermediates: bool,
}

impl PipelineConfig {
    pub fn new(fastq: impl Into<PathBuf>, reference: impl Into<PathBuf>) -> Self {
        Self {
            fastq: fastq.into(),
            reference: reference.into(),
            outdir: PathBuf::from("results"),
            threads: 4,
            preset: Preset::default(),
            plot: false,
            theme: "latte".to_string(),
            prefix: "aligned".to_string(),
            tools: ToolPaths::default(),
            dry_run: false,
            remove_intermediates: false,
        }
    }
}

/// Paths of every file a run writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub outdir: PathBuf,
    pub sam: PathBuf,
    pub bam: PathBuf,
    pub sorted_bam: PathBuf,
    pub bam_index: PathBuf,
    pub flagstat: PathBuf,
    pub idxstats: PathBuf,
    pub depth: PathBuf,
    pub coverage_plot: PathBuf,
    pub summary: PathBuf,
}

impl OutputLayout {
    pub fn new(outdir: &Path, prefix: &str) -> Self {
        let file = |suffix: &str| outdir.join(format!("{}{}", prefix, suffix));
        Self {
            outdir: outdir.to_path_buf(),
            sam: file(".sam"),
            bam: file(".bam"),
            sorted_bam: file(".sorted.bam"),
            bam_index: file(".sorted.bam.bai"),
            flagstat: file(".flagstat.txt"),
            idxstats: file(".idxstats.txt"),
            depth: file(".depth.tsv"),
            coverage_plot: file(".coverage.png"),
            summary: file(".summary.tsv"),
        }
    }
}

/// A named external invocation and the files it must leave behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub command: ToolCommand,
    pub produces: Vec<PathBuf>,
}

/// What a completed run left on disk
#[derive(Debug)]
pub struct RunOutputs {
    pub layout: OutputLayout,
    /// Set when `--plot` was given and the PNG was rendered
    pub plot_written: bool,
    /// Set when `--plot` was given
    pub depth_written: bool,
    /// Intermediates actually deleted by `--remove-intermediates`
    pub removed: Vec<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
    layout: OutputLayout,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        validate_prefix(&config.prefix)?;
        let layout = OutputLayout::new(&config.outdir, &config.prefix);
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// The external steps in execution order
    pub fn plan(&self) -> Vec<Step> {
        let cfg = &self.config;
        let out = &self.layout;
        let minimap2 = cfg.tools.minimap2.as_str();
        let samtools = cfg.tools.samtools.as_str();

        let mut steps = vec![
            Step {
                name: "align",
                command: ToolCommand::new(minimap2)
                    .arg("-t")
                    .arg(cfg.threads.to_string())
                    .arg("-ax")
                    .arg(cfg.preset.as_str())
                    .arg(&cfg.reference)
                    .arg(&cfg.fastq)
                    .stdout_to(&out.sam),
                produces: vec![out.sam.clone()],
            },
            Step {
                name: "view",
                command: ToolCommand::new(samtools)
                    .arg("view")
                    .arg("-bS")
                    .arg(&out.sam)
                    .arg("-o")
                    .arg(&out.bam),
                produces: vec![out.bam.clone()],
            },
            Step {
                name: "sort",
                command: ToolCommand::new(samtools)
                    .arg("sort")
                    .arg("-o")
                    .arg(&out.sorted_bam)
                    .arg(&out.bam),
                produces: vec![out.sorted_bam.clone()],
            },
            Step {
                name: "index",
                command: ToolCommand::new(samtools).arg("index").arg(&out.sorted_bam),
                produces: vec![out.bam_index.clone()],
            },
            Step {
                name: "flagstat",
                command: ToolCommand::new(samtools)
                    .arg("flagstat")
                    .arg(&out.sorted_bam)
                    .stdout_to(&out.flagstat),
                produces: vec![out.flagstat.clone()],
            },
            Step {
                name: "idxstats",
                command: ToolCommand::new(samtools)
                    .arg("idxstats")
                    .arg(&out.sorted_bam)
                    .stdout_to(&out.idxstats),
                produces: vec![out.idxstats.clone()],
            },
        ];

        if cfg.plot {
            steps.push(Step {
                name: "depth",
                command: ToolCommand::new(samtools)
                    .arg("depth")
                    .arg("-a")
                    .arg(&out.sorted_bam)
                    .stdout_to(&out.depth),
                produces: vec![out.depth.clone()],
            });
        }

        steps
    }

    /// Check inputs and tools, then run every step, halting on the first failure.
    pub fn execute(&self) -> Result<RunOutputs> {
        let cfg = &self.config;
        check_input(&cfg.fastq)?;
        check_input(&cfg.reference)?;

        let minimap2 = require_tool(&cfg.tools.minimap2)?;
        let samtools = require_tool(&cfg.tools.samtools)?;
        debug!("using minimap2 at {}", minimap2.display());
        debug!("using samtools at {}", samtools.display());

        let available = num_cpus::get();
        if cfg.threads as usize > available {
            warn!(
                "{} threads requested but only {} logical CPUs are available",
                cfg.threads, available
            );
        }

        fs::create_dir_all(&self.layout.outdir).map_err(|e| {
            PipelineError::io(
                format!("cannot create output directory {}", self.layout.outdir.display()),
                e,
            )
        })?;

        let steps = self.plan();
        let total = steps.len();
        for (i, step) in steps.iter().enumerate() {
            info!("[{}/{}] {}: {}", i + 1, total, step.name, step.command);
            // a leftover file from an earlier run must not pass the check below
            for path in &step.produces {
                remove_stale(path)?;
            }
            step.command.run(step.name)?;
            for path in &step.produces {
                if !path.exists() {
                    return Err(PipelineError::MissingOutput {
                        step: step.name.to_string(),
                        path: path.clone(),
                    });
                }
            }
        }

        let summary = RunSummary::collect(
            &cfg.fastq,
            &cfg.reference,
            cfg.preset,
            cfg.threads,
            &self.layout.sorted_bam,
            &self.layout.flagstat,
            &self.layout.idxstats,
        );
        if let Some(counts) = &summary.flagstat {
            info!(
                "{} of {} reads mapped ({:.2}%)",
                counts.mapped,
                counts.total,
                counts.mapped_percent()
            );
        }
        summary.write_to_file(&self.layout.summary)?;

        let plot_written = if cfg.plot {
            match self.render_plot() {
                Ok(()) => true,
                Err(e) => {
                    warn!("coverage plot skipped: {}", e);
                    false
                }
            }
        } else {
            false
        };

        let removed = if cfg.remove_intermediates {
            self.remove_intermediates()
        } else {
            Vec::new()
        };

        Ok(RunOutputs {
            layout: self.layout.clone(),
            plot_written,
            depth_written: cfg.plot,
            removed,
        })
    }

    fn render_plot(&self) -> Result<()> {
        let lengths = self.reference_lengths();
        let references = parse_depth(&self.layout.depth, &lengths)?;
        let theme = get_theme(Some(self.config.theme.as_str()));
        info!(
            "drawing coverage for {} references to {}",
            references.len(),
            self.layout.coverage_plot.display()
        );
        plot_coverage(&references, &self.layout.coverage_plot, theme)
            .map_err(|e| PipelineError::Plot(e.to_string()))
    }

    /// Reference lengths from idxstats, empty when the report is unusable
    fn reference_lengths(&self) -> HashMap<String, u64> {
        fs::read_to_string(&self.layout.idxstats)
            .ok()
            .and_then(|text| parse_idxstats(&text))
            .map(|rows| {
                rows.into_iter()
                    .filter(|row| !row.is_unplaced())
                    .map(|row| (row.name, row.length))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Delete the SAM and unsorted BAM, returning the files that went away
    fn remove_intermediates(&self) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for path in [&self.layout.sam, &self.layout.bam] {
            match fs::remove_file(path) {
                Ok(()) => {
                    debug!("removed {}", path.display());
                    removed.push(path.clone());
                }
                Err(e) => warn!("cannot remove {}: {}", path.display(), e),
            }
        }
        removed
    }
}

fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() || prefix.contains(['/', '\\']) || prefix == "." || prefix == ".." {
        return Err(PipelineError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

fn remove_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PipelineError::io(
            format!("cannot remove stale {}", path.display()),
            e,
        )),
    }
}

fn check_input(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::InputNotFound(path.to_path_buf()))
    }
}
