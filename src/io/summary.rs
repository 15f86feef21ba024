// src/io/summary.rs
// Module for writing the per-run summary table

use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{PipelineError, Result};
use crate::io::{parse_flagstat, parse_idxstats, FlagstatCounts, IdxstatsRow};
use crate::preset::Preset;

/// Contents of `<prefix>.summary.tsv`
pub struct RunSummary {
    pub fastq: PathBuf,
    pub reference: PathBuf,
    pub preset: Preset,
    pub threads: u32,
    pub flagstat: Option<FlagstatCounts>,
    pub idxstats: Option<Vec<IdxstatsRow>>,
    pub sorted_bam: PathBuf,
    pub creation_time: String,
}

impl RunSummary {
    /// Collect the summary from the flagstat and idxstats files of a finished run.
    ///
    /// Reports that cannot be read or parsed are left out with a warning.
    pub fn collect(
        fastq: &Path,
        reference: &Path,
        preset: Preset,
        threads: u32,
        sorted_bam: &Path,
        flagstat_path: &Path,
        idxstats_path: &Path,
    ) -> Self {
        let flagstat = match fs::read_to_string(flagstat_path) {
            Ok(text) => parse_flagstat(&text),
            Err(e) => {
                warn!("cannot read {}: {}", flagstat_path.display(), e);
                None
            }
        };
        if flagstat.is_none() {
            warn!("no mapping counts found in {}", flagstat_path.display());
        }

        let idxstats = match fs::read_to_string(idxstats_path) {
            Ok(text) => parse_idxstats(&text),
            Err(e) => {
                warn!("cannot read {}: {}", idxstats_path.display(), e);
                None
            }
        };
        if idxstats.is_none() {
            warn!("no per-reference counts found in {}", idxstats_path.display());
        }

        Self {
            fastq: fastq.to_path_buf(),
            reference: reference.to_path_buf(),
            preset,
            threads,
            flagstat,
            idxstats,
            sorted_bam: sorted_bam.to_path_buf(),
            creation_time: chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string(),
        }
    }

    /// Format as `field<TAB>value` lines followed by a per-reference table
    pub fn format(&self) -> String {
        let mut output = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(&mut output, "FASTQ\t{}", self.fastq.display());
        let _ = writeln!(&mut output, "Reference\t{}", self.reference.display());
        let _ = writeln!(&mut output, "Preset\t{}", self.preset);
        let _ = writeln!(&mut output, "Threads\t{}", self.threads);
        if let Some(counts) = &self.flagstat {
            let _ = writeln!(&mut output, "Total reads\t{}", counts.total);
            let _ = writeln!(&mut output, "Mapped reads\t{}", counts.mapped);
            let _ = writeln!(&mut output, "Mapped [%]\t{:.2}", counts.mapped_percent());
        }
        if let Some(rows) = &self.idxstats {
            let placed: Vec<_> = rows.iter().filter(|r| !r.is_unplaced()).collect();
            let covered = placed.iter().filter(|r| r.mapped > 0).count();
            let unplaced: u64 = rows.iter().filter(|r| r.is_unplaced()).map(|r| r.unmapped).sum();
            let _ = writeln!(&mut output, "References\t{}", placed.len());
            let _ = writeln!(&mut output, "References with reads\t{}", covered);
            let _ = writeln!(&mut output, "Unplaced reads\t{}", unplaced);
        }
        let _ = writeln!(&mut output);
        let _ = writeln!(&mut output, "Sorted BAM\t{}", self.sorted_bam.display());
        let _ = writeln!(&mut output, "Creation time\t{}", self.creation_time);

        if let Some(rows) = &self.idxstats {
            let _ = writeln!(&mut output);
            let _ = writeln!(&mut output, "#reference\tlength\tmapped\tunmapped");
            for row in rows.iter().filter(|r| !r.is_unplaced()) {
                let _ = writeln!(
                    &mut output,
                    "{}\t{}\t{}\t{}",
                    row.name, row.length, row.mapped, row.unmapped
                );
            }
        }

        output
    }

    /// Write to a file
    pub fn write_to_file(&self, output_path: &Path) -> Result<()> {
        let mut file = File::create(output_path).map_err(|e| {
            PipelineError::io(format!("cannot create {}", output_path.display()), e)
        })?;
        file.write_all(self.format().as_bytes())
            .map_err(|e| PipelineError::io(format!("cannot write {}", output_path.display()), e))
    }
}
