// src/io/mod.rs
// IO module for alnpipe: reading the text reports samtools leaves behind

pub mod summary;

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::plotting::utils::{calculate_bin_size, next_bin_size};

/// Bins held per reference before neighbouring bins are merged
pub const MAX_BINS: usize = 100_000;

/// Depth of one reference, folded into bins while the table is read.
///
/// Only the binned sums and a histogram of depth values are kept, so memory
/// does not grow with the reference length.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDepth {
    pub name: String,
    bin_size: u32,
    /// bin start -> (summed depth, positions)
    bins: BTreeMap<u32, (u64, u32)>,
    /// depth -> positions at that depth
    histogram: BTreeMap<u32, u64>,
    start: u32,
    end: u32,
    positions: u64,
    total: u64,
}

impl ReferenceDepth {
    pub fn new(name: impl Into<String>, bin_size: u32) -> Self {
        Self {
            name: name.into(),
            bin_size: bin_size.max(1),
            bins: BTreeMap::new(),
            histogram: BTreeMap::new(),
            start: u32::MAX,
            end: 0,
            positions: 0,
            total: 0,
        }
    }

    /// Record the depth at a 1-based position
    pub fn add(&mut self, pos: u32, depth: u32) {
        self.start = self.start.min(pos);
        self.end = self.end.max(pos);
        self.positions += 1;
        self.total += depth as u64;
        *self.histogram.entry(depth).or_insert(0) += 1;

        let entry = self
            .bins
            .entry(pos / self.bin_size * self.bin_size)
            .or_insert((0, 0));
        entry.0 += depth as u64;
        entry.1 += 1;

        if self.bins.len() > MAX_BINS {
            self.rebin(next_bin_size(self.bin_size));
        }
    }

    /// Merge bins into `bin_size`-wide ones. Narrower widths are ignored.
    pub fn rebin(&mut self, bin_size: u32) {
        if bin_size <= self.bin_size {
            return;
        }
        self.bins = merge_bins(&self.bins, bin_size);
        self.bin_size = bin_size;
    }

    pub fn bin_size(&self) -> u32 {
        self.bin_size
    }

    pub fn is_empty(&self) -> bool {
        self.positions == 0
    }

    /// Number of positions read
    pub fn positions(&self) -> u64 {
        self.positions
    }

    /// First and last position seen
    pub fn span(&self) -> Option<(u32, u32)> {
        (!self.is_empty()).then_some((self.start, self.end))
    }

    pub fn mean(&self) -> f64 {
        if self.positions == 0 {
            return 0.0;
        }
        self.total as f64 / self.positions as f64
    }

    /// Positions per depth value
    pub fn histogram(&self) -> &BTreeMap<u32, u64> {
        &self.histogram
    }

    /// `(bin_start, mean depth)` points at `bin_size`, or the current
    /// width when that is coarser.
    pub fn binned(&self, bin_size: u32) -> Vec<(i64, f64)> {
        let merged;
        let bins = if bin_size > self.bin_size {
            merged = merge_bins(&self.bins, bin_size);
            &merged
        } else {
            &self.bins
        };
        bins.iter()
            .map(|(&start, &(sum, n))| (start as i64, if n > 0 { sum as f64 / n as f64 } else { 0.0 }))
            .collect()
    }
}

fn merge_bins(bins: &BTreeMap<u32, (u64, u32)>, bin_size: u32) -> BTreeMap<u32, (u64, u32)> {
    let mut merged: BTreeMap<u32, (u64, u32)> = BTreeMap::new();
    for (&start, &(sum, n)) in bins {
        let entry = merged.entry(start / bin_size * bin_size).or_insert((0, 0));
        entry.0 += sum;
        entry.1 += n;
    }
    merged
}

/// Stream `samtools depth` output (`ref<TAB>pos<TAB>depth`) into binned
/// per-reference summaries.
///
/// `lengths` (usually from idxstats) picks each reference's bin width up
/// front; unknown references start at 1 bp and coarsen as they grow.
/// References keep the order in which they first appear.
pub fn parse_depth(path: &Path, lengths: &HashMap<String, u64>) -> Result<Vec<ReferenceDepth>> {
    let file = File::open(path)
        .map_err(|e| PipelineError::io(format!("cannot open {}", path.display()), e))?;
    let mut reader = BufReader::new(file);

    let mut references: Vec<ReferenceDepth> = Vec::new();
    let mut lookup: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;
    let mut line = String::new();
    let mut line_no = 0;

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| PipelineError::io(format!("cannot read {}", path.display()), e))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let record = line.trim_end_matches(['\n', '\r']);
        if record.starts_with('#') || record.trim().is_empty() {
            continue;
        }
        let mut fields = record.split('\t');
        let (Some(name), Some(pos), Some(depth)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(PipelineError::DepthParse {
                line: line_no,
                reason: format!("expected 3 columns, found {}", record.split('\t').count()),
            });
        };
        let pos: u32 = pos.trim().parse().map_err(|_| PipelineError::DepthParse {
            line: line_no,
            reason: format!("invalid position '{}'", pos),
        })?;
        let depth: u32 = depth.trim().parse().map_err(|_| PipelineError::DepthParse {
            line: line_no,
            reason: format!("invalid depth '{}'", depth),
        })?;

        // depth tables are grouped by reference; only look up on a change
        let slot = match current {
            Some(slot) if references[slot].name == name => slot,
            _ => {
                let slot = match lookup.get(name) {
                    Some(&slot) => slot,
                    None => {
                        let bin_size = lengths
                            .get(name)
                            .map(|&len| calculate_bin_size(len.min(u32::MAX as u64) as u32))
                            .unwrap_or(1);
                        references.push(ReferenceDepth::new(name, bin_size));
                        lookup.insert(name.to_string(), references.len() - 1);
                        references.len() - 1
                    }
                };
                current = Some(slot);
                slot
            }
        };
        references[slot].add(pos, depth);
    }

    Ok(references)
}

/// Read counts pulled from `samtools flagstat`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagstatCounts {
    /// QC-passed records in total
    pub total: u64,
    /// QC-passed mapped records
    pub mapped: u64,
}

impl FlagstatCounts {
    pub fn mapped_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mapped as f64 * 100.0 / self.total as f64
        }
    }
}

/// Parse the "in total" and "mapped" lines of a flagstat report.
///
/// Returns `None` when either line is absent.
pub fn parse_flagstat(text: &str) -> Option<FlagstatCounts> {
    let mut total = None;
    let mut mapped = None;
    for line in text.lines() {
        // "<passed> + <failed> <description>"
        let mut parts = line.splitn(4, ' ');
        let passed = parts.next().and_then(|s| s.parse::<u64>().ok());
        let plus = parts.next();
        let _failed = parts.next();
        let rest = parts.next().unwrap_or("");
        let Some(passed) = passed else { continue };
        if plus != Some("+") {
            continue;
        }
        if rest.starts_with("in total") {
            total.get_or_insert(passed);
        } else if rest.starts_with("mapped (") {
            mapped.get_or_insert(passed);
        }
    }
    Some(FlagstatCounts {
        total: total?,
        mapped: mapped?,
    })
}

/// One line of `samtools idxstats`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxstatsRow {
    pub name: String,
    pub length: u64,
    pub mapped: u64,
    pub unmapped: u64,
}

impl IdxstatsRow {
    /// The `*` row holding reads without a reference
    pub fn is_unplaced(&self) -> bool {
        self.name == "*"
    }
}

/// Parse an idxstats report. Returns `None` on any malformed line.
pub fn parse_idxstats(text: &str) -> Option<Vec<IdxstatsRow>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields: Vec<_> = line.split('\t').collect();
            if fields.len() < 4 {
                return None;
            }
            Some(IdxstatsRow {
                name: fields[0].to_string(),
                length: fields[1].trim().parse().ok()?,
                mapped: fields[2].trim().parse().ok()?,
                unmapped: fields[3].trim().parse().ok()?,
            })
        })
        .collect()
}
