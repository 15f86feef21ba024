// tests/helpers/mod.rs
// Mock minimap2/samtools executables for driving the alnpipe binary
#![allow(dead_code)]

use std::env;
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Env var naming the file every mock appends its argv to
pub const LOG_VAR: &str = "ALNPIPE_MOCK_LOG";
/// Env var naming the mock (or samtools subcommand) that exits 1
pub const FAIL_VAR: &str = "ALNPIPE_MOCK_FAIL";
/// Env var naming the samtools subcommand that exits 0 without writing output
pub const NO_OUTPUT_VAR: &str = "ALNPIPE_MOCK_NO_OUTPUT";

const MINIMAP2_SCRIPT: &str = r#"#!/bin/sh
echo "minimap2 $*" >> "$ALNPIPE_MOCK_LOG"
if [ "$ALNPIPE_MOCK_FAIL" = "minimap2" ]; then
    echo "mock minimap2 failure" >&2
    exit 1
fi
for input in "$5" "$6"; do
    if [ ! -f "$input" ]; then
        echo "mock minimap2: cannot open $input" >&2
        exit 1
    fi
done
printf '@HD\tVN:1.6\tSO:unsorted\n'
printf 'read1\t0\tchr1\t1\t60\t4M\t*\t0\t0\tACGT\tIIII\n'
"#;

const SAMTOOLS_SCRIPT: &str = r#"#!/bin/sh
echo "samtools $*" >> "$ALNPIPE_MOCK_LOG"
if [ "$ALNPIPE_MOCK_FAIL" = "$1" ]; then
    echo "mock samtools $1 failure" >&2
    exit 1
fi
if [ "$ALNPIPE_MOCK_NO_OUTPUT" = "$1" ]; then
    exit 0
fi
case "$1" in
    view) echo BAM > "$5" ;;
    sort) echo SORTED > "$3" ;;
    index) echo BAI > "$2.bai" ;;
    flagstat)
        echo "100 + 0 in total (QC-passed reads + QC-failed reads)"
        echo "95 + 0 mapped (95.00% : N/A)"
        ;;
    idxstats) printf 'chr1\t1000\t90\t0\nchr2\t500\t5\t0\n*\t0\t0\t5\n' ;;
    depth) printf 'chr1\t1\t3\nchr1\t2\t5\nchr1\t3\t4\nchr2\t1\t1\n' ;;
    *) exit 2 ;;
esac
"#;

/// A scratch directory holding mock tools, inputs and the invocation log
pub struct MockEnv {
    pub dir: TempDir,
    pub minimap2: PathBuf,
    pub samtools: PathBuf,
    pub log: PathBuf,
    pub fastq: PathBuf,
    pub reference: PathBuf,
    pub outdir: PathBuf,
}

impl MockEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();

        let minimap2 = write_script(&bin, "minimap2", MINIMAP2_SCRIPT);
        let samtools = write_script(&bin, "samtools", SAMTOOLS_SCRIPT);

        let fastq = dir.path().join("reads.fq");
        fs::write(&fastq, "@read1\nACGT\n+\nIIII\n").unwrap();
        let reference = dir.path().join("ref.fa");
        fs::write(&reference, ">chr1\nACGTACGT\n>chr2\nACGT\n").unwrap();

        let log = dir.path().join("invocations.log");
        let outdir = dir.path().join("results");

        Self {
            dir,
            minimap2,
            samtools,
            log,
            fastq,
            reference,
            outdir,
        }
    }

    /// The alnpipe binary wired to the mocks, with inputs and outdir set
    pub fn command(&self) -> Command {
        self.command_with_tools(&self.minimap2, &self.samtools)
    }

    /// Like `command` but with explicit tool paths
    pub fn command_with_tools(&self, minimap2: &Path, samtools: &Path) -> Command {
        let mut cmd = Command::cargo_bin("alnpipe").unwrap();
        cmd.arg("--fastq")
            .arg(&self.fastq)
            .arg("--reference")
            .arg(&self.reference)
            .arg("--outdir")
            .arg(&self.outdir)
            .arg("--minimap2")
            .arg(minimap2)
            .arg("--samtools")
            .arg(samtools)
            .env(LOG_VAR, &self.log)
            .env_remove(FAIL_VAR)
            .env_remove(NO_OUTPUT_VAR)
            .env_remove("RUST_LOG");
        cmd
    }

    /// Like `command` but leaves the tools at their default names, found
    /// through a `PATH` that starts with the mock bin directory
    pub fn command_on_path(&self) -> Command {
        let mut cmd = Command::cargo_bin("alnpipe").unwrap();
        cmd.arg("--fastq")
            .arg(&self.fastq)
            .arg("--reference")
            .arg(&self.reference)
            .arg("--outdir")
            .arg(&self.outdir)
            .env("PATH", self.search_path())
            .env(LOG_VAR, &self.log)
            .env_remove(FAIL_VAR)
            .env_remove(NO_OUTPUT_VAR)
            .env_remove("RUST_LOG");
        cmd
    }

    fn search_path(&self) -> OsString {
        let bin = self.dir.path().join("bin");
        let inherited = env::var_os("PATH").unwrap_or_default();
        env::join_paths(std::iter::once(bin).chain(env::split_paths(&inherited)))
            .expect("join PATH")
    }

    /// Every mock invocation in order, with the temp dir prefix stripped
    pub fn invocations(&self) -> Vec<String> {
        let prefix = format!("{}/", self.dir.path().display());
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(|line| line.replace(&prefix, ""))
            .collect()
    }

    pub fn out(&self, name: &str) -> PathBuf {
        self.outdir.join(name)
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Verify that a file exists and is not empty
pub fn non_empty(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
