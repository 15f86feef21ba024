#![cfg(unix)]

mod helpers;

use std::collections::HashMap;
use std::fs;

use helpers::MockEnv;

fn summary_fields(text: &str) -> HashMap<String, String> {
    text.lines()
        .take_while(|line| !line.starts_with('#'))
        .filter_map(|line| line.split_once('\t'))
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_summary_output_basic() {
    let env = MockEnv::new();
    env.command().arg("--preset").arg("map-hifi").arg("-t").arg("3").assert().success();

    let contents = fs::read_to_string(env.out("aligned.summary.tsv")).unwrap();
    let fields = summary_fields(&contents);

    assert_eq!(fields["Preset"], "map-hifi");
    assert_eq!(fields["Threads"], "3");
    assert_eq!(fields["Total reads"], "100");
    assert_eq!(fields["Mapped reads"], "95");
    assert_eq!(fields["Mapped [%]"], "95.00");
    assert_eq!(fields["References"], "2");
    assert_eq!(fields["References with reads"], "2");
    assert_eq!(fields["Unplaced reads"], "5");
    assert!(fields["FASTQ"].ends_with("reads.fq"));
    assert!(fields["Sorted BAM"].ends_with("aligned.sorted.bam"));
}

#[test]
fn test_summary_format_consistency() {
    let env = MockEnv::new();
    env.command().assert().success();

    let contents = fs::read_to_string(env.out("aligned.summary.tsv")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    // These fields should appear in this specific order
    let expected_fields = [
        "FASTQ",
        "Reference",
        "Preset",
        "Threads",
        "Total reads",
        "Mapped reads",
        "Mapped [%]",
        "References",
        "References with reads",
        "Unplaced reads",
    ];
    for (i, &field) in expected_fields.iter().enumerate() {
        assert!(
            lines[i].starts_with(&format!("{}\t", field)),
            "Line {} should start with '{}', but was '{}'",
            i + 1,
            field,
            lines[i]
        );
    }

    let empty_line_index = expected_fields.len();
    assert_eq!(lines[empty_line_index], "", "Expected empty line after main fields");
    assert!(lines[empty_line_index + 1].starts_with("Sorted BAM"));
    assert!(lines[empty_line_index + 2].starts_with("Creation time"));

    // Creation time is dd/mm/yyyy hh:mm:ss
    let (_, stamp) = lines[empty_line_index + 2].split_once('\t').unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%d/%m/%Y %H:%M:%S").is_ok());

    let table_start = lines
        .iter()
        .position(|l| *l == "#reference\tlength\tmapped\tunmapped")
        .expect("per-reference table header");
    assert_eq!(lines[table_start + 1], "chr1\t1000\t90\t0");
    assert_eq!(lines[table_start + 2], "chr2\t500\t5\t0");
    assert_eq!(lines.len(), table_start + 3);
}
