use std::collections::HashMap;
use std::io::Write;

use alnpipe::io::MAX_BINS;
use alnpipe::{parse_depth, PipelineError};

fn depth_file(content: &str) -> tempfile::NamedTempFile {
    let tmpfile = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmpfile.path(), content).unwrap();
    tmpfile
}

#[test]
fn test_parse_depth_basic() {
    let tmpfile = depth_file("chr1\t1\t3\nchr1\t2\t5\nchr2\t7\t1\n");
    let refs = parse_depth(tmpfile.path(), &HashMap::new()).unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].name, "chr1");
    assert_eq!(refs[0].binned(1), vec![(1, 3.0), (2, 5.0)]);
    assert_eq!(refs[1].name, "chr2");
    assert_eq!(refs[1].binned(1), vec![(7, 1.0)]);
    assert_eq!(refs[1].span(), Some((7, 7)));
}

#[test]
fn test_parse_depth_ignores_comments_and_blank() {
    let tmpfile = depth_file("#CHROM\tPOS\tDEPTH\nchr1\t1\t2\n\nchr2\t3\t4\r\n");
    let refs = parse_depth(tmpfile.path(), &HashMap::new()).unwrap();
    assert_eq!(refs[0].binned(1), vec![(1, 2.0)]);
    assert_eq!(refs[1].binned(1), vec![(3, 4.0)]);
}

#[test]
fn test_parse_depth_regroups_revisited_reference() {
    let tmpfile = depth_file("chr1\t1\t2\nchr2\t1\t4\nchr1\t2\t6\n");
    let refs = parse_depth(tmpfile.path(), &HashMap::new()).unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].positions(), 2);
    assert_eq!(refs[0].mean(), 4.0);
}

#[test]
fn test_parse_depth_bins_from_known_length() {
    let tmpfile = depth_file("chr1\t1\t2\nchr1\t150\t4\nchr2\t1\t9\n");
    let lengths = HashMap::from([("chr1".to_string(), 50_000)]);
    let refs = parse_depth(tmpfile.path(), &lengths).unwrap();
    assert_eq!(refs[0].bin_size(), 100);
    assert_eq!(refs[0].binned(1), vec![(0, 2.0), (100, 4.0)]);
    // not in idxstats
    assert_eq!(refs[1].bin_size(), 1);
}

#[test]
fn test_parse_depth_long_reference_stays_bounded() {
    let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
    {
        let mut out = std::io::BufWriter::new(tmpfile.as_file_mut());
        for pos in 1..=3 * MAX_BINS as u32 {
            writeln!(out, "chr1\t{}\t{}", pos, pos % 5).unwrap();
        }
    }
    let refs = parse_depth(tmpfile.path(), &HashMap::new()).unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].positions(), 3 * MAX_BINS as u64);
    assert!(refs[0].binned(1).len() <= MAX_BINS);
    assert!(refs[0].bin_size() > 1);
    assert!((refs[0].mean() - 2.0).abs() < 1e-9);
    assert_eq!(refs[0].histogram().len(), 5);
}

#[test]
fn test_parse_depth_reports_bad_line() {
    let tmpfile = depth_file("chr1\t1\t2\nchr1\ttwo\t3\n");
    match parse_depth(tmpfile.path(), &HashMap::new()) {
        Err(PipelineError::DepthParse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_depth_short_line() {
    let tmpfile = depth_file("chr1\t1\n");
    assert!(matches!(
        parse_depth(tmpfile.path(), &HashMap::new()),
        Err(PipelineError::DepthParse { line: 1, .. })
    ));
}

#[test]
fn test_parse_depth_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        parse_depth(&dir.path().join("absent.tsv"), &HashMap::new()),
        Err(PipelineError::Io { .. })
    ));
}
