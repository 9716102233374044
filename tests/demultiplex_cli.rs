//! End-to-end tests driving the `barcoder` binary.

use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use barcoder::core::tag::reverse_complement;
use flate2::read::MultiGzDecoder;
use predicates::prelude::*;
use tempfile::TempDir;

const MID001: &str = "ACGAGTGCGT";
const MID002: &str = "ACGCTCGACA";
const MID003: &str = "AGACGCACTC";
const MID004: &str = "AGCACTGTAG";
const INSERT: &str = "TTGGCCAATTGGCCAATTGGCCAATTGGCCAATTGGCCAA";

const BARCODES: &str = "name\tsequence\n\
MID001\tACGAGTGCGT\n\
MID002\tACGCTCGACA\n\
MID003\tAGACGCACTC\n\
MID004\tAGCACTGTAG\n";

const READSETS: &str = "name\tmid5\tmid3\n\
Readset1\tMID001\tMID002\n\
Readset2\tMID002\tMID003\n\
Readset3\tMID003\tMID004\n\
Readset4\tMID004\t\n\
Readset5\tMID001\tMID004\n";

fn barcoder() -> Command {
    Command::cargo_bin("barcoder").unwrap()
}

fn write_fastq(path: &Path, reads: &[(&str, String)]) {
    let mut text = String::new();
    for (header, seq) in reads {
        text.push_str(&format!("@{header}\n{seq}\n+\n{}\n", "I".repeat(seq.len())));
    }
    fs::write(path, text).unwrap();
}

/// Four reads that each need one more kind of tolerance than the last
fn tolerance_reads() -> Vec<(&'static str, String)> {
    // one substitution in the sixth base of MID002
    let mid002_sub = "ACGCTGGACA";
    // MID004 with its first base missing
    let mid004_del = &MID004[1..];

    vec![
        ("exact", format!("{MID001}{INSERT}{}", reverse_complement(MID002))),
        ("mismatch", format!("{mid002_sub}{INSERT}{}", reverse_complement(MID003))),
        ("offset", format!("T{MID003}{INSERT}{}", reverse_complement(MID004))),
        ("deletion", format!("{mid004_del}{INSERT}")),
    ]
}

struct Fixture {
    dir: TempDir,
    barcodes: PathBuf,
    readsets: PathBuf,
    input: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let barcodes = dir.path().join("barcodes.tsv");
    let readsets = dir.path().join("readsets.tsv");
    let input = dir.path().join("reads.fastq");
    fs::write(&barcodes, BARCODES).unwrap();
    fs::write(&readsets, READSETS).unwrap();
    write_fastq(&input, &tolerance_reads());
    Fixture {
        dir,
        barcodes,
        readsets,
        input,
    }
}

fn run_json(fx: &Fixture, out: &Path, tolerances: (usize, usize, usize)) -> serde_json::Value {
    let (edit, offset, deletions) = tolerances;
    let output = barcoder()
        .args(["--format", "json", "demultiplex"])
        .arg("--barcodes")
        .arg(&fx.barcodes)
        .arg("--readsets")
        .arg(&fx.readsets)
        .arg("-o")
        .arg(out)
        .arg("-e")
        .arg(edit.to_string())
        .arg("--offset")
        .arg(offset.to_string())
        .arg("--deletions")
        .arg(deletions.to_string())
        .arg(&fx.input)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn total(map: &serde_json::Value) -> u64 {
    map.as_object()
        .map(|m| m.values().filter_map(serde_json::Value::as_u64).sum())
        .unwrap_or(0)
}

/// Every key counted in `before` is counted at least as often in `after`
fn assert_no_count_drops(before: &serde_json::Value, after: &serde_json::Value, label: &str) {
    for (key, count) in before.as_object().into_iter().flatten() {
        let old = count.as_u64().unwrap();
        let new = after[key.as_str()].as_u64().unwrap_or(0);
        assert!(new >= old, "{label} count for {key} dropped from {old} to {new}");
    }
}

fn count_records(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count() / 4
}

#[test]
fn test_tolerance_sweep_is_monotonic() {
    let fx = fixture();
    let sweep = [(0, 0, 0), (1, 0, 0), (1, 1, 0), (1, 1, 1)];

    let mut previous: Option<serde_json::Value> = None;
    for (i, tolerances) in sweep.into_iter().enumerate() {
        let out = fx.dir.path().join(format!("sweep{i}"));
        let report = run_json(&fx, &out, tolerances);
        let stats = &report["statistics"];

        assert_eq!(stats["total_reads"], 4);
        if let Some(prev) = &previous {
            for section in ["match5_counts", "match3_counts", "readset_counts"] {
                let label = format!("{section} at {tolerances:?}");
                assert_no_count_drops(&prev[section], &stats[section], &label);
            }
        }
        // each level rescues exactly one more read
        assert_eq!(total(&stats["readset_counts"]), i as u64 + 1);

        let written: usize = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "fastq"))
            .map(|p| count_records(&p))
            .sum();
        assert_eq!(written, 4);
        assert_eq!(total(&stats["bucket_counts"]), 4);

        previous = Some(stats.clone());
    }
}

#[test]
fn test_outputs_default_next_to_input() {
    let fx = fixture();
    barcoder()
        .arg("demultiplex")
        .arg("-b")
        .arg(&fx.barcodes)
        .arg("-r")
        .arg(&fx.readsets)
        .arg(&fx.input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Readset Match Summary:"))
        .stdout(predicate::str::contains("Readset1: 1 (25.00%)"));

    let trimmed = fs::read_to_string(fx.dir.path().join("reads_MID001_MID002.fastq")).unwrap();
    assert_eq!(trimmed.lines().nth(1), Some(INSERT));
    assert_eq!(count_records(&fx.dir.path().join("reads_unknowns.fastq")), 3);

    let summary = fs::read_to_string(fx.dir.path().join("reads.barcode-summary.txt")).unwrap();
    assert!(summary.starts_with("Readname\tReadset\t5' Barcode\t3' Barcode"));
    assert_eq!(summary.lines().count(), 5);
    assert!(!fx.dir.path().join("reads.barcode-detailed.txt").exists());
}

#[test]
fn test_gzip_outputs_and_detail_log() {
    let fx = fixture();
    let out = fx.dir.path().join("gz");
    barcoder()
        .arg("demultiplex")
        .arg("-b")
        .arg(&fx.barcodes)
        .arg("-r")
        .arg(&fx.readsets)
        .arg("-o")
        .arg(&out)
        .args(["--gzip", "--detail-log", "--no-summary-log"])
        .arg(&fx.input)
        .assert()
        .success();

    let mut text = String::new();
    MultiGzDecoder::new(fs::File::open(out.join("reads_MID001_MID002.fastq.gz")).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert!(text.starts_with("@exact\n"));

    let mut detail = String::new();
    MultiGzDecoder::new(fs::File::open(out.join("reads.barcode-detailed.txt.gz")).unwrap())
        .read_to_string(&mut detail)
        .unwrap();
    assert!(detail.starts_with("Readname\tBarcode\tEnd of Molecule"));
    // first base after the barcode, 1-based, and the full 60bp read
    assert!(detail.contains("exact\tMID001\t5'\t0\t0\t11\t60\tACGAGTGCGT\tACGAGTGCGT\n"));
    assert!(!out.join("reads.barcode-summary.txt.gz").exists());
}

#[test]
fn test_paired_end_input() {
    let dir = tempfile::tempdir().unwrap();
    let barcodes = dir.path().join("barcodes.csv");
    let readsets = dir.path().join("readsets.csv");
    fs::write(&barcodes, "name,sequence\nMID001,ACGAGTGCGT\nMID002,ACGCTCGACA\n").unwrap();
    fs::write(&readsets, "name,mid5,mid3\nPair1,MID001,MID002\n").unwrap();

    let r1 = dir.path().join("lane_R1.fastq");
    let r2 = dir.path().join("lane_R2.fastq");
    write_fastq(&r1, &[("p1", format!("{MID001}{INSERT}")), ("p2", INSERT.to_string())]);
    write_fastq(&r2, &[("p1", format!("{MID002}{INSERT}")), ("p2", INSERT.to_string())]);

    barcoder()
        .args(["--format", "tsv", "demultiplex"])
        .arg("-b")
        .arg(&barcodes)
        .arg("-r")
        .arg(&readsets)
        .arg(&r1)
        .arg("--mate")
        .arg(&r2)
        .assert()
        .success()
        .stdout(predicate::str::contains("readset\tPair1\t1\n"))
        .stdout(predicate::str::contains("other_match\tNo Matches\t1\n"));

    assert_eq!(count_records(&dir.path().join("lane_R1_MID001_MID002.fastq")), 1);
    assert_eq!(count_records(&dir.path().join("lane_R2_MID001_MID002.fastq")), 1);
    assert_eq!(count_records(&dir.path().join("lane_R1_unknowns.fastq")), 1);
    assert_eq!(count_records(&dir.path().join("lane_R2_unknowns.fastq")), 1);
}

#[test]
fn test_header_barcodes() {
    let fx = fixture();
    let input = fx.dir.path().join("indexed.fastq");
    let header = format!("h1 1:N:0:{MID001}+{}", reverse_complement(MID002));
    write_fastq(&input, &[(header.as_str(), INSERT.to_string()), ("broken", INSERT.to_string())]);

    barcoder()
        .args(["--format", "tsv", "demultiplex", "--barcodes-in-header"])
        .arg("-b")
        .arg(&fx.barcodes)
        .arg("-r")
        .arg(&fx.readsets)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("total\tmalformed_headers\t1\n"))
        .stdout(predicate::str::contains("readset\tReadset1\t1\n"))
        .stderr(predicate::str::contains("Malformed read"));

    // header barcodes are not trimmed from the read body
    let kept = fs::read_to_string(fx.dir.path().join("indexed_MID001_MID002.fastq")).unwrap();
    assert_eq!(kept.lines().nth(1), Some(INSERT));
}

#[test]
fn test_unknown_barcode_in_readset_fails() {
    let fx = fixture();
    let readsets = fx.dir.path().join("bad_readsets.tsv");
    fs::write(&readsets, "name\tmid5\tmid3\nBad\tMID001\tMID999\n").unwrap();

    barcoder()
        .arg("demultiplex")
        .arg("-b")
        .arg(&fx.barcodes)
        .arg("-r")
        .arg(&readsets)
        .arg(&fx.input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("MID999"));

    assert!(!fx.dir.path().join("reads_unknowns.fastq").exists());
}

#[test]
fn test_readset_without_barcodes_fails() {
    let fx = fixture();
    let readsets = fx.dir.path().join("empty_readsets.tsv");
    fs::write(&readsets, "name\tmid5\tmid3\nNothing\t\t\n").unwrap();

    barcoder()
        .arg("demultiplex")
        .arg("-b")
        .arg(&fx.barcodes)
        .arg("-r")
        .arg(&readsets)
        .arg(&fx.input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing"));
}

#[test]
fn test_duplicate_barcode_name_fails() {
    let fx = fixture();
    let barcodes = fx.dir.path().join("dup.tsv");
    fs::write(&barcodes, "name\tsequence\nMID001\tACGT\nMID001\tTTTT\n").unwrap();

    barcoder()
        .arg("demultiplex")
        .arg("-b")
        .arg(&barcodes)
        .arg("-r")
        .arg(&fx.readsets)
        .arg(&fx.input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate barcode name"));
}

#[test]
fn test_barcodes_listing() {
    let fx = fixture();
    barcoder()
        .args(["--format", "tsv", "barcodes", "-b"])
        .arg(&fx.barcodes)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("name\tsequence\treverse_complement\n"))
        .stdout(predicate::str::contains("MID001\tACGAGTGCGT\tACGCACTCGT\n"));

    barcoder()
        .args(["--format", "json", "barcodes", "-b"])
        .arg(&fx.barcodes)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reverse_complement\": \"ACGCACTCGT\""));
}
