#![cfg(unix)]

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;
use treespec::treegen::shapes::{self, TreeKind};

fn case(n: usize, kind: TreeKind) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(shapes::generate(n, kind, 1).to_input_string().as_bytes())
        .unwrap();
    file
}

fn judge(files: &[&NamedTempFile], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_judge"))
        .args(files.iter().map(|f| f.path()))
        .args(args)
        .output()
        .unwrap()
}

/// The summary lines on stdout, each split into its columns minus the file name.
fn summaries(out: &Output) -> Vec<Vec<String>> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(|line| line.split_whitespace().skip(1).map(String::from).collect())
        .collect()
}

#[test]
fn full_credit_exits_zero() {
    let file = case(10, TreeKind::Random);
    let out = judge(&[&file], &[]);
    assert_eq!(summaries(&out), vec![vec!["AC", "1", "45", "1/1", "100.00"]]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stderr).contains("!log status AC"));
}

#[test]
fn partial_credit_exits_nonzero() {
    let file = case(30, TreeKind::Path);
    let out = judge(&[&file], &[]);
    assert_eq!(summaries(&out), vec![vec!["OK", "1", "435", "1/1", "88.18"]]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn protocol_error_prints_error_line() {
    let file = case(10, TreeKind::Star);
    let bob = r#"read h; echo '{"op":"move","target":1}'; read r"#;
    let out = judge(&[&file], &["--bob", bob]);
    assert_eq!(summaries(&out), vec![vec!["ER", "1", "-", "-", "0.00"]]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("PROTOCOL ERROR: move() called before explore()"));
    assert!(stderr.contains("!log status ER"));
}

#[test]
fn missing_answer_is_wrong_answer() {
    let file = case(10, TreeKind::Star);
    let out = judge(&[&file], &["--bob", "read h"]);
    assert_eq!(summaries(&out), vec![vec!["WA", "1", "0", "0/1", "0.00"]]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn one_line_per_file() {
    let good = case(10, TreeKind::Random);
    let also_good = case(12, TreeKind::Comb);
    let out = judge(&[&good, &also_good], &[]);
    assert_eq!(summaries(&out).len(), 2);
    assert_eq!(out.status.code(), Some(0));

    let partial = case(30, TreeKind::Path);
    let out = judge(&[&good, &partial], &[]);
    let lines = summaries(&out);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0][0], "AC");
    assert_eq!(lines[1][0], "OK");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unreadable_test_file_prints_error_line() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"3\n1 2\n").unwrap();
    let out = judge(&[&file], &[]);
    assert_eq!(summaries(&out), vec![vec!["ER", "-", "-", "-", "0.00"]]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn start_zero_picks_at_random() {
    let file = case(10, TreeKind::Binary);
    let out = judge(&[&file], &["--start", "0"]);
    assert_eq!(summaries(&out), vec![vec!["AC", "1", "45", "1/1", "100.00"]]);

    let out = judge(&[&file], &["--start", "2"]);
    assert_eq!(summaries(&out), vec![vec!["ER", "1", "-", "-", "0.00"]]);
}
