//! CSV round-trip and `dedupe-sample` pipeline tests against real files.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use recipe_trace_eval::cli::dedupe_sample;
use recipe_trace_eval::error::{AppError, DataError};
use recipe_trace_eval::traces::{load_traces, write_traces, SamplePlan};

const HEADER: &str = "query,dietary_restriction,trace_id,label,error,response";

fn write_fixture(path: &Path, rows: &[String]) {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    fs::write(path, text).unwrap();
}

fn fixture_rows(n_pass: usize, n_fail: usize) -> Vec<String> {
    let pass = (0..n_pass).map(|i| format!("\"Vegan pasta, idea {i}\",vegan,p{i},PASS,,\"Try lentil ragu {i}\""));
    let fail = (0..n_fail).map(|i| format!("Keto dessert {i},keto,f{i},FAIL,contains sugar,Have a brownie {i}"));
    pass.chain(fail).collect()
}

#[test]
fn test_load_traces_parses_columns() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("labeled_traces.csv");
    write_fixture(&input, &fixture_rows(1, 1));

    let traces = load_traces(&input).unwrap();
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0].query, "Vegan pasta, idea 0");
    assert_eq!(traces[0].error, None);
    assert_eq!(traces[0].response, "Try lentil ragu 0");
    assert_eq!(traces[1].error.as_deref(), Some("contains sugar"));
    assert!(traces[1].is_fail());
}

#[test]
fn test_load_traces_matches_columns_by_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reordered.csv");
    fs::write(
        &input,
        "trace_id,response,label,query,dietary_restriction,extra,error\n\
         t1,Tofu bowl,PASS,Lunch?,vegan,ignored,\n",
    )
    .unwrap();

    let traces = load_traces(&input).unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].trace_id, "t1");
    assert_eq!(traces[0].query, "Lunch?");
    assert_eq!(traces[0].response, "Tofu bowl");
}

#[test]
fn test_load_traces_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.csv");

    match load_traces(&missing) {
        Err(DataError::NotFound { path }) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_load_traces_missing_column() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "query,label\nq,PASS\n").unwrap();

    assert!(matches!(load_traces(&input), Err(DataError::Csv { .. })));
}

#[test]
fn test_write_then_load_preserves_rows() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    write_fixture(&input, &fixture_rows(2, 2));
    let traces = load_traces(&input).unwrap();

    let output = dir.path().join("nested").join("out.csv");
    write_traces(&output, &traces).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with(HEADER));
    assert_eq!(load_traces(&output).unwrap(), traces);
}

#[test]
fn test_write_empty_sample_keeps_header() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("empty.csv");
    write_traces(&output, &[]).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap().trim_end(), HEADER);
    assert!(load_traces(&output).unwrap().is_empty());
}

#[test]
fn test_dedupe_sample_pipeline() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("labeled_traces.csv");
    let mut rows = fixture_rows(15, 6);
    // exact duplicates of the first rows
    rows.extend(fixture_rows(3, 2));
    write_fixture(&input, &rows);

    let output = dir.path().join("sampled_labeled_traces.csv");
    let report = dedupe_sample(input.clone(), output.clone(), &SamplePlan::default()).unwrap();

    assert_eq!(report.loaded, 26);
    assert_eq!(report.deduped, 21);
    assert_eq!(report.available.pass, 15);
    assert_eq!(report.available.fail, 6);
    assert_eq!(report.sample.len(), 16);

    let written = load_traces(&output).unwrap();
    assert_eq!(written, report.sample);
    assert_eq!(written.iter().filter(|t| t.is_pass()).count(), 10);
    assert_eq!(written.iter().filter(|t| t.is_fail()).count(), 6);
}

#[test]
fn test_dedupe_sample_is_reproducible() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("labeled_traces.csv");
    write_fixture(&input, &fixture_rows(30, 30));

    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    dedupe_sample(input.clone(), first.clone(), &SamplePlan::default()).unwrap();
    dedupe_sample(input, second.clone(), &SamplePlan::default()).unwrap();

    assert_eq!(
        fs::read_to_string(first).unwrap(),
        fs::read_to_string(second).unwrap()
    );
}

#[test]
fn test_dedupe_sample_missing_input() {
    let dir = tempdir().unwrap();
    let result = dedupe_sample(
        dir.path().join("labeled_traces.csv"),
        dir.path().join("out.csv"),
        &SamplePlan::default(),
    );

    assert!(matches!(
        result,
        Err(AppError::Data(DataError::NotFound { .. }))
    ));
    assert!(!dir.path().join("out.csv").exists());
}
