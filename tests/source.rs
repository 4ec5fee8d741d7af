use std::fs;
use std::path::PathBuf;

use league_analyzer::export::{self, RunSummary};
use league_analyzer::positions;
use league_analyzer::source::{self, DataSource, FetchOptions};
use league_analyzer::style;
use league_analyzer::synthetic;
use league_analyzer::{AggregateOptions, aggregate};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-9)
}

#[test]
fn csv_fixture_aggregates_the_qualifying_league() {
    let source = DataSource::File(fixture_path("players_small.csv"));
    let loaded = source::load_with_fallback(&source, &FetchOptions::default(), 1);
    assert!(!loaded.used_fallback);
    assert_eq!(loaded.table.len(), 16);

    let out = aggregate(&loaded.table, &AggregateOptions::default()).expect("aggregates");
    assert_eq!(out.leagues.len(), 1);
    assert_eq!(out.unassigned_rows, 1);
    assert_eq!(out.dropped.len(), 1);
    assert_eq!(out.dropped[0].league, "es La Liga");

    let row = out.leagues.row("eng Premier League").expect("kept");
    assert_eq!(row.players, 11);
    assert_eq!(row.squads, 3);
    assert!(close(row.get("Shots Per 90"), 204.0 / 106.5));
    assert!(close(row.get("Shot on Target %"), 100.0 * 75.0 / 204.0));
    assert!(close(row.get("Conversion Rate"), 100.0 * 39.0 / 204.0));
    assert!(close(row.get("Box Touches %"), 100.0 * 531.0 / 14978.0));
    assert!(close(row.get("Corners Per Match"), 26.0));
    assert!(close(row.get("Corner Success Rate (%)"), 100.0 * 27.0 / 78.0));
    assert!(close(row.get("Pass Completion %"), (78.5 + 84.1 + 88.0) / 3.0));

    // Default 5.0 nineties filter keeps only the two regular roles.
    assert_eq!(out.players.len(), 6);
    let positions: Vec<&str> = out
        .players
        .records
        .iter()
        .map(|p| positions::primary_position(p.position.as_deref()))
        .collect();
    assert!(positions.iter().all(|p| *p == "FW" || *p == "DF"));
    assert!(out.players.has_column("Touches Touches"));
    assert!(!out.players.has_column("KP"));
}

#[test]
fn missing_file_falls_back_to_synthetic() {
    let source = DataSource::File(fixture_path("does_not_exist.csv"));
    let loaded = source::load_with_fallback(&source, &FetchOptions::default(), 13);
    assert!(loaded.used_fallback);
    assert_eq!(loaded.source, DataSource::Synthetic { seed: 13 });
    assert_eq!(loaded.table, synthetic::generate(13));
}

#[test]
fn empty_csv_is_a_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.csv");
    fs::write(&path, "Player,Squad,Competition\n").expect("write csv");
    let err = source::load(&DataSource::File(path), &FetchOptions::default()).expect_err("empty");
    assert!(err.to_string().contains("no player rows"));
}

#[test]
fn export_writes_tables_and_summary() {
    let table = synthetic::generate(21);
    let out = aggregate(&table, &AggregateOptions::default()).expect("aggregates");
    let styles = style::classify(&out.leagues);
    let summary = RunSummary::new(&out, "synthetic (seed 21)", true);

    let dir = tempfile::tempdir().expect("tempdir");
    let report = export::export_all(dir.path(), &out, &styles, &summary, true).expect("export");
    assert_eq!(report.files.len(), 4);
    assert!(report.files.iter().all(|f| f.exists()));

    let mut reader = csv::Reader::from_path(dir.path().join(export::LEAGUES_CSV)).expect("league csv");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "League");
    assert_eq!(headers.len(), 3 + out.leagues.metrics.len());
    assert_eq!(reader.records().count(), out.leagues.len());

    let players = fs::read_to_string(dir.path().join(export::PLAYERS_CSV)).expect("player csv");
    assert_eq!(players.lines().count(), out.players.len() + 1);

    let raw = fs::read_to_string(dir.path().join(export::SUMMARY_JSON)).expect("summary");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["used_fallback"], serde_json::Value::Bool(true));
    assert_eq!(json["leagues"], serde_json::json!(5));
    assert!(
        json["estimate_metrics"]
            .as_array()
            .is_some_and(|a| a.iter().any(|m| m == "Corners Per Match"))
    );
}

#[test]
fn exported_league_csv_loads_back_as_a_table() {
    let out = aggregate(&synthetic::generate(2), &AggregateOptions::default()).expect("aggregates");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("leagues.csv");
    export::export_league_csv(&path, &out.leagues).expect("export");

    let file = fs::File::open(&path).expect("open");
    let table = league_analyzer::RawTable::from_csv_reader(file).expect("parse");
    assert_eq!(table.len(), out.leagues.len());
    let first = &table.records()[0];
    let expected = out.leagues.rows[0].get("Shots Per 90").expect("present");
    assert_eq!(first.number("Shots Per 90"), Some(expected));
}
