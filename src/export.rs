use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::catalog;
use crate::defaults::{CellOrigin, LeagueTable};
use crate::pipeline::Aggregation;
use crate::positions;
use crate::projection::PlayerTable;
use crate::style::{self, COMPARISON_METRICS, LeagueStyle};

pub const LEAGUES_CSV: &str = "league_metrics.csv";
pub const PLAYERS_CSV: &str = "player_metrics.csv";
pub const SUMMARY_JSON: &str = "summary.json";
pub const WORKBOOK: &str = "league_metrics.xlsx";

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Number(f64),
    Empty,
}

impl Value {
    fn text(s: &str) -> Self {
        Value::Text(s.to_string())
    }

    fn as_csv(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(v) => v.to_string(),
            Value::Empty => String::new(),
        }
    }
}

type Rows = Vec<Vec<Value>>;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub source: String,
    pub used_fallback: bool,
    pub leagues: usize,
    pub players: usize,
    pub dropped_leagues: Vec<String>,
    pub estimate_metrics: Vec<&'static str>,
    /// Defaulted cell count per league.
    pub defaulted_cells: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn new(aggregation: &Aggregation, source: &str, used_fallback: bool) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            source: source.to_string(),
            used_fallback,
            leagues: aggregation.leagues.len(),
            players: aggregation.players.len(),
            dropped_leagues: aggregation.dropped.iter().map(|d| d.league.clone()).collect(),
            estimate_metrics: catalog::estimate_metrics().collect(),
            defaulted_cells: aggregation
                .leagues
                .rows
                .iter()
                .map(|r| (r.league.clone(), r.defaulted_count()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
}

fn league_rows(table: &LeagueTable) -> Rows {
    let mut header = vec![Value::text("League"), Value::text("Players"), Value::text("Squads")];
    header.extend(table.metrics.iter().map(|m| Value::text(m)));
    let mut rows = vec![header];
    for row in &table.rows {
        let mut out = vec![
            Value::Text(row.league.clone()),
            Value::Number(row.players as f64),
            Value::Number(row.squads as f64),
        ];
        out.extend(row.cells.iter().map(|c| Value::Number(c.value)));
        rows.push(out);
    }
    rows
}

fn origin_rows(table: &LeagueTable) -> Rows {
    let mut header = vec![Value::text("League")];
    header.extend(table.metrics.iter().map(|m| Value::text(m)));
    let mut rows = vec![header];
    for row in &table.rows {
        let mut out = vec![Value::Text(row.league.clone())];
        out.extend(row.cells.iter().map(|c| {
            Value::text(match c.origin {
                CellOrigin::Computed => "computed",
                CellOrigin::Defaulted => "default",
            })
        }));
        rows.push(out);
    }
    rows
}

fn player_rows(table: &PlayerTable) -> Rows {
    let mut header = vec![
        Value::text("Player"),
        Value::text("Squad"),
        Value::text("Competition"),
        Value::text("Pos"),
        Value::text("Primary Position"),
    ];
    header.extend(table.columns.iter().map(|c| Value::text(c)));
    let mut rows = vec![header];
    for record in &table.records {
        let mut out = vec![
            Value::Text(record.player.clone()),
            Value::Text(record.squad.clone()),
            Value::Text(record.competition.clone()),
            record
                .position
                .as_deref()
                .map(Value::text)
                .unwrap_or(Value::Empty),
            Value::text(positions::primary_position(record.position.as_deref())),
        ];
        out.extend(
            record
                .values
                .iter()
                .map(|v| v.map(Value::Number).unwrap_or(Value::Empty)),
        );
        rows.push(out);
    }
    rows
}

fn style_rows(styles: &[LeagueStyle]) -> Rows {
    let mut axes: Vec<&str> = Vec::new();
    for style in styles {
        for &(axis, _) in &style.labels {
            if !axes.contains(&axis) {
                axes.push(axis);
            }
        }
    }
    let mut header = vec![Value::text("League")];
    header.extend(axes.iter().map(|a| Value::text(a)));
    let mut rows = vec![header];
    for style in styles {
        let mut out = vec![Value::Text(style.league.clone())];
        out.extend(axes.iter().map(|a| {
            style
                .label(a)
                .map(Value::text)
                .unwrap_or(Value::Empty)
        }));
        rows.push(out);
    }
    rows
}

fn comparison_rows(table: &LeagueTable) -> Rows {
    let metrics: Vec<&str> = COMPARISON_METRICS
        .iter()
        .copied()
        .filter(|m| catalog::rule_for(m).is_some())
        .collect();
    let scaled = style::normalized_comparison(table, &metrics);
    let mut header = vec![Value::text("League")];
    header.extend(metrics.iter().map(|m| Value::text(m)));
    let mut rows = vec![header];
    for (league, values) in &scaled {
        let mut out = vec![Value::Text(league.clone())];
        out.extend(metrics.iter().map(|m| {
            values
                .iter()
                .find(|(name, _)| name.as_str() == *m)
                .map(|(_, v)| Value::Number(*v))
                .unwrap_or(Value::Empty)
        }));
        rows.push(out);
    }
    rows
}

fn position_rows(players: &PlayerTable) -> Rows {
    let metrics: Vec<&str> = positions::BREAKDOWN_COLUMNS
        .iter()
        .copied()
        .filter(|c| players.has_column(c))
        .collect();
    let breakdowns: Vec<_> = metrics
        .iter()
        .map(|m| positions::position_breakdown(players, m))
        .collect();

    let mut header = vec![Value::text("League"), Value::text("Position"), Value::text("Players")];
    header.extend(metrics.iter().map(|m| Value::Text(format!("{m} (mean)"))));
    let mut rows = vec![header];
    for ((league, position), count) in positions::position_counts(players) {
        let mut out = vec![
            Value::Text(league.clone()),
            Value::Text(position.clone()),
            Value::Number(count as f64),
        ];
        out.extend(breakdowns.iter().map(|summaries| {
            summaries
                .iter()
                .find(|s| s.league == league && s.position == position)
                .and_then(|s| s.mean)
                .map(Value::Number)
                .unwrap_or(Value::Empty)
        }));
        rows.push(out);
    }
    rows
}

fn write_csv(path: &Path, rows: &Rows) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    for row in rows {
        writer
            .write_record(row.iter().map(Value::as_csv))
            .with_context(|| format!("failed writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed flushing {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &Rows) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match value {
                Value::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Value::Number(v) => {
                    worksheet.write_number(r, c, *v)?;
                }
                Value::Empty => {}
            }
        }
    }
    Ok(())
}

pub fn export_league_csv(path: &Path, table: &LeagueTable) -> Result<()> {
    write_csv(path, &league_rows(table))
}

pub fn export_player_csv(path: &Path, table: &PlayerTable) -> Result<()> {
    write_csv(path, &player_rows(table))
}

pub fn export_workbook(path: &Path, aggregation: &Aggregation, styles: &[LeagueStyle]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheets = [
        ("Leagues", league_rows(&aggregation.leagues)),
        ("Origins", origin_rows(&aggregation.leagues)),
        ("Players", player_rows(&aggregation.players)),
        ("Styles", style_rows(styles)),
        ("Comparison", comparison_rows(&aggregation.leagues)),
        ("Positions", position_rows(&aggregation.players)),
    ];
    for (name, rows) in &sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_rows(sheet, rows).with_context(|| format!("failed writing sheet {name}"))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
    fs::write(path, json).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

/// Writes both CSVs and the summary into `out_dir`, plus the workbook when `xlsx` is set.
pub fn export_all(
    out_dir: &Path,
    aggregation: &Aggregation,
    styles: &[LeagueStyle],
    summary: &RunSummary,
    xlsx: bool,
) -> Result<ExportReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed creating {}", out_dir.display()))?;

    let mut files = Vec::new();
    let leagues_path = out_dir.join(LEAGUES_CSV);
    export_league_csv(&leagues_path, &aggregation.leagues)?;
    files.push(leagues_path);

    let players_path = out_dir.join(PLAYERS_CSV);
    export_player_csv(&players_path, &aggregation.players)?;
    files.push(players_path);

    let summary_path = out_dir.join(SUMMARY_JSON);
    write_summary(&summary_path, summary)?;
    files.push(summary_path);

    if xlsx {
        let workbook_path = out_dir.join(WORKBOOK);
        export_workbook(&workbook_path, aggregation, styles)?;
        files.push(workbook_path);
    }

    tracing::info!(dir = %out_dir.display(), files = files.len(), "exported results");
    Ok(ExportReport { files })
}
