use std::collections::{BTreeMap, HashSet};
use std::io::Read;

pub const PLAYER_COLUMN: &str = "Player";
pub const SQUAD_COLUMN: &str = "Squad";
pub const COMPETITION_COLUMN: &str = "Competition";
pub const POSITION_COLUMN: &str = "Pos";

/// Identity columns every record must be partitionable by.
pub const REQUIRED_IDENTITY_COLUMNS: [&str; 3] = [PLAYER_COLUMN, COMPETITION_COLUMN, SQUAD_COLUMN];

/// Identity columns carried through to the player projection, in output order.
pub const IDENTITY_COLUMNS: [&str; 4] = [
    PLAYER_COLUMN,
    SQUAD_COLUMN,
    COMPETITION_COLUMN,
    POSITION_COLUMN,
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Number(_) => None,
            Cell::Text(raw) => parse_number(raw),
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(v) if v.is_finite() => Some(v.to_string()),
            Cell::Number(_) => None,
        }
    }
}

/// One raw player-season row. A column with no cell is simply missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    cells: BTreeMap<String, Cell>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, column: &str, value: &str) -> Self {
        self.insert(column, Cell::Text(value.to_string()));
        self
    }

    pub fn with_number(mut self, column: &str, value: f64) -> Self {
        self.insert(column, Cell::Number(value));
        self
    }

    pub fn insert(&mut self, column: &str, cell: Cell) {
        self.cells.insert(column.to_string(), cell);
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.cells.get(column).and_then(Cell::as_number)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.cells.get(column).and_then(Cell::as_text)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A wide, sparse raw table: the column list plus the records in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    records: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, records: Vec<RawRecord>) -> Self {
        let mut seen = HashSet::new();
        let columns = columns
            .into_iter()
            .filter(|c| !c.trim().is_empty() && seen.insert(c.clone()))
            .collect();
        Self { columns, records }
    }

    /// Builds a table whose columns are the union of the record keys, in first-seen order.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in &records {
            for column in record.columns() {
                if seen.insert(column.to_string()) {
                    columns.push(column.to_string());
                }
            }
        }
        Self { columns, records }
    }

    /// Reads a headered CSV. Blank fields become missing cells; identity
    /// columns stay text, everything else is parsed as a number when it looks like one.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let mut record = RawRecord::new();
            for (header, field) in headers.iter().zip(row.iter()) {
                if header.is_empty() {
                    continue;
                }
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                let cell = if IDENTITY_COLUMNS.contains(&header.as_str()) {
                    Cell::Text(field.to_string())
                } else {
                    match parse_number(field) {
                        Some(v) => Cell::Number(v),
                        None => Cell::Text(field.to_string()),
                    }
                };
                record.insert(header, cell);
            }
            records.push(record);
        }

        Ok(Self::new(headers, records))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn column_set(&self) -> HashSet<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses provider numbers such as `1,234`, `45.2%` or ` 3 `. Blank and `-` are missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let s = s.trim_end_matches('%').trim();
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ',' | 'e' | 'E'))
    {
        return None;
    }
    let cleaned = s.replace(',', "");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_handles_provider_formats() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number(" 45.5% "), Some(45.5));
        assert_eq!(parse_number("-2.5"), Some(-2.5));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("FW,MF"), None);
        assert_eq!(parse_number("eng ENG"), None);
    }

    #[test]
    fn csv_blank_fields_are_missing_cells() {
        let raw = "Player,Squad,Competition,Pos,Standard Sh,Expected xG\n\
                   A,Alpha,League A,FW,10,\n\
                   B,Beta,League A,\"DF,MF\",,1.5\n";
        let table = RawTable::from_csv_reader(raw.as_bytes()).expect("csv should parse");
        assert_eq!(table.len(), 2);
        assert!(table.has_column("Expected xG"));
        let first = &table.records()[0];
        assert_eq!(first.number("Standard Sh"), Some(10.0));
        assert!(first.get("Expected xG").is_none());
        let second = &table.records()[1];
        assert_eq!(second.text("Pos").as_deref(), Some("DF,MF"));
        assert!(second.get("Standard Sh").is_none());
    }

    #[test]
    fn csv_skips_unnamed_index_column() {
        let raw = ",Player,Squad,Competition\n0,A,Alpha,League A\n";
        let table = RawTable::from_csv_reader(raw.as_bytes()).expect("csv should parse");
        assert_eq!(table.columns(), &["Player", "Squad", "Competition"]);
        assert_eq!(table.records()[0].len(), 3);
    }

    #[test]
    fn from_records_unions_columns_in_first_seen_order() {
        let table = RawTable::from_records(vec![
            RawRecord::new().with_text("Player", "A").with_number("KP", 1.0),
            RawRecord::new().with_text("Player", "B").with_number("Int", 2.0),
        ]);
        assert_eq!(table.columns(), &["KP", "Player", "Int"]);
    }
}
