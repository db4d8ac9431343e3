use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::error::CleanError;

/// One value in the match table. The raw CSV is loosely typed, so a cell is
/// either text, a number, a parsed timestamp, or explicitly missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Num(f64),
    Date(NaiveDateTime),
    Missing,
}

impl Cell {
    /// Infer a cell from a raw CSV field. Empty fields are missing, numeric
    /// fields become numbers, everything else stays text.
    pub fn from_raw(raw: &str) -> Cell {
        if raw.is_empty() {
            return Cell::Missing;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Num(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Cell::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// String form used when writing the table back out as CSV.
    /// Missing cells become empty fields.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Num(n) => format!("{n}"),
            Cell::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Missing => String::new(),
        }
    }
}

/// Deterministic total order over cells so the stable sorter has no
/// residual ambiguity: missing first, then numbers, dates, text. Sort key
/// columns hold one type in practice; the cross-type ranking only exists to
/// keep the order total.
pub fn cmp_cells(a: &Cell, b: &Cell) -> Ordering {
    fn rank(cell: &Cell) -> u8 {
        match cell {
            Cell::Missing => 0,
            Cell::Num(_) => 1,
            Cell::Date(_) => 2,
            Cell::Text(_) => 3,
        }
    }
    match (a, b) {
        (Cell::Missing, Cell::Missing) => Ordering::Equal,
        (Cell::Num(x), Cell::Num(y)) => x.total_cmp(y),
        (Cell::Date(x), Cell::Date(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// In-memory match table: named columns over row-major storage. Each
/// pipeline stage consumes one table and returns a new one; nothing aliases
/// back into earlier outputs.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row width must match the table header"
        );
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, CleanError> {
        self.column_index(name)
            .ok_or_else(|| CleanError::MissingColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    /// Clone one column out as a flat vector (the opponent enricher works on
    /// whole columns at a time).
    pub fn column_values(&self, col: usize) -> Vec<Cell> {
        self.rows.iter().map(|row| row[col].clone()).collect()
    }

    /// Append a computed column on the right.
    pub fn push_column(&mut self, name: &str, cells: Vec<Cell>) {
        assert_eq!(
            cells.len(),
            self.rows.len(),
            "column height must match the table"
        );
        self.columns.push(name.to_string());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(idx) = self.column_index(from) {
            self.columns[idx] = to.to_string();
        }
    }

    /// Apply a function to every cell of one column in place.
    pub fn map_column(&mut self, col: usize, mut f: impl FnMut(&mut Cell)) {
        for row in &mut self.rows {
            f(&mut row[col]);
        }
    }

    /// Fallible variant of [`map_column`](Self::map_column); the first error
    /// aborts the pass.
    pub fn try_map_column(
        &mut self,
        col: usize,
        mut f: impl FnMut(&mut Cell) -> Result<(), CleanError>,
    ) -> Result<(), CleanError> {
        for row in &mut self.rows {
            f(&mut row[col])?;
        }
        Ok(())
    }

    /// Keep only rows satisfying the predicate, preserving order. Returns
    /// how many rows were dropped.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[Cell]) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }

    /// Stable sort of the rows by the given key columns, in priority order.
    /// Ties keep their original relative order.
    pub fn sort_rows_by(&mut self, key_cols: &[usize]) {
        self.rows.sort_by(|a, b| {
            for &col in key_cols {
                let ord = cmp_cells(&a[col], &b[col]);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }

    /// Project onto the named columns, in the given order, discarding the
    /// rest. Fails if any requested column is absent.
    pub fn select(&self, names: &[String]) -> Result<Table, CleanError> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            indices.push(self.require_column(name)?);
        }
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table {
            columns: names.to_vec(),
            rows,
        })
    }

    /// Row counts keyed by the rendered value of one column. Missing cells
    /// are skipped.
    pub fn value_counts(&self, col: usize) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for row in &self.rows {
            if !row[col].is_missing() {
                *counts.entry(row[col].render()).or_insert(0) += 1;
            }
        }
        counts
    }
}
