// src/grid.rs
use serde::Serialize;
use tracing::{debug, warn};

/// Pasted schedule as rows of raw cell strings.
///
/// `rows[r][0]` is the shift-time label column, `rows[r][1..=14]` are the
/// fourteen days of the biweekly period starting on a Saturday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleGrid {
    rows: Vec<Vec<String>>,
}

impl ScheduleGrid {
    /// Splits tab/newline-delimited clipboard text into a grid.
    ///
    /// Spreadsheets wrap a cell holding a line break in double quotes. Newlines
    /// found inside such a quoted span are collapsed to one space and the quote
    /// characters are dropped, so the cell stays on its own row.
    pub fn load(raw: &str) -> Self {
        let mut normalized = String::with_capacity(raw.len());
        let mut in_quotes = false;

        for ch in raw.chars() {
            match ch {
                '"' => in_quotes = !in_quotes,
                '\n' if in_quotes => normalized.push(' '),
                _ => normalized.push(ch),
            }
        }
        if in_quotes {
            warn!("Schedule text ends inside a quoted cell; grid may be malformed");
        }

        let rows: Vec<Vec<String>> = normalized
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();

        let grid = Self { rows };
        if !grid.is_rectangular() {
            warn!("Schedule rows have differing column counts; weekday indexing may be off");
        }
        debug!("Loaded schedule grid: {} rows x {} columns", grid.row_count(), grid.column_count());
        grid
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count of the first row.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.rows.iter().all(|r| r.len() == width)
    }
}

#[cfg(test)]
mod grid_tests {
    use super::*;

    #[test]
    fn splits_rows_on_newline_and_cells_on_tab() {
        let grid = ScheduleGrid::load("a\tb\tc\n1\t2\t3");
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 3);
        assert_eq!(grid.cell(1, 2), Some("3"));
        assert_eq!(grid.cell(2, 0), None);
        assert!(grid.is_rectangular());
    }

    #[test]
    fn quoted_line_break_collapses_into_one_cell() {
        let raw = "\"12:00-8:00pm\nOn Call Shift\"\tSUE\tTIM\n0700-1500\tKT\t";
        let grid = ScheduleGrid::load(raw);
        assert_eq!(grid.row_count(), 2, "quoted newline must not start a new row");
        assert_eq!(grid.cell(0, 0), Some("12:00-8:00pm On Call Shift"));
        assert_eq!(grid.cell(0, 2), Some("TIM"));
        assert_eq!(grid.cell(1, 2), Some(""));
    }

    #[test]
    fn windows_line_endings_are_stripped() {
        let grid = ScheduleGrid::load("0700-1500\tSUE\r\n0800-1600\tTIM\r\n");
        assert_eq!(grid.cell(0, 1), Some("SUE"));
        assert_eq!(grid.cell(1, 1), Some("TIM"));
        // trailing newline yields one final empty row, as a plain split would
        assert_eq!(grid.row(2), Some(&[String::new()][..]));
    }

    #[test]
    fn ragged_rows_are_kept_not_rejected() {
        let grid = ScheduleGrid::load("a\tb\tc\nd");
        assert!(!grid.is_rectangular());
        assert_eq!(grid.row(1).map(|r| r.len()), Some(1));
    }
}
