// src/shift.rs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    /// Spreadsheet-style cell reference ("B3"): letter column, 1-based row.
    pub fn to_excel(&self) -> String {
        let mut col = self.col + 1;
        let mut letters = Vec::new();
        while col > 0 {
            let rem = (col - 1) % 26;
            letters.push(char::from(b'A' + rem as u8));
            col = (col - 1) / 26;
        }
        letters.iter().rev().collect::<String>() + &(self.row + 1).to_string()
    }
}

/// One schedule cell read as a shift. `weekday` is the column index, 1..=14.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shift {
    pub coordinate: Coordinate,
    pub weekday: usize,
    pub location: String,
    pub shift_time: String,
    pub names: Vec<String>,
}

impl Shift {
    pub fn new(row: usize, col: usize, location: &str, shift_time: &str, names: Vec<String>) -> Self {
        Self {
            coordinate: Coordinate { row, col },
            weekday: col,
            location: location.to_string(),
            shift_time: shift_time.to_string(),
            names,
        }
    }
}

#[cfg(test)]
mod shift_tests {
    use super::*;

    #[test]
    fn excel_reference_is_letter_then_one_based_row() {
        assert_eq!(Coordinate { row: 0, col: 0 }.to_excel(), "A1");
        assert_eq!(Coordinate { row: 6, col: 3 }.to_excel(), "D7");
        assert_eq!(Coordinate { row: 9, col: 25 }.to_excel(), "Z10");
        assert_eq!(Coordinate { row: 0, col: 26 }.to_excel(), "AA1");
    }

    #[test]
    fn weekday_follows_column() {
        let s = Shift::new(4, 7, "GENERAL", "ON-CALL", vec!["SUE".into()]);
        assert_eq!(s.weekday, 7);
        assert_eq!(s.coordinate, Coordinate { row: 4, col: 7 });
    }
}
