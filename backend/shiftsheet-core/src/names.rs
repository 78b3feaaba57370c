// src/names.rs
use serde::Serialize;

use crate::config::ScheduleRules;
use crate::roster::{Employee, Roster};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCell {
    pub is_multi: bool,
    /// Name tokens in cell order; `[""]` for a cell without any name.
    pub names: Vec<String>,
}

impl ParsedCell {
    /// The name assumed to hold the shift when several are listed.
    pub fn last_name(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.names.len() == 1 && self.names[0].is_empty()
    }
}

pub struct CellNameResolver<'a> {
    rules: &'a ScheduleRules,
}

impl<'a> CellNameResolver<'a> {
    pub fn new(rules: &'a ScheduleRules) -> Self {
        Self { rules }
    }

    /// Splits a cell into names.
    ///
    /// Annotation markers ("W/E", "STAT") are dropped, and a trailing token
    /// shorter than two characters is an initial that belongs to the previous
    /// name ("JENNIFER W"), not a second person.
    pub fn parse_cell(&self, raw: &str) -> ParsedCell {
        let mut names: Vec<String> = raw
            .trim()
            .to_uppercase()
            .split_whitespace()
            .filter(|t| !self.rules.is_annotation(t))
            .map(str::to_string)
            .collect();

        if names.len() >= 2 && names.last().is_some_and(|t| t.chars().count() < 2) {
            if let Some(initial) = names.pop() {
                if let Some(previous) = names.last_mut() {
                    previous.push(' ');
                    previous.push_str(&initial);
                }
            }
        }

        if names.is_empty() {
            names.push(String::new());
        }

        ParsedCell {
            is_multi: names.len() >= 2,
            names,
        }
    }

    /// Whether the cell's shift belongs to `employee`. Only the last listed name counts.
    pub fn matches_target(&self, cell: &ParsedCell, employee: &Employee) -> bool {
        let last = cell.last_name();
        !last.is_empty() && employee.matches(last)
    }
}

/// Roster-wide lookup of a single name token.
pub fn match_roster_employee<'r>(token: &str, roster: &'r Roster) -> Option<(&'r String, &'r Employee)> {
    if token.trim().is_empty() {
        return None;
    }
    roster.match_employee(token)
}

#[cfg(test)]
mod names_tests {
    use super::*;
    use crate::roster::Gender;

    fn parse(raw: &str) -> ParsedCell {
        let rules = ScheduleRules::default();
        CellNameResolver::new(&rules).parse_cell(raw)
    }

    #[test]
    fn single_name_is_not_multi() {
        let cell = parse("  sue ");
        assert!(!cell.is_multi);
        assert_eq!(cell.names, vec!["SUE"]);
    }

    #[test]
    fn two_names_are_multi() {
        let cell = parse("Tim Kelvin");
        assert!(cell.is_multi);
        assert_eq!(cell.names, vec!["TIM", "KELVIN"]);
        assert_eq!(cell.last_name(), "KELVIN");
    }

    #[test]
    fn annotation_markers_do_not_count_as_names() {
        for raw in ["SUE STAT", "STAT SUE", "W/E SUE", "sue w/e"] {
            let cell = parse(raw);
            assert!(!cell.is_multi, "'{raw}' should be single-name");
            assert_eq!(cell.names, vec!["SUE"]);
        }
    }

    #[test]
    fn trailing_initial_disambiguates_first_name() {
        let cell = parse("Jennifer W");
        assert!(!cell.is_multi);
        assert_eq!(cell.names, vec!["JENNIFER W"]);

        // a three-name cell with an initial is still two people
        let cell = parse("Tim Sherri L");
        assert!(cell.is_multi);
        assert_eq!(cell.names, vec!["TIM", "SHERRI L"]);
    }

    #[test]
    fn blank_cell_yields_one_empty_name() {
        let cell = parse("   ");
        assert!(cell.is_empty());
        assert_eq!(cell.names, vec![""]);
        assert!(!cell.is_multi);
        assert!(parse("STAT").is_empty());
    }

    #[test]
    fn target_matching_uses_last_name_only() {
        let rules = ScheduleRules::default();
        let resolver = CellNameResolver::new(&rules);
        let tim = Employee::new("TIM", "TIM D", "TD", Some(Gender::Male));

        assert!(resolver.matches_target(&resolver.parse_cell("Sue TD"), &tim));
        assert!(resolver.matches_target(&resolver.parse_cell("Tim D"), &tim));
        // earlier tokens are treated as notes, not the shift holder
        assert!(!resolver.matches_target(&resolver.parse_cell("Tim Sue"), &tim));
        assert!(!resolver.matches_target(&resolver.parse_cell(""), &tim));
    }

    #[test]
    fn roster_match_skips_blank_tokens() {
        let roster = Roster::new().with("Sue Santiago", Employee::new("SUE", "SUE", "SS", Some(Gender::Female)));
        assert!(match_roster_employee("", &roster).is_none());
        assert_eq!(match_roster_employee("ss", &roster).map(|(k, _)| k.as_str()), Some("Sue Santiago"));
        assert!(match_roster_employee("NOBODY", &roster).is_none());
    }

    #[test]
    fn initialled_cells_resolve_against_bundled_roster() {
        let rules = ScheduleRules::default();
        let resolver = CellNameResolver::new(&rules);
        let roster = Roster::bundled().unwrap();

        for (raw, expected) in [
            ("Jennifer W", "Jennifer Wang"),
            ("Sherri L", "Sherri Linzon"),
            ("Tim D", "Tim Dang"),
            ("Sue", "Sue Santiago"),
        ] {
            let cell = resolver.parse_cell(raw);
            let matched = match_roster_employee(cell.last_name(), &roster).map(|(k, _)| k.as_str());
            assert_eq!(matched, Some(expected), "'{raw}' should resolve to {expected}");
        }

        let jennifer = roster.require("Jennifer Wang").unwrap();
        assert!(resolver.matches_target(&resolver.parse_cell("Jennifer W"), jennifer));
    }
}
