// src/shift_times.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::{ScheduleRules, BIWEEKLY};
use crate::grid::ScheduleGrid;

// Unambiguous 24-hour range, e.g. "0700-1500" or "07:00-15:00"
static TWENTY_FOUR_HOUR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):?(\d{2})-(\d{2}):?(\d{2})$").expect("static regex is valid")
});

// Canonical form produced by normalization
static CLOCK_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}-\d{2}:\d{2}$").expect("static regex is valid"));

/// True for a normalized "HH:MM-HH:MM" shift time, aliased or not.
pub fn is_clock_range(shift_time: &str) -> bool {
    CLOCK_RANGE.is_match(shift_time)
}

/// Resolved shift-time and location for one grid row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftTimeContext {
    pub row: usize,
    pub location: String,
    pub shift_time: String,
    /// Label inherited from a row above because this row's label cell was blank.
    pub shift_time_cascaded: bool,
}

/// Row index to resolved context, computed once per parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShiftTimeMap {
    contexts: Vec<ShiftTimeContext>,
}

impl ShiftTimeMap {
    pub fn get(&self, row: usize) -> Option<&ShiftTimeContext> {
        self.contexts.get(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShiftTimeContext> {
        self.contexts.iter()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// First row carrying `shift_time` at `location`.
    pub fn first_row_of(&self, shift_time: &str, location: &str) -> Option<usize> {
        self.contexts
            .iter()
            .find(|c| c.shift_time == shift_time && c.location == location)
            .map(|c| c.row)
    }
}

pub struct ShiftTimeResolver<'a> {
    rules: &'a ScheduleRules,
    aliases: HashMap<String, String>,
}

fn label_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl<'a> ShiftTimeResolver<'a> {
    pub fn new(rules: &'a ScheduleRules) -> Self {
        let mut aliases = HashMap::new();
        for alias in &rules.shift_time_aliases {
            aliases.insert(label_key(&alias.canonical), alias.canonical.clone());
            for spelling in &alias.spellings {
                aliases.insert(label_key(spelling), alias.canonical.clone());
            }
        }
        Self { rules, aliases }
    }

    /// Canonical form of a column-0 label.
    ///
    /// Known spreadsheet spellings map to "HH:MM-HH:MM"; anything else is
    /// trimmed and upper-cased ("On-Call" -> "ON-CALL").
    pub fn normalize_label(&self, raw: &str) -> String {
        let key = label_key(raw);
        if let Some(canonical) = self.aliases.get(&key) {
            return canonical.clone();
        }
        if let Some(caps) = TWENTY_FOUR_HOUR_RANGE.captures(&key) {
            let (sh, sm, eh, em) = (&caps[1], &caps[2], &caps[3], &caps[4]);
            let valid = |h: &str, m: &str| {
                matches!((h.parse::<u32>(), m.parse::<u32>()), (Ok(h), Ok(m)) if h <= 24 && m < 60)
            };
            if valid(sh, sm) && valid(eh, em) {
                return format!("{sh}:{sm}-{eh}:{em}");
            }
        }
        raw.trim().to_uppercase()
    }

    fn marker_location(&self, raw_label: &str) -> Option<&'a str> {
        let label = raw_label.trim().to_uppercase();
        self.rules
            .location_markers
            .iter()
            .find(|m| m.label.trim().to_uppercase() == label)
            .map(|m| m.location.as_str())
    }

    /// Walks the grid top to bottom, carrying location and shift-time forward.
    pub fn resolve(&self, grid: &ScheduleGrid) -> ShiftTimeMap {
        let mut current_location = self.rules.default_location.clone();
        let mut current_shift_time = String::new();
        let mut contexts = Vec::with_capacity(grid.row_count());

        for (row, cells) in grid.rows().iter().enumerate() {
            let raw_label = cells.first().map(String::as_str).unwrap_or("");

            if let Some(location) = self.marker_location(raw_label) {
                current_location = location.to_string();
            }

            let cascaded = raw_label.trim().is_empty();
            if !cascaded {
                current_shift_time = self.normalize_label(raw_label);
            }

            debug!(
                "Row {}: location={} shift_time={} cascaded={}",
                row, current_location, current_shift_time, cascaded
            );
            contexts.push(ShiftTimeContext {
                row,
                location: current_location.clone(),
                shift_time: current_shift_time.clone(),
                shift_time_cascaded: cascaded,
            });
        }

        ShiftTimeMap { contexts }
    }

    /// Month abbreviation followed by the fourteen day numbers, or empty when
    /// the paste does not start at the sentinel header cell.
    pub fn weekday_header(&self, grid: &ScheduleGrid) -> Vec<String> {
        let sentinel = grid.cell(0, 0).map(str::trim);
        if sentinel != Some(self.rules.sentinel_header.as_str()) {
            warn!("Sentinel header not found in first cell; weekday header omitted");
            return Vec::new();
        }

        let Some(day_row) = grid.row(1) else {
            warn!("Sentinel header present but the date row is missing");
            return Vec::new();
        };
        if day_row.len() <= BIWEEKLY {
            warn!("Date row has {} cells, expected at least {}", day_row.len(), BIWEEKLY + 1);
            return Vec::new();
        }

        // truncate month header by omitting the -YY year ending
        let month: String = day_row[0].trim().chars().take(3).collect();
        std::iter::once(month)
            .chain(day_row[1..=BIWEEKLY].iter().map(|d| d.trim().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod shift_times_tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> ScheduleGrid {
        ScheduleGrid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn normalizes_adhoc_spellings() {
        let rules = ScheduleRules::default();
        let resolver = ShiftTimeResolver::new(&rules);
        assert_eq!(resolver.normalize_label("0700-1500"), "07:00-15:00");
        assert_eq!(resolver.normalize_label("7:30-3:30"), "07:30-15:30");
        assert_eq!(resolver.normalize_label("9:00- 5:00"), "09:00-17:00");
        assert_eq!(resolver.normalize_label("1100-7:00pm"), "11:00-19:00");
        assert_eq!(resolver.normalize_label("12:00-8:00pm On Call Shift"), "12:00-20:00");
        assert_eq!(resolver.normalize_label("1330-2130"), "13:30-21:30");
    }

    #[test]
    fn clock_range_only_matches_normalized_times() {
        let rules = ScheduleRules::default();
        let resolver = ShiftTimeResolver::new(&rules);
        assert!(is_clock_range(&resolver.normalize_label("1330-2130")));
        assert!(is_clock_range("07:00-15:00"));
        assert!(!is_clock_range("1330-2130"));
        assert!(!is_clock_range("ON-CALL"));
        assert!(!is_clock_range("JAN-24"));
    }

    #[test]
    fn special_labels_pass_through_uppercased() {
        let rules = ScheduleRules::default();
        let resolver = ShiftTimeResolver::new(&rules);
        assert_eq!(resolver.normalize_label(" On-Call "), "ON-CALL");
        assert_eq!(resolver.normalize_label("Not Available"), "NOT AVAILABLE");
        assert_eq!(resolver.normalize_label("LIEU TIME"), "LIEU TIME");
        assert_eq!(resolver.normalize_label("Absent"), "ABSENT");
        // out-of-range clock values are not a time
        assert_eq!(resolver.normalize_label("9999-9999"), "9999-9999");
    }

    #[test]
    fn cascades_labels_and_locations_down_the_grid() {
        let rules = ScheduleRules::default();
        let resolver = ShiftTimeResolver::new(&rules);
        let g = grid(&[
            &["0700-1500", "SUE"],
            &["", "TIM"],
            &["BDC / Breast", ""],
            &["0800-1600", "KT"],
            &["", ""],
            &["Consumers", ""],
            &["9:00-5:00", "MC"],
            &["AVAILABLE", "PL"],
        ]);
        let map = resolver.resolve(&g);
        assert_eq!(map.len(), 8);

        let row1 = map.get(1).unwrap();
        assert_eq!(row1.shift_time, "07:00-15:00");
        assert!(row1.shift_time_cascaded);
        assert_eq!(row1.location, "GENERAL");

        let row3 = map.get(3).unwrap();
        assert_eq!(row3.location, "BDC");
        assert_eq!(row3.shift_time, "08:00-16:00");
        assert!(!row3.shift_time_cascaded);
        assert!(map.get(4).unwrap().shift_time_cascaded);

        assert_eq!(map.get(6).unwrap().location, "OCSC / CONSUMER");
        assert_eq!(map.get(6).unwrap().shift_time, "09:00-17:00");
        assert_eq!(map.get(7).unwrap().location, "GENERAL");

        assert_eq!(map.first_row_of("08:00-16:00", "BDC"), Some(3));
    }

    #[test]
    fn resolving_twice_is_identical() {
        let rules = ScheduleRules::default();
        let resolver = ShiftTimeResolver::new(&rules);
        let g = grid(&[&["0700-1500", "A"], &["", "B"], &["On-Call", "C"], &["", ""]]);
        assert_eq!(resolver.resolve(&g), resolver.resolve(&g));
    }

    #[test]
    fn weekday_header_requires_sentinel() {
        let rules = ScheduleRules::default();
        let resolver = ShiftTimeResolver::new(&rules);

        let mut date_row = vec!["Jan-24".to_string()];
        date_row.extend((1..=14).map(|d| d.to_string()));
        let with_sentinel = ScheduleGrid::from_rows(vec![vec!["US - LESLIE ".to_string()], date_row.clone()]);
        let header = resolver.weekday_header(&with_sentinel);
        assert_eq!(header.len(), 15);
        assert_eq!(header[0], "Jan");
        assert_eq!(header[14], "14");

        let without = ScheduleGrid::from_rows(vec![vec!["Something".to_string()], date_row]);
        assert!(resolver.weekday_header(&without).is_empty());

        let short = grid(&[&["US - LESLIE"], &["Jan-24", "1", "2"]]);
        assert!(resolver.weekday_header(&short).is_empty());
    }
}
