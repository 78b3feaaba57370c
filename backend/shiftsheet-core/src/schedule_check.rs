// src/schedule_check.rs
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::aggregation::AggregationEngine;
use crate::config::{validate_holidays, ScheduleRules};
use crate::error::{Result, ScheduleError};
use crate::grid::ScheduleGrid;
use crate::roster::Roster;
use crate::shift::Shift;
use crate::shift_finder::{ScheduleIndices, ShiftFinder};
use crate::shift_times::{ShiftTimeMap, ShiftTimeResolver};
use crate::warnings::{ShiftCountError, WarningsEngine, WarningsGroup};

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeCheck {
    pub shifts: Vec<Shift>,
    pub regular_count: usize,
    pub warnings: WarningsGroup,
}

/// Every roster employee checked against one schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleCheck {
    pub holidays: u32,
    pub expected_shifts: i64,
    pub headers: Vec<String>,
    pub shift_times: ShiftTimeMap,
    pub employees: BTreeMap<String, EmployeeCheck>,
    /// Schedule-level findings: shift counts, unknown names and empty cells.
    pub warnings: WarningsGroup,
}

impl ScheduleCheck {
    /// Runs one independent search per roster employee over a shared, read-only grid.
    pub fn run(schedule: &str, holidays: i64, roster: &Roster, rules: &ScheduleRules) -> Result<Self> {
        if schedule.trim().is_empty() {
            return Err(ScheduleError::EmptySchedule);
        }
        let holidays = validate_holidays(holidays)?;
        let expected_shifts = rules.expected_ftr_shifts(holidays);

        let grid = ScheduleGrid::load(schedule);
        let resolver = ShiftTimeResolver::new(rules);
        let shift_times = resolver.resolve(&grid);
        let headers = resolver.weekday_header(&grid);
        let indices = ScheduleIndices::build(&grid, &shift_times, roster, rules)?;
        let finder = ShiftFinder::new(&grid, &shift_times, &indices, roster, rules);
        let aggregation = AggregationEngine::new(rules);

        let mut schedule_warnings = WarningsEngine::new();
        let mut employees = BTreeMap::new();

        for (name, employee) in roster.iter() {
            let mut warnings = WarningsEngine::new();
            let shifts = finder.find_shifts(employee, &mut warnings)?;
            let regular = aggregation.regular_hours(&shifts, &mut warnings);
            let count = warnings.shift_count_check(true, regular.len(), expected_shifts);
            schedule_warnings.add_employee_shift_count(name, count);

            employees.insert(
                name.clone(),
                EmployeeCheck {
                    shifts,
                    regular_count: regular.len(),
                    warnings: warnings.into_group(),
                },
            );
        }

        finder.find_unknown_names(&mut schedule_warnings)?;
        finder.find_empty_cells(&mut schedule_warnings)?;
        let warnings = schedule_warnings.into_group();

        if !warnings.unknown_employee_shifts.is_empty() {
            warn!(
                "{} names in the schedule are not on the roster",
                warnings.unknown_employee_shifts.len()
            );
        }
        info!("Checked schedule for {} employees", employees.len());

        Ok(Self {
            holidays,
            expected_shifts,
            headers,
            shift_times,
            employees,
            warnings,
        })
    }

    pub fn employee(&self, name: &str) -> Option<&EmployeeCheck> {
        self.employees.get(name)
    }

    fn counts_where(&self, pred: impl Fn(&ShiftCountError) -> bool) -> Vec<(&str, ShiftCountError)> {
        self.warnings
            .employee_shift_count
            .iter()
            .filter(|(_, c)| c.is_ftr && pred(c))
            .map(|(name, c)| (name.as_str(), *c))
            .collect()
    }

    pub fn over_scheduled(&self) -> Vec<(&str, ShiftCountError)> {
        self.counts_where(|c| c.found > 0)
    }

    pub fn under_scheduled(&self) -> Vec<(&str, ShiftCountError)> {
        self.counts_where(|c| c.found < 0)
    }

    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Too Many Shifts (expected: {})", self.expected_shifts));
        let over = self.over_scheduled();
        if over.is_empty() {
            lines.push("  No employee over-scheduled!".to_string());
        }
        lines.extend(over.iter().map(|(name, count)| format!("  {name}: {} shifts", count.actual())));

        lines.push(format!("Missing Shifts (expected: {})", self.expected_shifts));
        let under = self.under_scheduled();
        if under.is_empty() {
            lines.push("  No employee under-scheduled!".to_string());
        }
        lines.extend(under.iter().map(|(name, count)| format!("  {name}: {} shifts", count.actual())));

        for (name, check) in &self.employees {
            let w = &check.warnings;
            let mut notes = Vec::new();
            for s in &w.duplicate {
                notes.push(format!("duplicate at {} ({})", s.coordinate.to_excel(), s.shift_time));
            }
            for s in w.reg_shift_multi_names.iter().chain(&w.standby_multi_names) {
                notes.push(format!("multiple names at {}: {}", s.coordinate.to_excel(), s.names.join(", ")));
            }
            for s in &w.not_available {
                notes.push(format!("not available at {}", s.coordinate.to_excel()));
            }
            for c in &w.evening {
                notes.push(format!(
                    "evening at {} with {}",
                    c.shift.coordinate.to_excel(),
                    c.other_males.join(", ")
                ));
            }
            if !notes.is_empty() {
                lines.push(format!("{name}:"));
                lines.extend(notes.iter().map(|note| format!("  - {note}")));
            }
        }

        if !self.warnings.unknown_employee_shifts.is_empty() {
            lines.push("Unrecognized names:".to_string());
            for (name, shifts) in &self.warnings.unknown_employee_shifts {
                let cells: Vec<String> = shifts.iter().map(|s| s.coordinate.to_excel()).collect();
                lines.push(format!("  {name} ({} shifts): {}", shifts.len(), cells.join(" ")));
            }
        }

        if !self.warnings.empty_cells.is_empty() {
            let cells: Vec<String> = self
                .warnings
                .empty_cells
                .iter()
                .map(|s| s.coordinate.to_excel())
                .collect();
            lines.push(format!("Empty cells: {}", cells.join(" ")));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
