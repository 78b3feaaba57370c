// src/shift_finder.rs
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::config::{ScheduleRules, BIWEEKLY};
use crate::error::{Result, ScheduleError};
use crate::grid::ScheduleGrid;
use crate::names::{match_roster_employee, CellNameResolver};
use crate::roster::{Employee, Gender, Roster};
use crate::shift::Shift;
use crate::shift_times::{ShiftTimeContext, ShiftTimeMap};
use crate::warnings::WarningsEngine;

/// Weekday columns of a row, clipped to the biweekly period.
fn weekday_columns(row: &[String]) -> impl Iterator<Item = (usize, &str)> {
    row.iter()
        .enumerate()
        .skip(1)
        .take(BIWEEKLY)
        .map(|(col, cell)| (col, cell.as_str()))
}

fn context_for(shift_times: &ShiftTimeMap, row: usize) -> Result<&ShiftTimeContext> {
    shift_times
        .get(row)
        .ok_or(ScheduleError::MissingShiftTimeContext { row })
}

/// Per-schedule lookups shared by every employee search. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleIndices {
    /// weekday -> names written in "Not Available" rows
    pub unavailable: BTreeMap<usize, BTreeSet<String>>,
    /// weekday -> roster keys of employees named in evening rows
    pub evening: BTreeMap<usize, BTreeSet<String>>,
}

impl ScheduleIndices {
    pub fn build(
        grid: &ScheduleGrid,
        shift_times: &ShiftTimeMap,
        roster: &Roster,
        rules: &ScheduleRules,
    ) -> Result<Self> {
        let names = CellNameResolver::new(rules);
        let mut indices = Self::default();

        for (row_num, row) in grid.rows().iter().enumerate() {
            let ctx = context_for(shift_times, row_num)?;
            let is_unavailable = ctx.shift_time == rules.not_available_label;
            let is_evening = rules.is_evening(&ctx.shift_time);
            if !is_unavailable && !is_evening {
                continue;
            }

            for (col, raw) in weekday_columns(row) {
                let cell = names.parse_cell(raw);
                if cell.is_empty() {
                    continue;
                }
                if is_unavailable {
                    indices
                        .unavailable
                        .entry(col)
                        .or_default()
                        .extend(cell.names.iter().cloned());
                }
                if is_evening {
                    for name in &cell.names {
                        if let Some((key, _)) = match_roster_employee(name, roster) {
                            indices.evening.entry(col).or_default().insert(key.clone());
                        }
                    }
                }
            }
        }

        debug!(
            "Built schedule indices: {} unavailable days, {} evening days",
            indices.unavailable.len(),
            indices.evening.len()
        );
        Ok(indices)
    }

    pub fn is_unavailable(&self, weekday: usize, employee: &Employee) -> bool {
        self.unavailable
            .get(&weekday)
            .is_some_and(|names| names.iter().any(|n| employee.matches(n)))
    }

    /// Male roster employees other than `employee` working an evening row on `weekday`.
    pub fn other_evening_males(&self, weekday: usize, employee: &Employee, roster: &Roster) -> Vec<String> {
        let Some(keys) = self.evening.get(&weekday) else {
            return Vec::new();
        };
        keys.iter()
            .filter(|key| {
                roster
                    .get(key)
                    .is_some_and(|other| other.is_male() && other != employee)
            })
            .cloned()
            .collect()
    }
}

pub struct ShiftFinder<'a> {
    grid: &'a ScheduleGrid,
    shift_times: &'a ShiftTimeMap,
    indices: &'a ScheduleIndices,
    roster: &'a Roster,
    rules: &'a ScheduleRules,
    names: CellNameResolver<'a>,
}

impl<'a> ShiftFinder<'a> {
    pub fn new(
        grid: &'a ScheduleGrid,
        shift_times: &'a ShiftTimeMap,
        indices: &'a ScheduleIndices,
        roster: &'a Roster,
        rules: &'a ScheduleRules,
    ) -> Self {
        Self {
            grid,
            shift_times,
            indices,
            roster,
            rules,
            names: CellNameResolver::new(rules),
        }
    }

    /// The combined clinic row names one of two sites depending on who works it.
    pub fn resolve_location(&self, location: &str, employee: &Employee) -> String {
        let clinic = &self.rules.combined_clinic;
        if location != clinic.literal {
            return location.to_string();
        }
        match employee.gender {
            Some(Gender::Male) => clinic.male_site.clone(),
            Some(Gender::Female) => clinic.female_site.clone(),
            None => location.to_string(),
        }
    }

    /// Every shift held by `employee`, ordered by weekday.
    ///
    /// Cross-employee checks (multi-name cells, empty cells, unavailability and
    /// evening coverage) are reported to `warnings` along the way.
    pub fn find_shifts(&self, employee: &Employee, warnings: &mut WarningsEngine) -> Result<Vec<Shift>> {
        let mut shifts = Vec::new();

        for (row_num, row) in self.grid.rows().iter().enumerate() {
            let ctx = context_for(self.shift_times, row_num)?;

            // Skip over specific shift times that aren't relevant to the timesheet
            if self.rules.is_skipped(&ctx.shift_time) {
                continue;
            }
            let location = self.resolve_location(&ctx.location, employee);
            let on_call = self.rules.is_on_call(&ctx.shift_time);

            for (col, raw) in weekday_columns(row) {
                let cell = self.names.parse_cell(raw);
                let shift = Shift::new(row_num, col, &location, &ctx.shift_time, cell.names.clone());

                if cell.is_empty()
                    && !ctx.shift_time_cascaded
                    && self.rules.is_defined_shift(&ctx.shift_time)
                    && self.rules.is_staffed_location(&ctx.location)
                {
                    warnings.add_empty_cell(shift.clone());
                }

                if cell.is_multi && employee.appears_in(&cell.names) {
                    warnings.add_multiple_names(shift.clone(), on_call);
                }

                if !self.names.matches_target(&cell, employee) {
                    continue;
                }
                debug!(
                    "Matched {} at {}: {} {}",
                    employee.first_name,
                    shift.coordinate.to_excel(),
                    shift.shift_time,
                    shift.location
                );

                if self.indices.is_unavailable(col, employee) {
                    warnings.add_not_available(shift.clone());
                }
                if employee.is_male() && self.rules.is_evening(&ctx.shift_time) {
                    let others = self.indices.other_evening_males(col, employee, self.roster);
                    if !others.is_empty() {
                        warnings.add_evening_conflict(shift.clone(), others);
                    }
                }
                shifts.push(shift);
            }
        }

        // stable: equal weekdays keep row order
        shifts.sort_by_key(|s| s.weekday);
        info!("Found {} shifts for {}", shifts.len(), employee.first_name);
        Ok(shifts)
    }

    /// Name tokens in working rows that match nobody on the roster, with every shift they appear in.
    pub fn find_unknown_names(&self, warnings: &mut WarningsEngine) -> Result<()> {
        for (row_num, row) in self.grid.rows().iter().enumerate() {
            let ctx = context_for(self.shift_times, row_num)?;
            if !self.rules.is_defined_shift(&ctx.shift_time) {
                continue;
            }

            for (col, raw) in weekday_columns(row) {
                let cell = self.names.parse_cell(raw);
                if cell.is_empty() {
                    continue;
                }
                for name in &cell.names {
                    if match_roster_employee(name, self.roster).is_none() {
                        let shift = Shift::new(row_num, col, &ctx.location, &ctx.shift_time, cell.names.clone());
                        warnings.add_unknown_employee_shift(name, shift);
                    }
                }
            }
        }
        Ok(())
    }

    /// Blank, non-cascaded cells in defined shift rows at staffed locations.
    pub fn find_empty_cells(&self, warnings: &mut WarningsEngine) -> Result<()> {
        for (row_num, row) in self.grid.rows().iter().enumerate() {
            let ctx = context_for(self.shift_times, row_num)?;
            if ctx.shift_time_cascaded
                || !self.rules.is_defined_shift(&ctx.shift_time)
                || !self.rules.is_staffed_location(&ctx.location)
            {
                continue;
            }
            for (col, raw) in weekday_columns(row) {
                if self.names.parse_cell(raw).is_empty() {
                    let shift = Shift::new(row_num, col, &ctx.location, &ctx.shift_time, vec![String::new()]);
                    warnings.add_empty_cell(shift);
                }
            }
        }
        Ok(())
    }
}
