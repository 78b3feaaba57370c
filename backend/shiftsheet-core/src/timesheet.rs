// src/timesheet.rs
use serde::Serialize;
use tracing::info;

use crate::aggregation::{day_names, AggregationEngine, RegularShiftMap, StandbyHourMap, StandbyShiftMap};
use crate::config::{validate_holidays, ScheduleRules, BIWEEKLY};
use crate::error::{Result, ScheduleError};
use crate::grid::ScheduleGrid;
use crate::roster::{Employee, Roster};
use crate::shift::Shift;
use crate::shift_finder::{ScheduleIndices, ShiftFinder};
use crate::shift_times::{ShiftTimeMap, ShiftTimeResolver};
use crate::warnings::{WarningsEngine, WarningsGroup};

/// Who to look for: a roster employee by full name, or a free-text entry.
#[derive(Debug, Clone)]
pub enum EmployeeSelection {
    Roster(String),
    Custom(Employee),
}

impl EmployeeSelection {
    fn resolve(&self, roster: &Roster) -> Result<(Employee, bool)> {
        match self {
            EmployeeSelection::Roster(name) => Ok((roster.require(name)?.clone(), true)),
            EmployeeSelection::Custom(employee) => Ok((employee.clone(), false)),
        }
    }
}

/// Output of a full single-employee parse.
#[derive(Debug, Clone, Serialize)]
pub struct Timesheet {
    pub employee: Employee,
    pub is_ftr: bool,
    pub holidays: u32,
    pub headers: Vec<String>,
    pub shift_times: ShiftTimeMap,
    pub shifts: Vec<Shift>,
    pub regular_shifts: RegularShiftMap,
    pub standby_hours: StandbyHourMap,
    pub standby_shifts: StandbyShiftMap,
    pub warnings: WarningsGroup,
}

impl Timesheet {
    /// Loads the paste, finds the employee's shifts and aggregates them into a timesheet.
    pub fn build(
        schedule: &str,
        selection: &EmployeeSelection,
        holidays: i64,
        roster: &Roster,
        rules: &ScheduleRules,
    ) -> Result<Self> {
        if schedule.trim().is_empty() {
            return Err(ScheduleError::EmptySchedule);
        }
        let (employee, is_ftr) = selection.resolve(roster)?;
        let holidays = validate_holidays(holidays)?;

        let grid = ScheduleGrid::load(schedule);
        let resolver = ShiftTimeResolver::new(rules);
        let shift_times = resolver.resolve(&grid);
        let headers = resolver.weekday_header(&grid);
        let indices = ScheduleIndices::build(&grid, &shift_times, roster, rules)?;

        let mut warnings = WarningsEngine::new();
        let finder = ShiftFinder::new(&grid, &shift_times, &indices, roster, rules);
        let shifts = finder.find_shifts(&employee, &mut warnings)?;

        let aggregation = AggregationEngine::new(rules);
        let regular_shifts = aggregation.regular_hours(&shifts, &mut warnings);
        let standby_hours = aggregation.standby_hours(&shifts);
        let standby_shifts = aggregation.standby_shifts(&shifts);

        warnings.shift_count_check(is_ftr, regular_shifts.len(), rules.expected_ftr_shifts(holidays));

        info!(
            "Timesheet for {}: {} regular shifts, {} standby days",
            employee.first_name,
            regular_shifts.len(),
            standby_hours.len()
        );

        Ok(Self {
            employee,
            is_ftr,
            holidays,
            headers,
            shift_times,
            shifts,
            regular_shifts,
            standby_hours,
            standby_shifts,
            warnings: warnings.into_group(),
        })
    }

    pub fn title(&self) -> String {
        let name = self.employee.display_name();
        if self.headers.len() == BIWEEKLY + 1 {
            format!(
                "{}'s [{} {}-{}] Timesheet",
                name,
                self.headers[0],
                self.headers[1],
                self.headers[BIWEEKLY]
            )
        } else {
            format!("{name}'s Timesheet")
        }
    }

    fn shift_time_row(&self) -> Vec<String> {
        (1..=BIWEEKLY)
            .map(|d| self.regular_shifts.get(&d).map(|s| s.shift_time.clone()).unwrap_or_default())
            .collect()
    }

    fn standby_row(&self) -> Vec<String> {
        (1..=BIWEEKLY)
            .map(|d| self.standby_hours.get(&d).map(u32::to_string).unwrap_or_default())
            .collect()
    }

    fn location_row(&self) -> Vec<String> {
        (1..=BIWEEKLY)
            .map(|d| self.regular_shifts.get(&d).map(|s| s.location.clone()).unwrap_or_default())
            .collect()
    }

    /// Tab-separated shift times, standby hours and locations, ready to paste into a spreadsheet.
    pub fn to_tsv(&self) -> Result<String> {
        let mut buf = Vec::new();
        {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .from_writer(&mut buf);
            wtr.write_record(self.shift_time_row())?;
            wtr.write_record(self.standby_row())?;
            wtr.write_record(self.location_row())?;
            wtr.flush().map_err(csv::Error::from)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Reviewer note when a full-time employee's count is off quota.
    pub fn shift_count_comment(&self) -> Option<String> {
        let count = self.warnings.shift_count?;
        if !count.is_ftr || !count.is_mismatch() {
            return None;
        }
        let direction = if count.found > 0 { "MORE THAN" } else { "LESS THAN" };
        Some(format!(
            "[ERROR?] {} appears to have {} {} shifts in the biweekly! (found {})",
            self.employee.display_name(),
            direction,
            count.expected,
            count.actual()
        ))
    }

    fn conflict_lines(&self) -> Vec<String> {
        let w = &self.warnings;
        let mut lines = Vec::new();
        for s in &w.duplicate {
            lines.push(format!(
                "Duplicate: {} at {} on day {} ({})",
                s.shift_time,
                s.location,
                s.weekday,
                s.coordinate.to_excel()
            ));
        }
        for s in &w.reg_shift_multi_names {
            lines.push(format!("Multiple names on day {} ({}): {}", s.weekday, s.coordinate.to_excel(), s.names.join(", ")));
        }
        for s in &w.standby_multi_names {
            lines.push(format!(
                "Multiple names on on-call day {} ({}): {}; standby hours need review",
                s.weekday,
                s.coordinate.to_excel(),
                s.names.join(", ")
            ));
        }
        for s in &w.not_available {
            lines.push(format!("Scheduled on day {} while marked Not Available ({})", s.weekday, s.coordinate.to_excel()));
        }
        for c in &w.evening {
            lines.push(format!(
                "Evening coverage on day {} also has male staff: {}",
                c.shift.weekday,
                c.other_males.join(", ")
            ));
        }
        lines
    }

    /// Plain-text table for terminal review.
    pub fn render_text(&self) -> String {
        let row = |title: &str, cells: &[String]| {
            let mut line = format!("{title:<12}");
            for cell in cells {
                line.push_str(&format!("{cell:<13}"));
            }
            line.trim_end().to_string()
        };

        let names: Vec<String> = day_names().into_iter().map(str::to_string).collect();
        let mut lines = vec![self.title(), row("", &names)];
        if self.headers.len() == BIWEEKLY + 1 {
            lines.push(row(&self.headers[0], &self.headers[1..]));
        }
        lines.push(row("Shift Time", &self.shift_time_row()));
        lines.push(row("Standby Hrs", &self.standby_row()));
        lines.push(row("Location", &self.location_row()));
        lines.push(String::new());

        let conflicts = self.conflict_lines();
        if conflicts.is_empty() {
            lines.push("No conflicts found.".to_string());
        } else {
            lines.push("CONFLICTS".to_string());
            lines.extend(conflicts.iter().map(|c| format!("  - {c}")));
        }
        if let Some(comment) = self.shift_count_comment() {
            lines.push(String::new());
            lines.push(comment);
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
