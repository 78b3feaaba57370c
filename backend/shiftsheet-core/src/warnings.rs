// src/warnings.rs
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::shift::Shift;

/// Difference between scheduled regular shifts and the biweekly quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShiftCountError {
    pub is_ftr: bool,
    pub expected: i64,
    /// Signed difference: positive is over-scheduled, negative under-scheduled.
    pub found: i64,
}

impl ShiftCountError {
    pub fn actual(&self) -> i64 {
        self.expected + self.found
    }

    pub fn is_mismatch(&self) -> bool {
        self.found != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EveningConflict {
    pub shift: Shift,
    /// Other male employees found in evening rows on the same day.
    pub other_males: Vec<String>,
}

/// Snapshot of every warning raised during one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarningsGroup {
    pub duplicate: Vec<Shift>,
    pub reg_shift_multi_names: Vec<Shift>,
    pub standby_multi_names: Vec<Shift>,
    pub evening: Vec<EveningConflict>,
    pub not_available: Vec<Shift>,
    pub empty_cells: Vec<Shift>,
    pub shift_count: Option<ShiftCountError>,
    pub employee_shift_count: BTreeMap<String, ShiftCountError>,
    pub unknown_employee_shifts: BTreeMap<String, Vec<Shift>>,
}

impl WarningsGroup {
    /// True when no category holds anything worth a reviewer's attention.
    pub fn is_clean(&self) -> bool {
        self.duplicate.is_empty()
            && self.reg_shift_multi_names.is_empty()
            && self.standby_multi_names.is_empty()
            && self.evening.is_empty()
            && self.not_available.is_empty()
            && self.empty_cells.is_empty()
            && !self.shift_count.is_some_and(|c| c.is_mismatch())
            && !self.employee_shift_count.values().any(ShiftCountError::is_mismatch)
            && self.unknown_employee_shifts.is_empty()
    }
}

/// Append-only accumulator for a single parse. Build a fresh one per employee.
#[derive(Debug, Default)]
pub struct WarningsEngine {
    group: WarningsGroup,
}

impl WarningsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_duplicate(&mut self, shift: Shift) {
        debug!("Duplicate shift on weekday {}: {} at {}", shift.weekday, shift.shift_time, shift.location);
        self.group.duplicate.push(shift);
    }

    /// Multi-name cells on on-call rows go to the standby bucket.
    pub fn add_multiple_names(&mut self, shift: Shift, on_call: bool) {
        debug!("Multiple names at {}: {:?}", shift.coordinate.to_excel(), shift.names);
        if on_call {
            self.group.standby_multi_names.push(shift);
        } else {
            self.group.reg_shift_multi_names.push(shift);
        }
    }

    pub fn add_evening_conflict(&mut self, shift: Shift, other_males: Vec<String>) {
        debug!("Evening conflict on weekday {} with {:?}", shift.weekday, other_males);
        self.group.evening.push(EveningConflict { shift, other_males });
    }

    pub fn add_not_available(&mut self, shift: Shift) {
        debug!("Scheduled while unavailable on weekday {}", shift.weekday);
        self.group.not_available.push(shift);
    }

    pub fn add_empty_cell(&mut self, shift: Shift) {
        self.group.empty_cells.push(shift);
    }

    /// Records the regular-shift count against the quota. Non-FTR searches
    /// have no quota, so whatever was found is what was expected.
    pub fn shift_count_check(&mut self, is_ftr: bool, regular_count: usize, expected_ftr: i64) -> ShiftCountError {
        let actual = regular_count as i64;
        let count = if is_ftr {
            ShiftCountError {
                is_ftr,
                expected: expected_ftr,
                found: actual - expected_ftr,
            }
        } else {
            ShiftCountError {
                is_ftr,
                expected: actual,
                found: 0,
            }
        };
        self.group.shift_count = Some(count);
        count
    }

    pub fn add_employee_shift_count(&mut self, employee: &str, count: ShiftCountError) {
        self.group.employee_shift_count.insert(employee.to_string(), count);
    }

    pub fn add_unknown_employee_shift(&mut self, name: &str, shift: Shift) {
        self.group
            .unknown_employee_shifts
            .entry(name.to_string())
            .or_default()
            .push(shift);
    }

    /// Deep copy of the current state; later `add_*` calls do not affect it.
    pub fn warnings_group(&self) -> WarningsGroup {
        self.group.clone()
    }

    pub fn into_group(self) -> WarningsGroup {
        self.group
    }
}
