//! Schedule parsing and warnings engine.
//!
//! Turns a tab-delimited biweekly schedule pasted from a spreadsheet into an
//! employee's shifts, regular and standby hours, and a report of data-entry
//! problems (duplicates, multi-name cells, unavailable conflicts, evening
//! coverage, empty cells, shift-count mismatches, unknown names).
//!
//! Data flows `grid` -> `shift_times` -> `shift_finder` (using `names`) ->
//! `aggregation`, with `warnings` collecting findings throughout.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod grid;
pub mod names;
pub mod roster;
pub mod schedule_check;
pub mod shift;
pub mod shift_finder;
pub mod shift_times;
pub mod timesheet;
pub mod warnings;


pub use aggregation::{AggregationEngine, RegularShiftMap, StandbyHourMap, StandbyShiftMap};
pub use config::{AppConfig, ScheduleRules, BIWEEKLY};
pub use error::{Result, ScheduleError};
pub use grid::ScheduleGrid;
pub use names::{match_roster_employee, CellNameResolver, ParsedCell};
pub use roster::{Employee, Gender, Roster};
pub use schedule_check::{EmployeeCheck, ScheduleCheck};
pub use shift::{Coordinate, Shift};
pub use shift_finder::{ScheduleIndices, ShiftFinder};
pub use shift_times::{ShiftTimeContext, ShiftTimeMap, ShiftTimeResolver};
pub use timesheet::{EmployeeSelection, Timesheet};
pub use warnings::{EveningConflict, ShiftCountError, WarningsEngine, WarningsGroup};
