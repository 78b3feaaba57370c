// src/aggregation.rs
use chrono::Weekday;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::ScheduleRules;
use crate::shift::Shift;
use crate::warnings::WarningsEngine;

/// weekday -> first regular (non on-call) shift
pub type RegularShiftMap = BTreeMap<usize, Shift>;
/// weekday -> standby hours
pub type StandbyHourMap = BTreeMap<usize, u32>;
/// weekday -> first on-call shift
pub type StandbyShiftMap = BTreeMap<usize, Shift>;

// On-call coverage windows
const WEEKEND_STANDBY_HOURS: u32 = 24;
const WEEKDAY_STANDBY_HOURS: u32 = 11; // 12am-7am + 8pm-12am
const FRIDAY_EVENING_STANDBY_HOURS: u32 = 5; // 7pm-12am
const THURSDAY_CARRY_OVER_HOURS: u32 = 7; // Friday 12am-7am

/// Day of the week for a 1-based biweekly weekday; day 1 and 8 are Saturdays.
pub fn weekday_of(day: usize) -> Weekday {
    let offset = day.saturating_sub(1) % 7;
    (0..offset).fold(Weekday::Sat, |wd, _| wd.succ())
}

/// Short day names for the fourteen columns ("Sat", "Sun", ... "Fri", twice).
pub fn day_names() -> Vec<&'static str> {
    (1..=crate::config::BIWEEKLY)
        .map(|day| match weekday_of(day) {
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tues",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thurs",
            Weekday::Fri => "Fri",
        })
        .collect()
}

pub struct AggregationEngine<'a> {
    rules: &'a ScheduleRules,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(rules: &'a ScheduleRules) -> Self {
        Self { rules }
    }

    /// First regular shift per weekday wins; any later one is a duplicate.
    pub fn regular_hours(&self, shifts: &[Shift], warnings: &mut WarningsEngine) -> RegularShiftMap {
        let mut map = RegularShiftMap::new();
        for shift in shifts.iter().filter(|s| !self.rules.is_on_call(&s.shift_time)) {
            if map.contains_key(&shift.weekday) {
                warnings.add_duplicate(shift.clone());
            } else {
                map.insert(shift.weekday, shift.clone());
            }
        }
        map
    }

    pub fn standby_shifts(&self, shifts: &[Shift]) -> StandbyShiftMap {
        let mut map = StandbyShiftMap::new();
        for shift in shifts.iter().filter(|s| self.rules.is_on_call(&s.shift_time)) {
            map.entry(shift.weekday).or_insert_with(|| shift.clone());
        }
        map
    }

    /// Standby hours per weekday for on-call shifts.
    ///
    /// Thursday's block runs into Friday morning, so it credits Friday with
    /// seven hours on top of whatever Friday accrues itself; the order the two
    /// entries are met in does not change the total.
    pub fn standby_hours(&self, shifts: &[Shift]) -> StandbyHourMap {
        let mut hours = StandbyHourMap::new();

        for shift in shifts.iter().filter(|s| self.rules.is_on_call(&s.shift_time)) {
            let day = shift.weekday;
            match weekday_of(day) {
                Weekday::Sat | Weekday::Sun => {
                    hours.insert(day, WEEKEND_STANDBY_HOURS);
                }
                Weekday::Thu => {
                    hours.insert(day, WEEKDAY_STANDBY_HOURS);
                    *hours.entry(day + 1).or_insert(0) += THURSDAY_CARRY_OVER_HOURS;
                }
                Weekday::Fri => {
                    *hours.entry(day).or_insert(0) += FRIDAY_EVENING_STANDBY_HOURS;
                }
                _ => {
                    hours.insert(day, WEEKDAY_STANDBY_HOURS);
                }
            }
        }

        debug!("Standby hours: {:?}", hours);
        hours
    }
}
