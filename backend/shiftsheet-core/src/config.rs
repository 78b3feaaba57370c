// src/config.rs
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::info;

use crate::error::{Result, ScheduleError};
use crate::shift_times::is_clock_range;

/// Number of weekday columns in a schedule, two Saturday-to-Friday weeks.
pub const BIWEEKLY: usize = 14;

/// Highest statutory holiday count accepted for a biweekly period.
pub const MAX_HOLIDAYS: i64 = BIWEEKLY as i64;

// --- General App Configuration ---

/// Settings read from the environment (`SHIFTSHEET_*`), optionally seeded from a `.env` file.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub roster_path: Option<PathBuf>,
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Ok(envy::prefixed("SHIFTSHEET_").from_env::<AppConfig>()?)
    }
}

// --- Schedule Vocabulary ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationMarker {
    /// Raw column-0 label that opens the section.
    pub label: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShiftTimeAlias {
    pub canonical: String,
    pub spellings: Vec<String>,
}

/// A location literal shared by two sites, split by the employee's gender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombinedClinic {
    pub literal: String,
    pub male_site: String,
    pub female_site: String,
}

/// Everything the parser needs to know about how the facility writes its schedule.
///
/// The defaults describe the ultrasound department schedule this tool was built for;
/// a JSON file with any subset of these keys overrides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleRules {
    pub sentinel_header: String,
    pub default_location: String,
    pub location_markers: Vec<LocationMarker>,
    pub shift_time_aliases: Vec<ShiftTimeAlias>,
    pub on_call_label: String,
    pub not_available_label: String,
    pub skipped_labels: Vec<String>,
    pub defined_shift_times: Vec<String>,
    pub evening_shift_times: Vec<String>,
    pub staffed_locations: Vec<String>,
    pub annotation_markers: Vec<String>,
    pub combined_clinic: CombinedClinic,
    pub ftr_quota: u32,
}

impl Default for ScheduleRules {
    fn default() -> Self {
        let marker = |label: &str, location: &str| LocationMarker {
            label: label.to_string(),
            location: location.to_string(),
        };
        let alias = |canonical: &str, spellings: &[&str]| ShiftTimeAlias {
            canonical: canonical.to_string(),
            spellings: spellings.iter().map(|s| s.to_string()).collect(),
        };
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            sentinel_header: "US - LESLIE".to_string(),
            default_location: "GENERAL".to_string(),
            location_markers: vec![
                marker("BDC / Breast", "BDC"),
                marker("1100-7:00pm", "GENERAL"),
                marker("Consumers", "OCSC / CONSUMER"),
                marker("AVAILABLE", "GENERAL"),
            ],
            shift_time_aliases: vec![
                alias("07:00-15:00", &["0700-1500", "7:00-3:00", "7:00-3:00pm", "7-3"]),
                alias("07:30-15:30", &["0730-1530", "7:30-3:30", "7:30-3:30pm"]),
                alias("08:00-16:00", &["0800-1600", "8:00-4:00", "8:00-4:00pm", "8-4"]),
                alias("08:30-16:30", &["0830-1630", "8:30-4:30", "8:30-4:30pm"]),
                alias("09:00-17:00", &["0900-1700", "9:00-5:00", "9:00-5:00pm", "9-5"]),
                alias("10:00-18:00", &["1000-1800", "10:00-6:00", "10:00-6:00pm"]),
                alias("11:00-19:00", &["1100-1900", "11:00-7:00", "1100-7:00pm", "11:00-7:00pm"]),
                alias(
                    "12:00-20:00",
                    &["1200-2000", "12:00-8:00", "12:00-8:00pm", "12:00-8:00pm On Call Shift"],
                ),
                alias("15:00-23:00", &["1500-2300", "3:00-11:00", "3:00-11:00pm"]),
                alias("16:00-24:00", &["1600-2400", "1600-0000", "4:00-12:00", "4:00-12:00am"]),
            ],
            on_call_label: "ON-CALL".to_string(),
            not_available_label: "NOT AVAILABLE".to_string(),
            skipped_labels: strings(&["AVAILABLE", "NOT AVAILABLE", "LIEU TIME"]),
            defined_shift_times: strings(&[
                "07:00-15:00",
                "07:30-15:30",
                "08:00-16:00",
                "08:30-16:30",
                "09:00-17:00",
                "10:00-18:00",
                "11:00-19:00",
                "12:00-20:00",
                "15:00-23:00",
                "16:00-24:00",
                "ON-CALL",
            ]),
            evening_shift_times: strings(&["15:00-23:00", "16:00-24:00"]),
            staffed_locations: strings(&["GENERAL", "BDC"]),
            annotation_markers: strings(&["W/E", "STAT"]),
            combined_clinic: CombinedClinic {
                literal: "OCSC / CONSUMER".to_string(),
                male_site: "CONSUMER".to_string(),
                female_site: "OCSC".to_string(),
            },
            ftr_quota: 10,
        }
    }
}

impl ScheduleRules {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ScheduleError::io(path, e))?;
        let rules: ScheduleRules = serde_json::from_str(&raw)?;
        info!("Loaded schedule rules from {}", path.display());
        Ok(rules)
    }

    pub fn is_on_call(&self, shift_time: &str) -> bool {
        shift_time == self.on_call_label
    }

    pub fn is_skipped(&self, shift_time: &str) -> bool {
        self.skipped_labels.iter().any(|l| l == shift_time)
    }

    pub fn is_evening(&self, shift_time: &str) -> bool {
        self.evening_shift_times.iter().any(|l| l == shift_time)
    }

    /// A working row: a listed shift time, on-call, or any normalized clock range.
    /// Header, status and section labels ("JAN-24", "VACATION", "BDC / BREAST") are not.
    pub fn is_defined_shift(&self, shift_time: &str) -> bool {
        self.is_on_call(shift_time)
            || self.defined_shift_times.iter().any(|l| l == shift_time)
            || is_clock_range(shift_time)
    }

    pub fn is_staffed_location(&self, location: &str) -> bool {
        self.staffed_locations.iter().any(|l| l == location)
    }

    pub fn is_annotation(&self, token: &str) -> bool {
        self.annotation_markers.iter().any(|m| m == token)
    }

    /// Expected biweekly regular shifts for a full-time employee.
    pub fn expected_ftr_shifts(&self, holidays: u32) -> i64 {
        i64::from(self.ftr_quota) - i64::from(holidays)
    }
}

/// Rejects holiday counts outside the biweekly range before any parsing happens.
pub fn validate_holidays(holidays: i64) -> Result<u32> {
    if !(0..=MAX_HOLIDAYS).contains(&holidays) {
        return Err(ScheduleError::HolidayCountOutOfRange(holidays));
    }
    Ok(holidays as u32)
}
