// src/roster.rs
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use tracing::{debug, info};

use crate::error::{Result, ScheduleError};

const DEFAULT_ROSTER_JSON: &str = include_str!("../data/roster.json");

// --- Employee Data ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn parse(code: &str) -> Result<Self> {
        match code.trim().to_uppercase().as_str() {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(ScheduleError::InvalidGender(code.to_string())),
        }
    }
}

/// Identity strings are stored upper-cased so cell text can be compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub first_name: String,
    pub str_alias: String,
    pub abbrev: String,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl Employee {
    pub fn new(first_name: &str, str_alias: &str, abbrev: &str, gender: Option<Gender>) -> Self {
        Self {
            first_name: first_name.trim().to_uppercase(),
            str_alias: str_alias.trim().to_uppercase(),
            abbrev: abbrev.trim().to_uppercase(),
            gender,
        }
    }

    /// Builds an employee from free-text input; the name doubles as the alias.
    pub fn custom(name: &str, abbrev: &str, gender: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ScheduleError::MissingCustomField("name"));
        }
        if abbrev.trim().is_empty() {
            return Err(ScheduleError::MissingCustomField("abbreviation"));
        }
        if gender.trim().is_empty() {
            return Err(ScheduleError::MissingCustomField("gender"));
        }
        let gender = Gender::parse(gender)?;
        Ok(Self::new(name, name, abbrev, Some(gender)))
    }

    /// True when `token` is this employee's first name, alias, or abbreviation.
    pub fn matches(&self, token: &str) -> bool {
        let token = token.trim().to_uppercase();
        token == self.first_name || token == self.str_alias || token == self.abbrev
    }

    /// True when any of `names` identifies this employee.
    pub fn appears_in<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().any(|n| self.matches(n.as_ref()))
    }

    pub fn is_male(&self) -> bool {
        self.gender == Some(Gender::Male)
    }

    /// First name as it would be written in a sentence ("JANE" -> "Jane").
    pub fn display_name(&self) -> String {
        capitalize(&self.first_name)
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

// --- Roster ---

/// Full-name key to employee. Reference data, never modified by parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    employees: BTreeMap<String, Employee>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, full_name: &str, employee: Employee) {
        self.employees.insert(full_name.to_string(), employee);
    }

    /// Builder-style insert, handy for synthetic rosters.
    pub fn with(mut self, full_name: &str, employee: Employee) -> Self {
        self.insert(full_name, employee);
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: BTreeMap<String, Employee> = serde_json::from_str(raw)?;
        let employees = parsed
            .into_iter()
            .map(|(name, e)| {
                let employee = Employee::new(&e.first_name, &e.str_alias, &e.abbrev, e.gender);
                (name, employee)
            })
            .collect();
        Ok(Self { employees })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ScheduleError::io(path, e))?;
        let roster = Self::from_json_str(&raw)?;
        info!("Loaded {} employees from {}", roster.len(), path.display());
        Ok(roster)
    }

    /// The department roster bundled with the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(DEFAULT_ROSTER_JSON)
    }

    pub fn get(&self, full_name: &str) -> Option<&Employee> {
        self.employees.get(full_name)
    }

    pub fn require(&self, full_name: &str) -> Result<&Employee> {
        self.get(full_name)
            .ok_or_else(|| ScheduleError::UnknownEmployee(full_name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Employee)> {
        self.employees.iter()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// First employee (in key order) whose first name, alias, or abbreviation equals `token`.
    pub fn match_employee(&self, token: &str) -> Option<(&String, &Employee)> {
        let found = self.employees.iter().find(|(_, e)| e.matches(token));
        if found.is_none() {
            debug!("No roster match for '{}'", token);
        }
        found
    }
}

#[cfg(test)]
mod roster_tests {
    use super::*;

    fn sample_roster() -> Roster {
        Roster::new()
            .with("Sherri Linzon", Employee::new("Sherri", "Sherri L", "SL", Some(Gender::Female)))
            .with("Tim Dang", Employee::new("tim", "tim d", "td", Some(Gender::Male)))
    }

    #[test]
    fn identities_are_uppercased_and_matched_case_insensitively() {
        let roster = sample_roster();
        let tim = roster.get("Tim Dang").unwrap();
        assert_eq!(tim.first_name, "TIM");
        assert_eq!(tim.str_alias, "TIM D");
        assert!(tim.matches("td"));
        assert!(tim.matches(" Tim D "));
        assert!(!tim.matches("TIMOTHY"));
    }

    #[test]
    fn match_employee_returns_none_for_unknown_token() {
        let roster = sample_roster();
        let (key, _) = roster.match_employee("SHERRI L").unwrap();
        assert_eq!(key, "Sherri Linzon");
        assert!(roster.match_employee("CASUAL").is_none());
    }

    #[test]
    fn custom_employee_requires_every_field() {
        assert!(matches!(
            Employee::custom("", "JD", "M"),
            Err(ScheduleError::MissingCustomField("name"))
        ));
        assert!(matches!(
            Employee::custom("Jane", " ", "F"),
            Err(ScheduleError::MissingCustomField("abbreviation"))
        ));
        assert!(matches!(
            Employee::custom("Jane", "JA", "X"),
            Err(ScheduleError::InvalidGender(_))
        ));

        let jane = Employee::custom("jane", "ja", "f").unwrap();
        assert_eq!(jane.first_name, "JANE");
        assert_eq!(jane.str_alias, "JANE");
        assert_eq!(jane.gender, Some(Gender::Female));
        assert_eq!(jane.display_name(), "Jane");
    }

    #[test]
    fn bundled_roster_parses() {
        let roster = Roster::bundled().unwrap();
        assert!(!roster.is_empty());
        let erica = roster.require("Erica Lee").unwrap();
        assert_eq!(erica.abbrev, "ELEE");
        let sue = roster.require("Sue Santiago").unwrap();
        assert_eq!(sue.first_name, "SUSAN");
        assert!(sue.matches("SUE"));
        assert!(matches!(
            roster.require("Nobody"),
            Err(ScheduleError::UnknownEmployee(_))
        ));
    }
}
