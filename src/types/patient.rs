//! Raw patient and appointment attributes as entered on the form

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for a form label that has no encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} label: {label:?}")]
pub struct UnknownLabel {
    pub field: &'static str,
    pub label: String,
}

/// Patient gender as offered by the form selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel {
                field: "gender",
                label: s.to_string(),
            })
    }
}

/// Appointment day of the week.
///
/// Clinics in the training data do not open on Sunday, so it has no
/// encoding and is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default)]
pub enum Weekday {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Selector order, which is also the encoding order
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel {
                field: "weekday",
                label: s.to_string(),
            })
    }
}

/// Upper bound of the age and lead time sliders
pub const MAX_AGE: u8 = 100;
pub const MAX_LEAD_TIME_DAYS: u8 = 100;
/// Upper bound of the scheduled hour slider (24h clock)
pub const MAX_HOUR: u8 = 23;

/// Values collected by the patient details form.
///
/// Numeric fields are expected to be within the slider ranges
/// (`MAX_AGE`, `MAX_LEAD_TIME_DAYS`, `MAX_HOUR`); the input surface
/// enforces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInput {
    pub gender: Gender,
    pub age: u8,
    /// Enrolled in the welfare program
    pub scholarship: bool,
    pub hypertension: bool,
    pub diabetes: bool,
    pub alcoholism: bool,
    pub handicap: bool,
    /// An SMS reminder was sent
    pub sms_received: bool,
    /// Days between scheduling and the appointment
    pub lead_time_days: u8,
    pub weekday: Weekday,
    pub hour_scheduled: u8,
}

impl Default for PatientInput {
    fn default() -> Self {
        Self {
            gender: Gender::Female,
            age: 30,
            scholarship: false,
            hypertension: false,
            diabetes: false,
            alcoholism: false,
            handicap: false,
            sms_received: false,
            lead_time_days: 5,
            weekday: Weekday::Monday,
            hour_scheduled: 10,
        }
    }
}
