//! Command-line surface

use crate::types::patient::{Gender, PatientInput, Weekday};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "noshow", author, version, about = "Predict whether a patient will attend a scheduled appointment", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); defaults to config/config.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict show-up probability for one patient
    Predict(PredictArgs),
    /// Fill in patient details interactively and re-run after each change
    Form {
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which classifier is active
    ModelInfo,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[arg(long, value_enum, default_value_t = Gender::Female, ignore_case = true)]
    pub gender: Gender,

    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub age: u8,

    /// Enrolled in the welfare program
    #[arg(long)]
    pub scholarship: bool,

    #[arg(long)]
    pub hypertension: bool,

    #[arg(long)]
    pub diabetes: bool,

    #[arg(long)]
    pub alcoholism: bool,

    #[arg(long)]
    pub handicap: bool,

    /// An SMS reminder was sent
    #[arg(long)]
    pub sms_received: bool,

    /// Days between scheduling and the appointment
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub lead_time: u8,

    /// Appointment day of the week
    #[arg(long, value_enum, default_value_t = Weekday::Monday, ignore_case = true)]
    pub weekday: Weekday,

    /// Hour the appointment is scheduled (24h)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(0..=23))]
    pub hour: u8,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    pub fn to_input(&self) -> PatientInput {
        PatientInput {
            gender: self.gender,
            age: self.age,
            scholarship: self.scholarship,
            hypertension: self.hypertension,
            diabetes: self.diabetes,
            alcoholism: self.alcoholism,
            handicap: self.handicap,
            sms_received: self.sms_received,
            lead_time_days: self.lead_time,
            weekday: self.weekday,
            hour_scheduled: self.hour,
        }
    }
}
