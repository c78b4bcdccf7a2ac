//! Interactive patient details form.
//!
//! Prompts for every field, runs the pipeline, prints the result panel and
//! starts over with the previous answers as defaults. An empty answer keeps
//! the current value; `q` or end of input quits.

use crate::display::{render_json, render_text};
use crate::pipeline::NoShowPipeline;
use crate::types::patient::{
    Gender, PatientInput, Weekday, MAX_AGE, MAX_HOUR, MAX_LEAD_TIME_DAYS,
};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

/// Run the form loop until the user quits or input ends.
pub fn run_form<R: BufRead, W: Write>(
    pipeline: &NoShowPipeline<'_>,
    input: R,
    output: W,
    json: bool,
) -> Result<()> {
    let mut prompter = Prompter { input, output };
    let mut current = PatientInput::default();

    writeln!(
        prompter.output,
        "Patient Details (Enter keeps the value in brackets, q quits)"
    )?;

    loop {
        let Some(next) = prompter.fill(&current)? else {
            debug!("Form closed");
            return Ok(());
        };
        current = next;

        let report = pipeline.assess(&current)?;
        let panel = if json {
            render_json(&report)?
        } else {
            render_text(&report)
        };
        writeln!(prompter.output)?;
        writeln!(prompter.output, "{}", panel.trim_end())?;
        writeln!(prompter.output)?;
    }
}

struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// One pass over every field; `None` when the user quits.
    fn fill(&mut self, current: &PatientInput) -> Result<Option<PatientInput>> {
        macro_rules! ask {
            ($e:expr) => {
                match $e? {
                    Some(value) => value,
                    None => return Ok(None),
                }
            };
        }

        let gender = ask!(self.ask(
            "Gender (Female/Male)",
            current.gender,
            current.gender.label(),
            |s| s.parse::<Gender>().map_err(|e| e.to_string()),
        ));
        let age = ask!(self.ask_number("Age", current.age, MAX_AGE));
        let scholarship = ask!(self.ask_flag(
            "Enrolled in welfare program (scholarship)",
            current.scholarship
        ));
        let hypertension = ask!(self.ask_flag("Has hypertension", current.hypertension));
        let diabetes = ask!(self.ask_flag("Has diabetes", current.diabetes));
        let alcoholism = ask!(self.ask_flag("Has alcoholism", current.alcoholism));
        let handicap = ask!(self.ask_flag("Has handicap", current.handicap));
        let sms_received = ask!(self.ask_flag("Received SMS reminder", current.sms_received));
        let lead_time_days = ask!(self.ask_number(
            "Days between scheduling and appointment",
            current.lead_time_days,
            MAX_LEAD_TIME_DAYS
        ));
        let weekday = ask!(self.ask(
            "Appointment day of the week (Monday-Saturday)",
            current.weekday,
            current.weekday.label(),
            |s| s.parse::<Weekday>().map_err(|e| e.to_string()),
        ));
        let hour_scheduled = ask!(self.ask_number(
            "Hour scheduled (24h)",
            current.hour_scheduled,
            MAX_HOUR
        ));

        Ok(Some(PatientInput {
            gender,
            age,
            scholarship,
            hypertension,
            diabetes,
            alcoholism,
            handicap,
            sms_received,
            lead_time_days,
            weekday,
            hour_scheduled,
        }))
    }

    fn ask_number(&mut self, label: &str, current: u8, max: u8) -> Result<Option<u8>> {
        let shown = current.to_string();
        self.ask(&format!("{} (0-{})", label, max), current, &shown, |s| {
            match s.parse::<u8>() {
                Ok(v) if v <= max => Ok(v),
                _ => Err(format!("enter a whole number between 0 and {}", max)),
            }
        })
    }

    fn ask_flag(&mut self, label: &str, current: bool) -> Result<Option<bool>> {
        let shown = if current { "y" } else { "n" };
        self.ask(&format!("{} (y/n)", label), current, shown, parse_flag)
    }

    /// Prompt until the answer parses. Empty keeps `current`.
    fn ask<T, F>(&mut self, label: &str, current: T, shown: &str, parse: F) -> Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        loop {
            write!(self.output, "{} [{}]: ", label, shown)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let answer = line.trim();

            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            if answer.is_empty() {
                return Ok(Some(current));
            }
            match parse(answer) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => writeln!(self.output, "  {}", message)?,
            }
        }
    }
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err("answer y or n".to_string()),
    }
}
