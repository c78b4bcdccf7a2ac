//! Feature encoding for no-show model inference.
//!
//! Turns the raw form values into the fixed-order feature row the
//! random forest was fit on.

use crate::types::patient::{Gender, PatientInput, Weekday};
use serde::{Deserialize, Serialize};

/// Number of model input features
pub const FEATURE_COUNT: usize = 11;

/// Feature names in training column order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Gender",
    "Age",
    "Scholarship",
    "Hypertension",
    "Diabetes",
    "Alcoholism",
    "Handicap",
    "SMS_received",
    "LeadTime",
    "AppointmentWeekday",
    "HourScheduled",
];

/// One encoded appointment, built per request and dropped after use.
///
/// Field order is the training column order; `to_model_input` relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureVector {
    /// 0 = female, 1 = male
    pub gender: u8,
    pub age: u8,
    pub scholarship: bool,
    pub hypertension: bool,
    pub diabetes: bool,
    pub alcoholism: bool,
    pub handicap: bool,
    #[serde(rename = "SMS_received")]
    pub sms_received: bool,
    pub lead_time: u8,
    /// 0 = Monday .. 5 = Saturday
    pub appointment_weekday: u8,
    pub hour_scheduled: u8,
}

impl FeatureVector {
    /// Numeric model row; booleans become 0.0 / 1.0.
    pub fn to_model_input(&self) -> [f32; FEATURE_COUNT] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            self.gender as f32,
            self.age as f32,
            flag(self.scholarship),
            flag(self.hypertension),
            flag(self.diabetes),
            flag(self.alcoholism),
            flag(self.handicap),
            flag(self.sms_received),
            self.lead_time as f32,
            self.appointment_weekday as f32,
            self.hour_scheduled as f32,
        ]
    }
}

/// Stateless encoder from form values to `FeatureVector`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode one form submission.
    ///
    /// Sliders and toggles pass through unchanged; only the two selectors
    /// are mapped to their codes.
    pub fn encode(&self, input: &PatientInput) -> FeatureVector {
        FeatureVector {
            gender: encode_gender(input.gender),
            age: input.age,
            scholarship: input.scholarship,
            hypertension: input.hypertension,
            diabetes: input.diabetes,
            alcoholism: input.alcoholism,
            handicap: input.handicap,
            sms_received: input.sms_received,
            lead_time: input.lead_time_days,
            appointment_weekday: encode_weekday(input.weekday),
            hour_scheduled: input.hour_scheduled,
        }
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

pub fn encode_gender(gender: Gender) -> u8 {
    match gender {
        Gender::Female => 0,
        Gender::Male => 1,
    }
}

pub fn encode_weekday(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Monday => 0,
        Weekday::Tuesday => 1,
        Weekday::Wednesday => 2,
        Weekday::Thursday => 3,
        Weekday::Friday => 4,
        Weekday::Saturday => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::patient::{MAX_AGE, MAX_HOUR, MAX_LEAD_TIME_DAYS};

    #[test]
    fn test_reference_appointment_encoding() {
        let encoder = FeatureEncoder::new();
        let input = PatientInput {
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
        };

        let features = encoder.encode(&input);

        assert_eq!(
            features,
            FeatureVector {
                gender: 0,
                age: 30,
                scholarship: false,
                hypertension: false,
                diabetes: false,
                alcoholism: false,
                handicap: false,
                sms_received: false,
                lead_time: 5,
                appointment_weekday: 0,
                hour_scheduled: 10,
            }
        );
        assert_eq!(
            features.to_model_input(),
            [0.0, 30.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 10.0]
        );
    }

    #[test]
    fn test_gender_mapping_is_bijective() {
        let codes: Vec<u8> = Gender::ALL.iter().map(|&g| encode_gender(g)).collect();
        assert_eq!(codes, vec![0, 1]);
    }

    #[test]
    fn test_weekday_codes_follow_selector_order() {
        let codes: Vec<u8> = Weekday::ALL.iter().map(|&d| encode_weekday(d)).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sliders_pass_through() {
        let encoder = FeatureEncoder::new();
        for age in 0..=MAX_AGE {
            let input = PatientInput {
                age,
                lead_time_days: MAX_LEAD_TIME_DAYS - age,
                hour_scheduled: age % (MAX_HOUR + 1),
                ..PatientInput::default()
            };
            let features = encoder.encode(&input);
            assert_eq!(features.age, age);
            assert_eq!(features.lead_time, MAX_LEAD_TIME_DAYS - age);
            assert_eq!(features.hour_scheduled, age % (MAX_HOUR + 1));
        }
    }

    #[test]
    fn test_flags_pass_through_in_position() {
        let encoder = FeatureEncoder::new();
        let input = PatientInput {
            gender: Gender::Male,
            scholarship: true,
            diabetes: true,
            sms_received: true,
            weekday: Weekday::Saturday,
            ..PatientInput::default()
        };

        let row = encoder.encode(&input).to_model_input();

        assert_eq!(row[0], 1.0);
        assert_eq!(&row[2..8], &[1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(row[9], 5.0);
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let encoder = FeatureEncoder::new();
        let input = PatientInput {
            hypertension: true,
            weekday: Weekday::Thursday,
            ..PatientInput::default()
        };

        let first = encoder.encode(&input).to_model_input();
        let second = encoder.encode(&input).to_model_input();

        let bits = |row: [f32; FEATURE_COUNT]| row.map(f32::to_bits);
        assert_eq!(bits(first), bits(second));
    }

    #[test]
    fn test_feature_names_match_training_columns() {
        let encoder = FeatureEncoder::new();
        assert_eq!(encoder.feature_count(), 11);
        assert_eq!(encoder.feature_names().len(), encoder.feature_count());
        assert_eq!(encoder.feature_names()[7], "SMS_received");
    }

    #[test]
    fn test_serialized_field_names_match_training_columns() {
        let features = FeatureEncoder::new().encode(&PatientInput::default());
        let json = serde_json::to_value(features).unwrap();
        let object = json.as_object().unwrap();
        for name in FEATURE_NAMES {
            assert!(object.contains_key(name), "missing {}", name);
        }
    }
}
