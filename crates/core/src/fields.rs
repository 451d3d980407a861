//! Per-field parse policies.
//!
//! A malformed field never aborts a prescription. Each policy here returns either the parsed
//! value or a documented default together with the reason the default was used; the caller
//! logs the reason and carries on.

use crate::constants::{GP_PRESCRIBING_DISPLAY, GP_PRESCRIBING_TYPE};
use chrono::NaiveDate;
use fhir::AdministrativeGender;
use std::str::FromStr;

/// Result of reading one source field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldOutcome<T> {
    Parsed(T),
    Defaulted { value: T, reason: String },
}

impl<T> FieldOutcome<T> {
    pub fn into_value(self) -> T {
        match self {
            FieldOutcome::Parsed(value) | FieldOutcome::Defaulted { value, .. } => value,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, FieldOutcome::Defaulted { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FieldOutcome::Parsed(_) => None,
            FieldOutcome::Defaulted { reason, .. } => Some(reason),
        }
    }
}

/// Birth date from an 8-digit `YYYYMMDD` field, rendered as `YYYY-MM-DD`.
///
/// Falls back to `fallback` (the run date) when the field is not a valid calendar date.
pub fn birth_date(raw: &str, fallback: NaiveDate) -> FieldOutcome<String> {
    let raw = raw.trim();
    let parsed = (raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()))
        .then(|| NaiveDate::parse_from_str(raw, "%Y%m%d").ok())
        .flatten();

    match parsed {
        Some(date) => FieldOutcome::Parsed(date.format("%Y-%m-%d").to_string()),
        None => FieldOutcome::Defaulted {
            value: fallback.format("%Y-%m-%d").to_string(),
            reason: format!("date parse failed for birth date '{raw}'"),
        },
    }
}

/// Gender from the small integer code used by the extract.
///
/// `0` is unknown, `1` male, `2` female. Any other integer maps to other; text that is not an
/// integer maps to unknown.
pub fn gender(raw: &str) -> FieldOutcome<AdministrativeGender> {
    match raw.trim().parse::<i64>() {
        Ok(0) => FieldOutcome::Parsed(AdministrativeGender::Unknown),
        Ok(1) => FieldOutcome::Parsed(AdministrativeGender::Male),
        Ok(2) => FieldOutcome::Parsed(AdministrativeGender::Female),
        Ok(code) => FieldOutcome::Defaulted {
            value: AdministrativeGender::Other,
            reason: format!("unrecognised gender code {code}"),
        },
        Err(_) => FieldOutcome::Defaulted {
            value: AdministrativeGender::Unknown,
            reason: format!("gender code '{}' is not a number", raw.trim()),
        },
    }
}

/// Dispense quantity count. `None` when the field is not numeric.
///
/// The number keeps the textual form of the source, so `28` stays an integer.
pub fn quantity(raw: &str) -> FieldOutcome<Option<serde_json::Number>> {
    match serde_json::Number::from_str(raw.trim()) {
        Ok(number) => FieldOutcome::Parsed(Some(number)),
        Err(_) => FieldOutcome::Defaulted {
            value: None,
            reason: format!("quantity count '{raw}' is not numeric; quantity omitted"),
        },
    }
}

/// Course of therapy derived from the prescription treatment type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseOfTherapy {
    Acute,
    Repeat,
    RepeatDispensing,
}

impl CourseOfTherapy {
    /// Empty and `0001` are acute, `0002` is repeat, anything else is repeat dispensing.
    /// Surrounding whitespace is ignored, as for every coded field.
    pub fn from_treatment_type(raw: &str) -> Self {
        match raw.trim() {
            "" | "0001" => CourseOfTherapy::Acute,
            "0002" => CourseOfTherapy::Repeat,
            _ => CourseOfTherapy::RepeatDispensing,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            CourseOfTherapy::Acute => "acute",
            CourseOfTherapy::Repeat => "repeat",
            CourseOfTherapy::RepeatDispensing => "repeat-dispensing",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            CourseOfTherapy::Acute => "Acute",
            CourseOfTherapy::Repeat => "Repeat",
            CourseOfTherapy::RepeatDispensing => "Repeat Dispensing",
        }
    }
}

/// Display text for a prescription type code. Only GP prescribing has one.
pub fn prescription_type_display(code: &str) -> Option<&'static str> {
    (code.trim() == GP_PRESCRIBING_TYPE).then_some(GP_PRESCRIBING_DISPLAY)
}
