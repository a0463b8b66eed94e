// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_database::{SlotKey, StoreError};

pub const DEFAULT_DURATION_MINUTES: i64 = 40;
pub const DEFAULT_CLIENT_NAME: &str = "Cliente Exemplo";
pub const DEFAULT_STATUS: &str = "booked";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: barber_id, date, start_time";
pub const MISSING_DATE_MESSAGE: &str = "Missing 'date' query parameter";

// ==============================================================================
// CORE APPOINTMENT MODEL
// ==============================================================================

/// A booked slot. `(date, start_time)` is the record store key, so at most one
/// appointment exists per slot whatever the barber.
///
/// Deserialization is lenient about numbers: `barber_id` and `duration` may be
/// stored as integers, integral floats or numeric strings and are normalized to
/// `i64`. Older records without `duration`, `client_name` or `status` read back
/// with the booking defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub date: String,
    pub start_time: String,
    #[serde(deserialize_with = "integer_field")]
    pub barber_id: i64,
    #[serde(default = "default_duration", deserialize_with = "integer_field")]
    pub duration: i64,
    #[serde(default = "default_client_name")]
    pub client_name: String,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Appointment {
    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.date.clone(), self.start_time.clone())
    }

    pub fn to_record(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_record(record: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(record)
    }
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_MINUTES
}

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn integer_field<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = NumericInput::deserialize(deserializer)?;
    raw.to_integer()
        .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", raw)))
}

/// A number as clients and stores actually send it: JSON integer, float
/// (`40.0` from decimal-typed stores) or text (HTML form fields).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumericInput {
    /// The value as an integer, if it represents one exactly.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            NumericInput::Integer(n) => Some(*n),
            NumericInput::Float(f) => float_to_integer(*f),
            NumericInput::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_integer))
            }
        }
    }

    /// Mirrors the falsy check clients rely on: `0`, `0.0` and blank text
    /// count as "not provided".
    pub fn is_blank(&self) -> bool {
        match self {
            NumericInput::Integer(n) => *n == 0,
            NumericInput::Float(f) => *f == 0.0,
            NumericInput::Text(s) => s.trim().is_empty(),
        }
    }
}

impl std::fmt::Display for NumericInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericInput::Integer(n) => write!(f, "{}", n),
            NumericInput::Float(x) => write!(f, "{}", x),
            NumericInput::Text(s) => write!(f, "{:?}", s),
        }
    }
}

fn float_to_integer(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookAppointmentRequest {
    pub barber_id: Option<NumericInput>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<NumericInput>,
    pub client_name: Option<String>,
    pub status: Option<String>,
}

impl BookAppointmentRequest {
    /// Parses a raw request body. An empty body reads as `{}`, so it fails
    /// validation rather than parsing.
    pub fn from_body(body: &[u8]) -> Result<Self, AppointmentError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body).map_err(|e| AppointmentError::MalformedInput(e.to_string()))
    }

    /// Checks required fields and formats, then builds the appointment with
    /// defaults applied. Date and time are rewritten in canonical form so that
    /// `9:00` and `09:00` address the same slot.
    pub fn validate(self) -> Result<Appointment, AppointmentError> {
        let barber_id = self.barber_id.filter(|b| !b.is_blank());
        let date = non_blank(self.date);
        let start_time = non_blank(self.start_time);

        let (Some(barber_id), Some(date), Some(start_time)) = (barber_id, date, start_time) else {
            return Err(AppointmentError::ValidationError(MISSING_FIELDS_MESSAGE.to_string()));
        };

        let barber_id = barber_id
            .to_integer()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppointmentError::ValidationError(format!(
                    "barber_id must be a positive integer, got {}",
                    barber_id
                ))
            })?;

        let date = canonical_date(&date).ok_or_else(|| {
            AppointmentError::ValidationError(format!("Invalid date '{}', expected YYYY-MM-DD", date))
        })?;

        let start_time = canonical_time(&start_time).ok_or_else(|| {
            AppointmentError::ValidationError(format!("Invalid start_time '{}', expected HH:MM", start_time))
        })?;

        let duration = match self.duration {
            None => DEFAULT_DURATION_MINUTES,
            Some(raw) => raw.to_integer().filter(|d| *d > 0).ok_or_else(|| {
                AppointmentError::ValidationError(format!(
                    "duration must be a positive number of minutes, got {}",
                    raw
                ))
            })?,
        };

        Ok(Appointment {
            date,
            start_time,
            barber_id,
            duration,
            client_name: non_blank(self.client_name).unwrap_or_else(default_client_name),
            status: non_blank(self.status).unwrap_or_else(default_status),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentQueryParams {
    pub date: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `YYYY-MM-DD` form of a parseable date.
pub fn canonical_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .map(|d| d.format(DATE_FORMAT).to_string())
}

/// `HH:MM` form of a parseable time of day.
pub fn canonical_time(raw: &str) -> Option<String> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .ok()
        .map(|t| t.format(TIME_FORMAT).to_string())
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Slot {0} is already booked")]
    SlotAlreadyBooked(SlotKey),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
}
