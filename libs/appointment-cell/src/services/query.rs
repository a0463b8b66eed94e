// libs/appointment-cell/src/services/query.rs
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use shared_database::SharedStore;

use crate::models::{canonical_date, Appointment, AppointmentError, MISSING_DATE_MESSAGE};

/// Read-only listings over the record store.
pub struct AppointmentQueryService {
    store: SharedStore,
}

impl AppointmentQueryService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Appointments on one date, ordered by start time. A missing or blank
    /// date is a validation error; a date in a non-canonical but parseable
    /// form (`2025-3-1`) is matched against its canonical form.
    pub async fn list_by_date(&self, date: Option<&str>) -> Result<Vec<Appointment>, AppointmentError> {
        let date = date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppointmentError::ValidationError(MISSING_DATE_MESSAGE.to_string()))?;

        let date = canonical_date(date).unwrap_or_else(|| date.to_string());
        debug!("Querying appointments on {}", date);

        let records = self
            .store
            .query_by_attribute("date", &Value::String(date.clone()))
            .await?;

        let appointments = decode_sorted(records);
        debug!("Found {} appointments on {}", appointments.len(), date);
        Ok(appointments)
    }

    /// Every stored appointment, ordered by (date, start_time). Unpaginated.
    pub async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let records = self.store.scan_all().await?;
        let appointments = decode_sorted(records);
        debug!("Scanned {} appointments", appointments.len());
        Ok(appointments)
    }
}

// Records that no longer decode are logged and left out rather than failing
// the whole listing.
fn decode_sorted(records: Vec<Value>) -> Vec<Appointment> {
    let mut appointments: Vec<Appointment> = records
        .into_iter()
        .filter_map(|record| match Appointment::deserialize(&record) {
            Ok(appointment) => Some(appointment),
            Err(e) => {
                warn!("Skipping unreadable appointment record {}: {}", record, e);
                None
            }
        })
        .collect();

    appointments.sort_by(|a, b| (&a.date, &a.start_time).cmp(&(&b.date, &b.start_time)));
    appointments
}
