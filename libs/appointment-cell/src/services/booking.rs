// libs/appointment-cell/src/services/booking.rs
use tracing::{debug, info, warn};

use shared_database::{SharedStore, SlotKey, StoreError};

use crate::models::{Appointment, AppointmentError, BookAppointmentRequest};

pub struct AppointmentBookingService {
    store: SharedStore,
}

impl AppointmentBookingService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Parses a raw request body and books it. Bodies that are not a JSON
    /// object fail with `MalformedInput` before any validation runs.
    pub async fn book_from_body(&self, body: &[u8]) -> Result<Appointment, AppointmentError> {
        let request = BookAppointmentRequest::from_body(body)?;
        self.book_appointment(request).await
    }

    /// Books a slot. The occupancy check and the write are one conditional
    /// put, so of two concurrent requests for the same (date, start_time)
    /// exactly one succeeds and the other gets `SlotAlreadyBooked`.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = request.validate()?;
        let slot = appointment.slot();

        info!(
            "Booking slot {} for barber {} ({} min)",
            slot, appointment.barber_id, appointment.duration
        );

        let record = appointment
            .to_record()
            .map_err(|e| AppointmentError::StoreError(StoreError::Serialization(e)))?;

        match self.store.put_if_absent(&slot, record).await {
            Ok(()) => {
                info!("Slot {} booked for barber {}", slot, appointment.barber_id);
                Ok(appointment)
            }
            Err(StoreError::Conflict(key)) => {
                warn!("Slot {} already booked, rejecting barber {}", key, appointment.barber_id);
                Err(AppointmentError::SlotAlreadyBooked(key))
            }
            Err(e) => Err(AppointmentError::StoreError(e)),
        }
    }

    /// Reads the appointment stored at a slot, if any.
    pub async fn get_appointment(&self, slot: &SlotKey) -> Result<Option<Appointment>, AppointmentError> {
        debug!("Fetching appointment at slot {}", slot);

        let Some(record) = self.store.get(slot).await? else {
            return Ok(None);
        };

        Appointment::from_record(record)
            .map(Some)
            .map_err(|e| AppointmentError::StoreError(StoreError::Serialization(e)))
    }
}
