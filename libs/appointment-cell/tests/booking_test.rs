use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;

use appointment_cell::*;
use shared_database::{RecordStore, SlotKey, StoreError};

mod common;
use common::{failing_store, memory_store, untouched_store};

fn request(barber_id: i64, date: &str, start_time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest::from_body(
        json!({ "barber_id": barber_id, "date": date, "start_time": start_time })
            .to_string()
            .as_bytes(),
    )
    .unwrap()
}

#[tokio::test]
async fn booking_a_free_slot_stores_it_with_defaults() {
    let (store, shared) = memory_store();
    let service = AppointmentBookingService::new(shared);

    let appointment = service
        .book_appointment(request(1, "2025-03-01", "09:00"))
        .await
        .expect("free slot should book");

    assert_eq!(appointment.barber_id, 1);
    assert_eq!(appointment.duration, DEFAULT_DURATION_MINUTES);
    assert_eq!(appointment.client_name, DEFAULT_CLIENT_NAME);
    assert_eq!(appointment.status, DEFAULT_STATUS);

    let stored = service
        .get_appointment(&SlotKey::new("2025-03-01", "09:00"))
        .await
        .unwrap()
        .expect("record should exist after booking");
    assert_eq!(stored, appointment);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn booking_an_occupied_slot_conflicts_and_leaves_the_store_alone() {
    let (store, shared) = memory_store();
    let service = AppointmentBookingService::new(shared);

    let first = service.book_appointment(request(1, "2025-03-01", "09:00")).await.unwrap();
    let second = service.book_appointment(request(1, "2025-03-01", "09:00")).await;

    assert_matches!(second, Err(AppointmentError::SlotAlreadyBooked(slot)) => {
        assert_eq!(slot, SlotKey::new("2025-03-01", "09:00"));
    });

    let stored = store.get(&first.slot()).await.unwrap().unwrap();
    assert_eq!(Appointment::from_record(stored).unwrap(), first);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn slot_is_global_across_barbers() {
    let (_, shared) = memory_store();
    let service = AppointmentBookingService::new(shared);

    service.book_appointment(request(1, "2025-03-01", "09:00")).await.unwrap();
    let other_barber = service.book_appointment(request(2, "2025-03-01", "09:00")).await;

    assert_matches!(other_barber, Err(AppointmentError::SlotAlreadyBooked(_)));
}

#[tokio::test]
async fn equivalent_time_spellings_hit_the_same_slot() {
    let (_, shared) = memory_store();
    let service = AppointmentBookingService::new(shared);

    service.book_appointment(request(1, "2025-03-01", "09:00")).await.unwrap();
    let respelled = service.book_appointment(request(2, "2025-3-1", "9:00")).await;

    assert_matches!(respelled, Err(AppointmentError::SlotAlreadyBooked(_)));
}

#[tokio::test]
async fn different_slots_do_not_interfere() {
    let (store, shared) = memory_store();
    let service = AppointmentBookingService::new(shared);

    service.book_appointment(request(1, "2025-03-01", "09:00")).await.unwrap();
    service.book_appointment(request(1, "2025-03-01", "09:40")).await.unwrap();
    service.book_appointment(request(1, "2025-03-02", "09:00")).await.unwrap();

    assert_eq!(store.len().await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_of_one_slot_admit_exactly_one() {
    let (store, shared) = memory_store();
    let service = Arc::new(AppointmentBookingService::new(shared));

    let attempts = (1..=2).map(|barber_id| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .book_appointment(request(barber_id, "2025-03-01", "09:00"))
                .await
        })
    });

    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("booking task panicked"))
        .collect();

    let booked = results.iter().filter(|r| r.is_ok()).count();
    let conflicted = results
        .iter()
        .filter(|r| matches!(r, Err(AppointmentError::SlotAlreadyBooked(_))))
        .count();

    assert_eq!(booked, 1);
    assert_eq!(conflicted, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_concurrent_bookings_still_admit_one() {
    let (store, shared) = memory_store();
    let service = Arc::new(AppointmentBookingService::new(shared));

    let attempts = (1..=32).map(|barber_id| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .book_appointment(request(barber_id, "2025-06-10", "15:20"))
                .await
        })
    });

    let booked = futures::future::join_all(attempts)
        .await
        .into_iter()
        .filter(|joined| matches!(joined, Ok(Ok(_))))
        .count();

    assert_eq!(booked, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn missing_required_fields_never_reach_the_store() {
    let service = AppointmentBookingService::new(untouched_store());

    for body in [
        json!({ "date": "2025-03-01", "start_time": "09:00" }),
        json!({ "barber_id": 1, "start_time": "09:00" }),
        json!({ "barber_id": 1, "date": "2025-03-01" }),
        json!({}),
    ] {
        let result = service.book_from_body(body.to_string().as_bytes()).await;
        assert_matches!(
            result,
            Err(AppointmentError::ValidationError(msg)) if msg == MISSING_FIELDS_MESSAGE
        );
    }
}

#[tokio::test]
async fn malformed_bodies_never_reach_the_store() {
    let service = AppointmentBookingService::new(untouched_store());

    let result = service.book_from_body(b"{\"barber_id\": 1, \"date\": ").await;
    assert_matches!(result, Err(AppointmentError::MalformedInput(_)));
}

#[tokio::test]
async fn store_failures_surface_as_store_errors() {
    let service = AppointmentBookingService::new(failing_store());

    let result = service.book_appointment(request(1, "2025-03-01", "09:00")).await;

    assert_matches!(
        result,
        Err(AppointmentError::StoreError(StoreError::Backend(msg))) if msg == "connection refused"
    );
}

#[tokio::test]
async fn get_appointment_on_an_empty_slot_is_none() {
    let (_, shared) = memory_store();
    let service = AppointmentBookingService::new(shared);

    let found = service
        .get_appointment(&SlotKey::new("2025-03-01", "09:00"))
        .await
        .unwrap();

    assert!(found.is_none());
}
