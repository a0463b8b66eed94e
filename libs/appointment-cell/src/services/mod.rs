pub mod booking;
pub mod query;

pub use booking::AppointmentBookingService;
pub use query::AppointmentQueryService;
