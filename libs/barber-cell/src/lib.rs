pub mod handlers;
pub mod models;
pub mod router;

pub use models::{roster, Barber};
pub use router::barber_routes;
