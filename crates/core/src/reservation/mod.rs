mod conversions;
mod error;
mod observer;
mod types;
mod validation;

pub use conversions::{
    item_to_reservation, reservation_key, reservation_to_item, AIRCRAFT, END_TIME, ID, INSTRUCTOR,
    PILOT, REMARKS, RESERVATION_TYPE, START_TIME,
};
pub use error::{
    ReservationError, Result, CREATE_TIME_PAST, PAST_UPDATE, RESERVATION_NOT_FOUND, TIMES_EQUAL,
    TIMES_SWAPPED,
};
pub use observer::{NoopObserver, Operation, ReservationEvent, ReservationObserver};
pub use types::{ListReservations, Reservation, ReservationPage, TenantId, DEFAULT_TENANT_ID};
pub use validation::{validate_create, validate_replace, validate_times};
