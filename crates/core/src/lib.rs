//! Functional core of the aviator reservation system.
//!
//! Pure types and functions: the backend-neutral store model, key-space
//! encoding, pagination cursors, item conversions and the reservation rules.
//! Nothing in this crate performs I/O.

pub mod cursor;
pub mod errors;
pub mod keys;
pub mod measurement;
pub mod reservation;
pub mod serde;
pub mod station;
pub mod storage;
pub mod time;
