//! Aviator: aircraft reservations, weather stations and measurements for
//! flying clubs, stored in a single DynamoDB table.
//!
//! The pure parts (key layout, conversions, validation, error table) live in
//! `aviator_core`. This crate holds the imperative shell: the store adapter,
//! the storage backends, the domain services and their configuration.

pub mod config;
pub mod services;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use services::{MeasurementService, PurgeReport, ReservationService, StationService};
pub use store::KvStore;
