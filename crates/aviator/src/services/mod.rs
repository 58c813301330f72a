//! Domain services.
//!
//! Each service owns a [`KvStore`](crate::store::KvStore) over any
//! [`KvBackend`](aviator_core::storage::KvBackend) and maps domain values to
//! stored items through the conversions in `aviator_core`.

mod measurement;
mod reservation;
mod station;

pub use measurement::{MeasurementService, PurgeReport};
pub use reservation::ReservationService;
pub use station::StationService;
