//! Logging setup and the tracing-backed reservation observer.

use aviator_core::reservation::{ReservationEvent, ReservationObserver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "aviator=info,aviator_core=info";

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Records reservation lifecycle events as structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReservationObserver for TracingObserver {
    fn observe(&self, event: &ReservationEvent<'_>) {
        match event {
            ReservationEvent::ValidationFailed {
                tenant,
                operation,
                error,
            } => tracing::warn!(
                tenant = %tenant,
                operation = operation.as_str(),
                error_id = error.descriptor().id,
                "Reservation rejected"
            ),
            ReservationEvent::Created { tenant, id } => {
                tracing::info!(tenant = %tenant, reservation_id = %id, "Reservation created")
            }
            ReservationEvent::Replaced { tenant, id } => {
                tracing::info!(tenant = %tenant, reservation_id = %id, "Reservation updated")
            }
            ReservationEvent::Retrieved { tenant, id } => {
                tracing::debug!(tenant = %tenant, reservation_id = %id, "Reservation retrieved")
            }
            ReservationEvent::Listed {
                tenant,
                count,
                has_next_page,
            } => tracing::debug!(
                tenant = %tenant,
                count = *count,
                has_next_page = *has_next_page,
                "Reservations listed"
            ),
            ReservationEvent::Deleted { tenant, id } => {
                tracing::info!(tenant = %tenant, reservation_id = %id, "Reservation deleted")
            }
        }
    }
}
