//! Lifecycle events of the reservation service.
//!
//! The service reports what happened through a [`ReservationObserver`] instead
//! of logging inline; the shell decides how events are recorded.

use super::error::ReservationError;
use super::types::TenantId;

/// Operation an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Replace,
    Get,
    List,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Replace => "replace",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Delete => "delete",
        }
    }
}

/// Something that happened to a reservation.
#[derive(Debug)]
pub enum ReservationEvent<'a> {
    /// A business rule rejected the input.
    ValidationFailed {
        tenant: &'a TenantId,
        operation: Operation,
        error: &'a ReservationError,
    },
    Created {
        tenant: &'a TenantId,
        id: &'a str,
    },
    Replaced {
        tenant: &'a TenantId,
        id: &'a str,
    },
    Retrieved {
        tenant: &'a TenantId,
        id: &'a str,
    },
    Listed {
        tenant: &'a TenantId,
        count: usize,
        has_next_page: bool,
    },
    /// Emitted only after the store confirmed the delete.
    Deleted {
        tenant: &'a TenantId,
        id: &'a str,
    },
}

impl ReservationEvent<'_> {
    /// Short stable name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ReservationEvent::ValidationFailed { .. } => "validation_failed",
            ReservationEvent::Created { .. } => "created",
            ReservationEvent::Replaced { .. } => "replaced",
            ReservationEvent::Retrieved { .. } => "retrieved",
            ReservationEvent::Listed { .. } => "listed",
            ReservationEvent::Deleted { .. } => "deleted",
        }
    }

    pub fn tenant(&self) -> &TenantId {
        match self {
            ReservationEvent::ValidationFailed { tenant, .. }
            | ReservationEvent::Created { tenant, .. }
            | ReservationEvent::Replaced { tenant, .. }
            | ReservationEvent::Retrieved { tenant, .. }
            | ReservationEvent::Listed { tenant, .. }
            | ReservationEvent::Deleted { tenant, .. } => tenant,
        }
    }
}

/// Receives reservation lifecycle events.
pub trait ReservationObserver: Send + Sync {
    fn observe(&self, event: &ReservationEvent<'_>);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReservationObserver for NoopObserver {
    fn observe(&self, _event: &ReservationEvent<'_>) {}
}
