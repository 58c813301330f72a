//! Reservation error types.

use thiserror::Error;

use crate::cursor::CursorError;
use crate::errors::{
    store_error_descriptor, ErrorDescriptor, ErrorResponse, Locale, Message, INVALID_NEXT_TOKEN,
};
use crate::storage::StoreError;

pub static TIMES_EQUAL: ErrorDescriptor = ErrorDescriptor {
    id: "reservation_times_equal",
    message: Message {
        en: "The start and end time must be different",
        fr: "Les heures de début et de fin doivent être différentes",
    },
    status: 400,
};

pub static TIMES_SWAPPED: ErrorDescriptor = ErrorDescriptor {
    id: "reservation_times_swapped",
    message: Message {
        en: "The start time of a reservation must be before the end time",
        fr: "L'heure de début d'une réservation doit être antérieure à l'heure de fin",
    },
    status: 400,
};

pub static CREATE_TIME_PAST: ErrorDescriptor = ErrorDescriptor {
    id: "reservation_create_time_in_past",
    message: Message {
        en: "The start or end time of a reservation cannot be in the past",
        fr: "L'heure de début ou de fin d'une réservation ne peut pas se situer dans le passé",
    },
    status: 400,
};

pub static PAST_UPDATE: ErrorDescriptor = ErrorDescriptor {
    id: "reservation_past_update",
    message: Message {
        en: "A reservation in the past cannot be updated",
        fr: "Une réservation dans le passé ne peut pas être mise à jour",
    },
    status: 400,
};

pub static RESERVATION_NOT_FOUND: ErrorDescriptor = ErrorDescriptor {
    id: "reservation_not_found",
    message: Message {
        en: "The reservation does not exist",
        fr: "La réservation n'existe pas",
    },
    status: 404,
};

/// Errors raised by reservation operations.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// A business rule rejected the input before anything was persisted.
    #[error("{}", .0.message.en)]
    Rule(&'static ErrorDescriptor),

    #[error("Reservation not found: {id}")]
    NotFound { id: String },

    #[error("Invalid next token: {0}")]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReservationError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// The table entry describing this error to clients.
    pub fn descriptor(&self) -> &'static ErrorDescriptor {
        match self {
            Self::Rule(descriptor) => descriptor,
            Self::NotFound { .. } => &RESERVATION_NOT_FOUND,
            Self::Cursor(_) => &INVALID_NEXT_TOKEN,
            Self::Store(error) => store_error_descriptor(error),
        }
    }

    pub fn status(&self) -> u16 {
        self.descriptor().status
    }

    pub fn response(&self, locale: Locale) -> ErrorResponse {
        self.descriptor().response(locale)
    }

    /// True when this is the given rule violation.
    pub fn is_rule(&self, descriptor: &'static ErrorDescriptor) -> bool {
        matches!(self, Self::Rule(d) if std::ptr::eq(*d, descriptor))
    }
}

/// Result type for reservation operations.
pub type Result<T> = std::result::Result<T, ReservationError>;
