use thiserror::Error;

use crate::errors::{store_error_descriptor, ErrorDescriptor, ErrorResponse, Locale, Message};
use crate::storage::StoreError;

pub static STATION_NOT_FOUND: ErrorDescriptor = ErrorDescriptor {
    id: "station_not_found",
    message: Message {
        en: "The station does not exist",
        fr: "La station n'existe pas",
    },
    status: 404,
};

/// Errors raised by station and measurement operations.
#[derive(Debug, Error)]
pub enum StationError {
    #[error("Station not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StationError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn descriptor(&self) -> &'static ErrorDescriptor {
        match self {
            Self::NotFound { .. } => &STATION_NOT_FOUND,
            Self::Store(error) => store_error_descriptor(error),
        }
    }

    pub fn response(&self, locale: Locale) -> ErrorResponse {
        self.descriptor().response(locale)
    }
}

pub type Result<T> = std::result::Result<T, StationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_response() {
        let response = StationError::not_found("01HS").response(Locale::Fr);
        assert_eq!(response.id, "station_not_found");
        assert_eq!(response.message, "La station n'existe pas");
        assert_eq!(response.status, 404);
    }

    #[test]
    fn test_store_error_response() {
        let error = StationError::from(StoreError::ConditionalCheckFailed);
        assert_eq!(error.response(Locale::En).status, 409);
    }
}
