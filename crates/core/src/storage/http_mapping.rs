//! Pure functions for mapping store errors to HTTP status codes.
//!
//! Backend failures are opaque to the domain services; the boundary layer uses
//! this mapping to pick a status without inspecting backend internals.

use super::error::{StoreError, ACCESS_DENIED, VALIDATION};

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `Service` with `AccessDeniedException` -> 401 (Unauthorized)
/// - `Service` with `ValidationException` -> 400 (Bad Request)
/// - `Service` with any other code -> 500 (Internal Server Error)
/// - `ConditionalCheckFailed` -> 409 (Conflict)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `Serialization` / `InvalidData` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use aviator_core::storage::{store_error_to_status_code, StoreError};
///
/// let error = StoreError::service("AccessDeniedException", "denied");
/// assert_eq!(store_error_to_status_code(&error), 401);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::Service { code, .. } if code == ACCESS_DENIED => 401,
        StoreError::Service { code, .. } if code == VALIDATION => 400,
        StoreError::Service { .. } => 500,
        StoreError::ConditionalCheckFailed => 409,
        StoreError::ConnectionFailed(_) => 503,
        StoreError::Serialization(_) => 500,
        StoreError::InvalidData(_) => 500,
    }
}
