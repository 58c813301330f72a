use chrono::{DateTime, Utc};

use super::error::{ReservationError, CREATE_TIME_PAST, PAST_UPDATE, TIMES_EQUAL, TIMES_SWAPPED};
use super::types::Reservation;

/// Checks that a reservation covers a non-empty, correctly ordered slot.
///
/// # Examples
///
/// ```
/// use aviator_core::reservation::{validate_times, Reservation, TIMES_EQUAL};
/// use chrono::{Duration, Utc};
///
/// let start = Utc::now();
/// let reservation = Reservation::new("HB-KFQ", "private", "pilot-1", start, start);
/// let error = validate_times(&reservation).unwrap_err();
/// assert!(error.is_rule(&TIMES_EQUAL));
///
/// let reservation = Reservation::new("HB-KFQ", "private", "pilot-1", start, start + Duration::hours(1));
/// assert!(validate_times(&reservation).is_ok());
/// ```
pub fn validate_times(reservation: &Reservation) -> Result<(), ReservationError> {
    if reservation.start_time == reservation.end_time {
        return Err(ReservationError::Rule(&TIMES_EQUAL));
    }

    if reservation.end_time < reservation.start_time {
        return Err(ReservationError::Rule(&TIMES_SWAPPED));
    }

    Ok(())
}

/// Validates a reservation about to be created.
///
/// The slot must not start in the past.
pub fn validate_create(reservation: &Reservation, now: DateTime<Utc>) -> Result<(), ReservationError> {
    validate_times(reservation)?;

    if reservation.start_time < now {
        return Err(ReservationError::Rule(&CREATE_TIME_PAST));
    }

    Ok(())
}

/// Validates the replacement of a stored reservation.
///
/// Neither the stored slot nor the submitted one may already be over.
pub fn validate_replace(
    reservation: &Reservation,
    stored_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ReservationError> {
    validate_times(reservation)?;

    if stored_end < now || reservation.end_time < now {
        return Err(ReservationError::Rule(&PAST_UPDATE));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-06-15T08:00:00Z").unwrap()
    }

    fn slot(start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        Reservation::new("HB-KFQ", "private", "pilot-1", start, end)
    }

    #[test]
    fn test_times_equal() {
        let start = now() + Duration::hours(1);
        let error = validate_times(&slot(start, start)).unwrap_err();
        assert!(error.is_rule(&TIMES_EQUAL));
        assert_eq!(error.status(), 400);
    }

    #[test]
    fn test_times_swapped() {
        let start = now() + Duration::hours(2);
        let error = validate_times(&slot(start, start - Duration::minutes(30))).unwrap_err();
        assert!(error.is_rule(&TIMES_SWAPPED));
    }

    #[test]
    fn test_create_in_past() {
        let start = now() - Duration::minutes(1);
        let error = validate_create(&slot(start, now() + Duration::hours(1)), now()).unwrap_err();
        assert!(error.is_rule(&CREATE_TIME_PAST));
    }

    #[test]
    fn test_create_starting_now_is_allowed() {
        assert!(validate_create(&slot(now(), now() + Duration::hours(1)), now()).is_ok());
    }

    #[test]
    fn test_create_checks_times_first() {
        let start = now() - Duration::hours(1);
        let error = validate_create(&slot(start, start), now()).unwrap_err();
        assert!(error.is_rule(&TIMES_EQUAL));
    }

    #[test]
    fn test_replace_of_finished_reservation() {
        let stored_end = now() - Duration::days(1);
        let future = slot(now() + Duration::hours(1), now() + Duration::hours(2));
        let error = validate_replace(&future, stored_end, now()).unwrap_err();
        assert!(error.is_rule(&PAST_UPDATE));
    }

    #[test]
    fn test_replace_moving_end_into_past() {
        let stored_end = now() + Duration::hours(3);
        let past = slot(now() - Duration::hours(2), now() - Duration::hours(1));
        let error = validate_replace(&past, stored_end, now()).unwrap_err();
        assert!(error.is_rule(&PAST_UPDATE));
    }

    #[test]
    fn test_replace_of_ongoing_reservation() {
        let ongoing = slot(now() - Duration::minutes(30), now() + Duration::minutes(30));
        assert!(validate_replace(&ongoing, now() + Duration::minutes(30), now()).is_ok());
    }
}
