//! Reservation item conversion functions.
//!
//! Pure functions for converting between stored items and [`Reservation`]s.
//! `CreatedAt`/`UpdatedAt` are stamped by the store and are not written here.

use super::types::{Reservation, TenantId};
use crate::keys::{self, CREATED_AT, ITEM_TYPE, ITEM_TYPE_RESERVATION, UPDATED_AT};
use crate::storage::{
    get_datetime, get_optional_datetime, get_optional_string, get_string, AttrValue, Item, Key,
    StoreError,
};
use crate::time::format_instant;

// ============================================================================
// Attribute names
// ============================================================================

pub const ID: &str = "Id";
pub const AIRCRAFT: &str = "Aircraft";
pub const RESERVATION_TYPE: &str = "ReservationType";
pub const PILOT: &str = "Pilot";
pub const INSTRUCTOR: &str = "Instructor";
pub const START_TIME: &str = "StartTime";
pub const END_TIME: &str = "EndTime";
pub const REMARKS: &str = "Remarks";

// ============================================================================
// Keys
// ============================================================================

/// Primary key of a reservation within its tenant partition.
pub fn reservation_key(tenant: &TenantId, reservation_id: &str) -> Key {
    Key::new(
        keys::tenant_pk(tenant.as_str()),
        keys::reservation_sk(reservation_id),
    )
}

// ============================================================================
// Conversions
// ============================================================================

/// Convert a Reservation to a stored item.
pub fn reservation_to_item(tenant: &TenantId, reservation: &Reservation) -> Item {
    let mut item = reservation_key(tenant, &reservation.id).to_item();

    // Item type
    item.insert(ITEM_TYPE.to_string(), AttrValue::from(ITEM_TYPE_RESERVATION));

    // Data
    item.insert(ID.to_string(), AttrValue::from(reservation.id.as_str()));
    item.insert(
        AIRCRAFT.to_string(),
        AttrValue::from(reservation.aircraft.as_str()),
    );
    item.insert(
        RESERVATION_TYPE.to_string(),
        AttrValue::from(reservation.reservation_type.as_str()),
    );
    item.insert(PILOT.to_string(), AttrValue::from(reservation.pilot.as_str()));
    if let Some(instructor) = &reservation.instructor {
        item.insert(INSTRUCTOR.to_string(), AttrValue::from(instructor.as_str()));
    }
    item.insert(
        START_TIME.to_string(),
        AttrValue::S(format_instant(reservation.start_time)),
    );
    item.insert(
        END_TIME.to_string(),
        AttrValue::S(format_instant(reservation.end_time)),
    );
    item.insert(
        REMARKS.to_string(),
        AttrValue::from(reservation.remarks.as_str()),
    );

    item
}

/// Convert a stored item to a Reservation.
pub fn item_to_reservation(item: &Item) -> Result<Reservation, StoreError> {
    Ok(Reservation {
        id: get_string(item, ID)?,
        aircraft: get_string(item, AIRCRAFT)?,
        reservation_type: get_string(item, RESERVATION_TYPE)?,
        pilot: get_string(item, PILOT)?,
        instructor: get_optional_string(item, INSTRUCTOR),
        start_time: get_datetime(item, START_TIME)?,
        end_time: get_datetime(item, END_TIME)?,
        remarks: get_optional_string(item, REMARKS).unwrap_or_default(),
        created_at: get_optional_datetime(item, CREATED_AT)?,
        updated_at: get_optional_datetime(item, UPDATED_AT)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{PK, SK};
    use crate::time::parse_timestamp;

    fn sample() -> Reservation {
        Reservation::new(
            "HB-KFQ",
            "school",
            "pilot-1",
            parse_timestamp("2024-06-15T08:00:00Z").unwrap(),
            parse_timestamp("2024-06-15T09:30:00Z").unwrap(),
        )
        .with_id("01H55420KY47HRVVPK1Z3BSACK")
        .with_remarks("Short flight to the Matterhorn")
    }

    #[test]
    fn test_reservation_key() {
        let key = reservation_key(&TenantId::new("01HR9ZZNRFCKMAYNW3RY561QCP"), "01H55420");
        assert_eq!(key.pk, "CLUB#01HR9ZZNRFCKMAYNW3RY561QCP");
        assert_eq!(key.sk, "RESERVATION#01H55420");
    }

    #[test]
    fn test_reservation_to_item() {
        let item = reservation_to_item(&TenantId::default(), &sample());

        assert_eq!(
            item.get(PK).and_then(AttrValue::as_s),
            Some("CLUB#01HR9ZZNRFCKMAYNW3RY561QCP")
        );
        assert_eq!(
            item.get(SK).and_then(AttrValue::as_s),
            Some("RESERVATION#01H55420KY47HRVVPK1Z3BSACK")
        );
        assert_eq!(
            item.get(ITEM_TYPE).and_then(AttrValue::as_s),
            Some("reservation")
        );
        assert_eq!(
            item.get(START_TIME).and_then(AttrValue::as_s),
            Some("2024-06-15T08:00:00Z")
        );
        assert!(!item.contains_key(INSTRUCTOR));
        assert!(!item.contains_key(CREATED_AT));
    }

    #[test]
    fn test_item_round_trip() {
        let reservation = sample().with_instructor("instructor-7");
        let mut item = reservation_to_item(&TenantId::default(), &reservation);
        item.insert(
            CREATED_AT.to_string(),
            AttrValue::from("2024-06-01T12:00:00.000Z"),
        );
        item.insert(
            UPDATED_AT.to_string(),
            AttrValue::from("2024-06-02T12:00:00.000Z"),
        );

        let restored = item_to_reservation(&item).unwrap();
        assert_eq!(restored.instructor.as_deref(), Some("instructor-7"));
        assert_eq!(
            restored.created_at,
            Some(parse_timestamp("2024-06-01T12:00:00Z").unwrap())
        );
        assert_eq!(
            Reservation {
                created_at: None,
                updated_at: None,
                ..restored
            },
            reservation
        );
    }

    #[test]
    fn test_item_without_timestamps() {
        let item = reservation_to_item(&TenantId::default(), &sample());
        let restored = item_to_reservation(&item).unwrap();
        assert_eq!(restored.created_at, None);
        assert_eq!(restored.updated_at, None);
    }

    #[test]
    fn test_item_missing_field() {
        let mut item = reservation_to_item(&TenantId::default(), &sample());
        item.remove(PILOT);
        assert!(matches!(
            item_to_reservation(&item),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_item_with_malformed_time() {
        let mut item = reservation_to_item(&TenantId::default(), &sample());
        item.insert(END_TIME.to_string(), AttrValue::from("tomorrow"));
        assert!(item_to_reservation(&item).is_err());
    }
}
