//! Single-table key generation functions.
//!
//! Pure functions for generating partition and sort keys following the single-table design.
//! All functions are sync and have no side effects.

use chrono::{DateTime, Utc};

use crate::time::format_timestamp;

// ============================================================================
// Attribute names
// ============================================================================

pub const PK: &str = "PK";
pub const SK: &str = "SK";
pub const GSI1PK: &str = "GSI1PK";
pub const GSI1SK: &str = "GSI1SK";
pub const ITEM_TYPE: &str = "ItemType";
pub const CREATED_AT: &str = "CreatedAt";
pub const UPDATED_AT: &str = "UpdatedAt";

// ============================================================================
// Key prefixes
// ============================================================================

pub const CLUB_PREFIX: &str = "CLUB";
pub const RESERVATION_PREFIX: &str = "RESERVATION";
pub const STATION_PREFIX: &str = "STATION";
pub const MEASUREMENT_PREFIX: &str = "MEASUREMENT";

// ============================================================================
// Item types
// ============================================================================

pub const ITEM_TYPE_RESERVATION: &str = "reservation";
pub const ITEM_TYPE_STATION: &str = "station";
pub const ITEM_TYPE_MEASUREMENT: &str = "measurement";

// ============================================================================
// Reservation keys
// ============================================================================

/// Generate the tenant partition key holding a club's reservations.
///
/// Pattern: `CLUB#<tenant_id>`
pub fn tenant_pk(tenant_id: &str) -> String {
    format!("{CLUB_PREFIX}#{tenant_id}")
}

/// Generate sort key for a Reservation.
///
/// Pattern: `RESERVATION#<reservation_id>`
pub fn reservation_sk(reservation_id: &str) -> String {
    format!("{RESERVATION_PREFIX}#{reservation_id}")
}

/// Sort key prefix matching every reservation of a tenant.
///
/// Ids are ULIDs, so a scan over this prefix is ordered by id (creation
/// order), not by flight time.
pub fn reservation_sk_prefix() -> &'static str {
    RESERVATION_PREFIX
}

// ============================================================================
// Station keys
// ============================================================================

/// Generate primary key for a Station.
///
/// Pattern: `STATION#<station_id>`
pub fn station_pk(station_id: &str) -> String {
    format!("{STATION_PREFIX}#{station_id}")
}

/// Generate sort key for a Station.
///
/// Pattern: `STATION#<station_id>` (same as PK for single-item queries)
pub fn station_sk(station_id: &str) -> String {
    format!("{STATION_PREFIX}#{station_id}")
}

/// Generate GSI1 partition key shared by all stations.
///
/// Pattern: `STATION`
pub fn station_gsi1_pk() -> &'static str {
    STATION_PREFIX
}

/// Generate GSI1 sort key for a Station.
///
/// Pattern: `STATION#<station_id>`
pub fn station_gsi1_sk(station_id: &str) -> String {
    format!("{STATION_PREFIX}#{station_id}")
}

/// GSI1 sort key prefix matching every station.
pub fn station_gsi1_sk_prefix() -> String {
    format!("{STATION_PREFIX}#")
}

// ============================================================================
// Measurement keys
// ============================================================================

/// Generate primary key for a Measurement: the owning station's partition.
///
/// Pattern: `STATION#<station_id>`
pub fn measurement_pk(station_id: &str) -> String {
    station_pk(station_id)
}

/// Generate sort key for a Measurement.
///
/// Pattern: `MEASUREMENT#<measured_at>`
///
/// The timestamp uses a fixed-width UTC format so lexical order is chronological.
pub fn measurement_sk(measured_at: DateTime<Utc>) -> String {
    format!("{MEASUREMENT_PREFIX}#{}", format_timestamp(measured_at))
}

/// Sort key prefix matching every measurement of a station.
pub fn measurement_sk_prefix() -> String {
    format!("{MEASUREMENT_PREFIX}#")
}

/// Smallest string sorting after every measurement sort key.
///
/// Used as the open upper end of a measurement range.
pub fn measurement_sk_range_end() -> String {
    format!("{MEASUREMENT_PREFIX}$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    #[test]
    fn test_tenant_pk() {
        assert_eq!(
            tenant_pk("01HR9ZZNRFCKMAYNW3RY561QCP"),
            "CLUB#01HR9ZZNRFCKMAYNW3RY561QCP"
        );
    }

    #[test]
    fn test_reservation_sk() {
        assert_eq!(
            reservation_sk("01H55420KY47HRVVPK1Z3BSACK"),
            "RESERVATION#01H55420KY47HRVVPK1Z3BSACK"
        );
        assert!(reservation_sk("x").starts_with(reservation_sk_prefix()));
    }

    #[test]
    fn test_station_keys() {
        assert_eq!(station_pk("01HS"), "STATION#01HS");
        assert_eq!(station_sk("01HS"), "STATION#01HS");
        assert_eq!(station_gsi1_pk(), "STATION");
        assert_eq!(station_gsi1_sk("01HS"), "STATION#01HS");
        assert!(station_gsi1_sk("01HS").starts_with(&station_gsi1_sk_prefix()));
    }

    #[test]
    fn test_measurement_keys() {
        let measured_at = parse_timestamp("2024-06-15T08:30:00Z").unwrap();
        assert_eq!(measurement_pk("01HS"), "STATION#01HS");
        assert_eq!(
            measurement_sk(measured_at),
            "MEASUREMENT#2024-06-15T08:30:00.000Z"
        );
        assert!(measurement_sk(measured_at).starts_with(&measurement_sk_prefix()));
    }

    #[test]
    fn test_measurement_sk_sorts_chronologically() {
        let earlier = parse_timestamp("2024-06-15T08:30:00Z").unwrap();
        let later = parse_timestamp("2024-06-15T10:05:00.5Z").unwrap();
        assert!(measurement_sk(earlier) < measurement_sk(later));
        assert!(measurement_sk(later) < measurement_sk_range_end());
        assert!(measurement_sk_prefix() < measurement_sk(earlier));
    }
}
