use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::deserialize_optional_string;

/// Tenant used when none is configured.
pub const DEFAULT_TENANT_ID: &str = "01HR9ZZNRFCKMAYNW3RY561QCP";

/// Identifier of the club owning a set of reservations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_ID)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A booking of an aircraft for a time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// ULID assigned on creation, e.g. `01H55420KY47HRVVPK1Z3BSACK`. Empty before.
    #[serde(default)]
    pub id: String,
    /// Reserved aircraft, e.g. `HB-KFQ`.
    pub aircraft: String,
    pub reservation_type: String,
    pub pilot: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub instructor: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Free text, e.g. "Short flight to the Matterhorn".
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Creates a new, not yet persisted reservation.
    pub fn new(
        aircraft: impl Into<String>,
        reservation_type: impl Into<String>,
        pilot: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            aircraft: aircraft.into(),
            reservation_type: reservation_type.into(),
            pilot: pilot.into(),
            instructor: None,
            start_time,
            end_time,
            remarks: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    /// Sets a specific ID for this reservation (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// True when the reservation has not been assigned an id yet.
    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }
}

/// Paging parameters of a reservation listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReservations {
    pub limit: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub next_token: Option<String>,
}

impl ListReservations {
    pub fn first_page(limit: Option<i32>) -> Self {
        Self {
            limit,
            next_token: None,
        }
    }

    pub fn after(limit: Option<i32>, next_token: impl Into<String>) -> Self {
        Self {
            limit,
            next_token: Some(next_token.into()),
        }
    }
}

/// One page of reservations. No `next_token` means the listing is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPage {
    pub next_token: Option<String>,
    pub results: Vec<Reservation>,
}
