use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reading taken by a station at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub station_id: String,
    /// Degrees Celsius.
    pub temperature: i64,
    /// Hectopascal.
    pub barometer: i64,
    pub measured_at: DateTime<Utc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Measurement {
    pub fn new(
        station_id: impl Into<String>,
        temperature: i64,
        barometer: i64,
        measured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            temperature,
            barometer,
            measured_at,
            created_at: None,
            updated_at: None,
        }
    }
}
