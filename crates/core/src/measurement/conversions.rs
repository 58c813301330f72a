//! Measurement item conversion functions.

use chrono::{DateTime, Utc};

use super::types::Measurement;
use crate::keys::{self, CREATED_AT, ITEM_TYPE, ITEM_TYPE_MEASUREMENT, UPDATED_AT};
use crate::storage::{
    get_datetime, get_i64, get_optional_datetime, get_string, AttrValue, Item, Key, StoreError,
};
use crate::time::format_timestamp;

// ============================================================================
// Attribute names
// ============================================================================

pub const STATION_ID: &str = "StationId";
pub const TEMPERATURE: &str = "Temperature";
pub const BAROMETER: &str = "Barometer";
pub const MEASURED_AT: &str = "MeasuredAt";

// ============================================================================
// Conversions
// ============================================================================

/// Primary key of a measurement inside its station's partition.
pub fn measurement_key(station_id: &str, measured_at: DateTime<Utc>) -> Key {
    Key::new(
        keys::measurement_pk(station_id),
        keys::measurement_sk(measured_at),
    )
}

/// Convert a Measurement to a stored item.
pub fn measurement_to_item(measurement: &Measurement) -> Item {
    let mut item = measurement_key(&measurement.station_id, measurement.measured_at).to_item();

    item.insert(ITEM_TYPE.to_string(), AttrValue::from(ITEM_TYPE_MEASUREMENT));

    // Data
    item.insert(
        STATION_ID.to_string(),
        AttrValue::from(measurement.station_id.as_str()),
    );
    item.insert(
        TEMPERATURE.to_string(),
        AttrValue::from(measurement.temperature),
    );
    item.insert(BAROMETER.to_string(), AttrValue::from(measurement.barometer));
    item.insert(
        MEASURED_AT.to_string(),
        AttrValue::S(format_timestamp(measurement.measured_at)),
    );

    item
}

/// Convert a stored item to a Measurement.
pub fn item_to_measurement(item: &Item) -> Result<Measurement, StoreError> {
    Ok(Measurement {
        station_id: get_string(item, STATION_ID)?,
        temperature: get_i64(item, TEMPERATURE)?,
        barometer: get_i64(item, BAROMETER)?,
        measured_at: get_datetime(item, MEASURED_AT)?,
        created_at: get_optional_datetime(item, CREATED_AT)?,
        updated_at: get_optional_datetime(item, UPDATED_AT)?,
    })
}
