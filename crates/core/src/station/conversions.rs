//! Station item conversion functions.

use super::types::Station;
use crate::keys::{self, CREATED_AT, GSI1PK, GSI1SK, ITEM_TYPE, ITEM_TYPE_STATION, UPDATED_AT};
use crate::storage::{
    get_optional_datetime, get_string, get_string_map, string_map_value, AttrValue, Item, Key, StoreError,
};

// ============================================================================
// Attribute names
// ============================================================================

pub const ID: &str = "Id";
pub const LONGITUDE: &str = "Longitude";
pub const LATITUDE: &str = "Latitude";
pub const TAGS: &str = "Tags";

// ============================================================================
// Conversions
// ============================================================================

/// Primary key of a station.
pub fn station_key(station_id: &str) -> Key {
    Key::new(keys::station_pk(station_id), keys::station_sk(station_id))
}

/// Convert a Station to a stored item, including its GSI1 listing keys.
///
/// `Tags` is always written, even empty, so tag updates can address its keys.
pub fn station_to_item(station: &Station) -> Item {
    let mut item = station_key(&station.id).to_item();

    // GSI1
    item.insert(GSI1PK.to_string(), AttrValue::from(keys::station_gsi1_pk()));
    item.insert(
        GSI1SK.to_string(),
        AttrValue::S(keys::station_gsi1_sk(&station.id)),
    );

    item.insert(ITEM_TYPE.to_string(), AttrValue::from(ITEM_TYPE_STATION));

    // Data
    item.insert(ID.to_string(), AttrValue::from(station.id.as_str()));
    item.insert(
        LONGITUDE.to_string(),
        AttrValue::from(station.longitude.as_str()),
    );
    item.insert(
        LATITUDE.to_string(),
        AttrValue::from(station.latitude.as_str()),
    );
    item.insert(TAGS.to_string(), string_map_value(&station.tags));

    item
}

/// Convert a stored item to a Station.
pub fn item_to_station(item: &Item) -> Result<Station, StoreError> {
    Ok(Station {
        id: get_string(item, ID)?,
        longitude: get_string(item, LONGITUDE)?,
        latitude: get_string(item, LATITUDE)?,
        tags: get_string_map(item, TAGS)?,
        created_at: get_optional_datetime(item, CREATED_AT)?,
        updated_at: get_optional_datetime(item, UPDATED_AT)?,
    })
}
