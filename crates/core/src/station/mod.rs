mod conversions;
mod error;
mod types;

pub use conversions::{item_to_station, station_key, station_to_item, ID, LATITUDE, LONGITUDE, TAGS};
pub use error::{Result, StationError, STATION_NOT_FOUND};
pub use types::{Station, StationPatch};
