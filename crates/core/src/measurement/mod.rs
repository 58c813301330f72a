mod conversions;
mod types;

pub use conversions::{
    item_to_measurement, measurement_key, measurement_to_item, BAROMETER, MEASURED_AT, STATION_ID,
    TEMPERATURE,
};
pub use types::Measurement;
