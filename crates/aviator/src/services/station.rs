//! Weather station service.
//!
//! Stations live in their own partition and are listed through the GSI1 index.

use aviator_core::keys::{station_gsi1_pk, station_gsi1_sk_prefix, PK};
use aviator_core::measurement::{measurement_to_item, Measurement};
use aviator_core::station::{
    item_to_station, station_key, station_to_item, Result, Station, StationError, StationPatch,
};
use aviator_core::storage::{
    Condition, Index, KvBackend, QueryInput, SortKeyCondition, StoreError,
};
use ulid::Ulid;

use crate::store::KvStore;

pub struct StationService<B> {
    store: KvStore<B>,
}

impl<B: KvBackend> StationService<B> {
    pub fn new(store: KvStore<B>) -> Self {
        Self { store }
    }

    /// Registers a station under a new id.
    ///
    /// When an initial measurement is given, both are written in one
    /// transaction and the measurement is attached to the new station.
    pub async fn create(
        &self,
        mut station: Station,
        initial: Option<Measurement>,
    ) -> Result<Station> {
        station.id = Ulid::new().to_string();

        let timestamps = match initial {
            Some(mut measurement) => {
                measurement.station_id = station.id.clone();
                self.store
                    .transact_write(vec![
                        station_to_item(&station),
                        measurement_to_item(&measurement),
                    ])
                    .await?
            }
            None => self.store.put(station_to_item(&station)).await?,
        };

        station.created_at = Some(timestamps.created_at);
        station.updated_at = Some(timestamps.updated_at);

        tracing::info!(station_id = %station.id, "Station created");
        Ok(station)
    }

    pub async fn get(&self, id: &str) -> Result<Station> {
        let item = self
            .store
            .get(&station_key(id))
            .await?
            .ok_or_else(|| StationError::not_found(id))?;
        Ok(item_to_station(&item)?)
    }

    /// Lists every station, following all result pages.
    pub async fn list(&self) -> Result<Vec<Station>> {
        let input = QueryInput::on_index(Index::Gsi1, station_gsi1_pk())
            .sort(SortKeyCondition::BeginsWith(station_gsi1_sk_prefix()));

        let items = self.store.query_all(&input).await?;
        let stations = items
            .iter()
            .map(item_to_station)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(count = stations.len(), "Stations listed");
        Ok(stations)
    }

    /// Applies a partial update to an existing station and returns it.
    ///
    /// Tags not named by the patch keep their value.
    pub async fn update(&self, id: &str, patch: &StationPatch) -> Result<Station> {
        let key = station_key(id);
        let condition = Condition::exists(PK);

        match self
            .store
            .update(&key, &patch.to_field_patch(), false, Some(&condition))
            .await
        {
            Ok(_) => {}
            Err(StoreError::ConditionalCheckFailed) => return Err(StationError::not_found(id)),
            Err(error) => return Err(error.into()),
        }

        tracing::info!(station_id = %id, "Station updated");
        self.get(id).await
    }
}
