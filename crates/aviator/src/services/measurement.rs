//! Station measurement service.
//!
//! Measurements are stored in their station's partition, sorted by the
//! instant they were taken.

use std::collections::HashSet;

use aviator_core::keys::{
    measurement_pk, measurement_sk, measurement_sk_prefix, measurement_sk_range_end, ITEM_TYPE,
    ITEM_TYPE_MEASUREMENT,
};
use aviator_core::measurement::{item_to_measurement, measurement_to_item, Measurement};
use aviator_core::station::Result;
use aviator_core::storage::{Condition, Key, KvBackend, QueryInput, SortKeyCondition};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::KvStore;

/// Outcome of a purge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReport {
    /// Measurements removed.
    pub deleted: usize,
    /// Keys the backend did not get to; delete them again later.
    pub unprocessed: Vec<Key>,
}

pub struct MeasurementService<B> {
    store: KvStore<B>,
}

impl<B: KvBackend> MeasurementService<B> {
    pub fn new(store: KvStore<B>) -> Self {
        Self { store }
    }

    pub async fn record(&self, mut measurement: Measurement) -> Result<Measurement> {
        let timestamps = self.store.put(measurement_to_item(&measurement)).await?;
        measurement.created_at = Some(timestamps.created_at);
        measurement.updated_at = Some(timestamps.updated_at);

        tracing::debug!(
            station_id = %measurement.station_id,
            measured_at = %measurement.measured_at,
            "Measurement recorded"
        );
        Ok(measurement)
    }

    /// Records measurements in batches.
    ///
    /// Returns the measurements the backend left unprocessed. Writes are not
    /// atomic: everything else has been stored.
    pub async fn record_many(&self, measurements: Vec<Measurement>) -> Result<Vec<Measurement>> {
        let items = measurements.iter().map(measurement_to_item).collect();
        let unprocessed = self
            .store
            .batch_write(items)
            .await?
            .iter()
            .filter_map(Key::from_item)
            .collect::<HashSet<_>>();

        if !unprocessed.is_empty() {
            tracing::warn!(
                count = unprocessed.len(),
                "Measurements left unprocessed by batch write"
            );
        }

        Ok(measurements
            .into_iter()
            .filter(|m| {
                unprocessed.contains(&Key::new(
                    measurement_pk(&m.station_id),
                    measurement_sk(m.measured_at),
                ))
            })
            .collect())
    }

    /// Lists a station's measurements in chronological order.
    ///
    /// `from` and `to` are inclusive bounds; either may be left open.
    pub async fn list(
        &self,
        station_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Measurement>> {
        let range = match (from, to) {
            (None, None) => SortKeyCondition::BeginsWith(measurement_sk_prefix()),
            (from, to) => SortKeyCondition::Between(
                from.map(measurement_sk)
                    .unwrap_or_else(measurement_sk_prefix),
                to.map(measurement_sk)
                    .unwrap_or_else(measurement_sk_range_end),
            ),
        };
        let input = QueryInput::partition(measurement_pk(station_id)).sort(range);

        let measurements = self
            .store
            .query_all(&input)
            .await?
            .iter()
            .map(item_to_measurement)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(measurements)
    }

    /// Deletes every measurement of a station taken strictly before `before`.
    pub async fn purge(&self, station_id: &str, before: DateTime<Utc>) -> Result<PurgeReport> {
        let input = QueryInput::partition(measurement_pk(station_id))
            .sort(SortKeyCondition::LessThan(measurement_sk(before)))
            .filter(Condition::equals(ITEM_TYPE, ITEM_TYPE_MEASUREMENT));

        let keys = self
            .store
            .query_all(&input)
            .await?
            .iter()
            .filter_map(Key::from_item)
            .collect::<Vec<_>>();
        let found = keys.len();

        let unprocessed = self.store.batch_delete(keys).await?;
        let deleted = found - unprocessed.len();

        tracing::info!(
            station_id = %station_id,
            deleted,
            unprocessed = unprocessed.len(),
            "Measurements purged"
        );
        Ok(PurgeReport {
            deleted,
            unprocessed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aviator_core::station::Station;
    use aviator_core::time::{parse_timestamp, FixedClock};
    use chrono::Duration;

    use super::*;
    use crate::services::StationService;
    use crate::storage::inmemory::InMemoryBackend;

    const STATION: &str = "01HSZERMATT000000000000000";

    fn at(minutes: i64) -> DateTime<Utc> {
        parse_timestamp("2024-06-15T08:00:00Z").unwrap() + Duration::minutes(minutes)
    }

    fn service_on(backend: InMemoryBackend) -> MeasurementService<InMemoryBackend> {
        let store = KvStore::with_clock(backend, Arc::new(FixedClock::new(at(120))));
        MeasurementService::new(store)
    }

    fn service() -> MeasurementService<InMemoryBackend> {
        service_on(InMemoryBackend::new())
    }

    fn reading(minutes: i64) -> Measurement {
        Measurement::new(STATION, 10 + minutes, 1013, at(minutes))
    }

    fn times(measurements: &[Measurement]) -> Vec<DateTime<Utc>> {
        measurements.iter().map(|m| m.measured_at).collect()
    }

    #[tokio::test]
    async fn test_record_and_list() {
        let service = service();

        let recorded = service.record(reading(0)).await.unwrap();
        assert_eq!(recorded.created_at, Some(at(120)));

        let listed = service.list(STATION, None, None).await.unwrap();
        assert_eq!(listed, vec![recorded]);
    }

    #[tokio::test]
    async fn test_list_is_chronological_and_bounded() {
        let service = service();
        for minutes in [30, 0, 50, 10, 20, 40] {
            service.record(reading(minutes)).await.unwrap();
        }

        let all = service.list(STATION, None, None).await.unwrap();
        assert_eq!(
            times(&all),
            vec![at(0), at(10), at(20), at(30), at(40), at(50)]
        );

        let window = service
            .list(STATION, Some(at(10)), Some(at(30)))
            .await
            .unwrap();
        assert_eq!(times(&window), vec![at(10), at(20), at(30)]);

        let since = service.list(STATION, Some(at(40)), None).await.unwrap();
        assert_eq!(times(&since), vec![at(40), at(50)]);

        let until = service.list(STATION, None, Some(at(5))).await.unwrap();
        assert_eq!(times(&until), vec![at(0)]);
    }

    #[tokio::test]
    async fn test_list_excludes_the_station_item() {
        let backend = InMemoryBackend::new();
        let store = KvStore::new(backend.clone());
        let station = StationService::new(store)
            .create(Station::new("7.7491", "46.0207"), None)
            .await
            .unwrap();

        let service = service_on(backend);
        service
            .record(Measurement::new(station.id.clone(), 4, 1002, at(0)))
            .await
            .unwrap();

        let listed = service.list(&station.id, None, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(service.purge(&station.id, at(500)).await.is_ok());
    }

    #[tokio::test]
    async fn test_record_many_across_batches() {
        let service = service();
        let readings = (0..40).map(reading).collect::<Vec<_>>();

        let unprocessed = service.record_many(readings).await.unwrap();

        assert!(unprocessed.is_empty());
        assert_eq!(service.list(STATION, None, None).await.unwrap().len(), 40);
    }

    #[tokio::test]
    async fn test_record_many_reports_unprocessed() {
        let service = service_on(InMemoryBackend::new().with_batch_capacity(20));
        let readings = (0..30).map(reading).collect::<Vec<_>>();

        let unprocessed = service.record_many(readings).await.unwrap();

        // Two chunks of 25 and 5; the first leaves 5 behind.
        assert_eq!(unprocessed.len(), 5);
        let stored = service.list(STATION, None, None).await.unwrap();
        assert_eq!(stored.len(), 25);
        for measurement in &unprocessed {
            assert!(!times(&stored).contains(&measurement.measured_at));
        }
    }

    #[tokio::test]
    async fn test_purge_removes_strictly_older_measurements() {
        let service = service();
        for minutes in 0..6 {
            service.record(reading(minutes * 10)).await.unwrap();
        }

        let report = service.purge(STATION, at(30)).await.unwrap();

        assert_eq!(report.deleted, 3);
        assert!(report.unprocessed.is_empty());
        let left = service.list(STATION, None, None).await.unwrap();
        assert_eq!(times(&left), vec![at(30), at(40), at(50)]);
    }

    #[tokio::test]
    async fn test_purge_of_empty_station() {
        let report = service().purge(STATION, at(0)).await.unwrap();
        assert_eq!(report.deleted, 0);
    }
}
