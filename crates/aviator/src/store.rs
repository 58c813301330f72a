//! Key-value store adapter.
//!
//! [`KvStore`] wraps a [`KvBackend`] and owns the write conventions of the
//! single table: every write stamps `CreatedAt`/`UpdatedAt` with the current
//! instant at millisecond precision, batch writes are chunked to the backend
//! limit and unprocessed requests are handed back, never retried. Backend
//! errors are returned unchanged.

use std::sync::Arc;

use aviator_core::keys::{CREATED_AT, UPDATED_AT};
use aviator_core::storage::{
    build_update_expression, AttrValue, Condition, FieldPatch, Item, Key, KvBackend, QueryInput,
    QueryPage, Result, Timestamps, WriteRequest, MAX_BATCH_WRITE_ITEMS,
};
use aviator_core::time::{format_timestamp, truncate_to_millis, Clock, SystemClock};
use chrono::{DateTime, Utc};

/// Single-table store on top of a backend.
#[derive(Clone)]
pub struct KvStore<B> {
    backend: B,
    clock: Arc<dyn Clock>,
}

impl<B: KvBackend> KvStore<B> {
    /// Creates a store using the wall clock.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    /// Creates a store reading time from the given clock.
    pub fn with_clock(backend: B, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current instant, truncated to the precision timestamps are stored with.
    pub fn now(&self) -> DateTime<Utc> {
        truncate_to_millis(self.clock.now())
    }

    /// Current instant at full clock precision, for comparisons against
    /// caller-supplied times.
    pub fn instant(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Writes an item, replacing any previous version, and stamps both timestamps.
    pub async fn put(&self, item: Item) -> Result<Timestamps> {
        let timestamps = Timestamps::fresh(self.now());
        let item = stamp(item, &timestamps);
        tracing::trace!(key = ?Key::from_item(&item), "Put item");

        self.backend.put_item(item).await?;
        Ok(timestamps)
    }

    /// Writes a full replacement of an item, keeping its creation time.
    pub async fn replace(&self, item: Item, created_at: DateTime<Utc>) -> Result<Timestamps> {
        let timestamps = Timestamps {
            created_at,
            updated_at: self.now(),
        };
        let item = stamp(item, &timestamps);
        tracing::trace!(key = ?Key::from_item(&item), "Replace item");

        self.backend.put_item(item).await?;
        Ok(timestamps)
    }

    /// Reads an item. A miss is `Ok(None)`.
    pub async fn get(&self, key: &Key) -> Result<Option<Item>> {
        self.backend.get_item(key).await
    }

    /// Applies a partial update and returns the new `UpdatedAt`.
    ///
    /// Absent patch fields are left untouched unless `clear_absent` is set.
    pub async fn update(
        &self,
        key: &Key,
        patch: &FieldPatch,
        clear_absent: bool,
        condition: Option<&Condition>,
    ) -> Result<DateTime<Utc>> {
        let update = build_update_expression(patch, clear_absent, self.now());
        tracing::trace!(pk = %key.pk, sk = %key.sk, actions = update.actions.len(), "Update item");

        self.backend.update_item(key, &update, condition).await?;
        Ok(update.updated_at)
    }

    /// Runs one page of a range query.
    pub async fn query(&self, input: &QueryInput) -> Result<QueryPage> {
        self.backend.query(input).await
    }

    /// Runs a range query to the end, following every continuation key.
    pub async fn query_all(&self, input: &QueryInput) -> Result<Vec<Item>> {
        let mut input = input.clone();
        let mut items = Vec::new();

        loop {
            let page = self.backend.query(&input).await?;
            items.extend(page.items);

            match page.last_evaluated_key {
                Some(key) if !key.is_empty() => input.exclusive_start_key = Some(key),
                _ => return Ok(items),
            }
        }
    }

    /// Deletes an item. Deleting a missing key succeeds.
    pub async fn delete(&self, key: &Key) -> Result<()> {
        tracing::trace!(pk = %key.pk, sk = %key.sk, "Delete item");
        self.backend.delete_item(key).await
    }

    /// Writes items without atomicity and returns the ones left unprocessed.
    pub async fn batch_write(&self, items: Vec<Item>) -> Result<Vec<Item>> {
        let timestamps = Timestamps::fresh(self.now());
        let requests = items
            .into_iter()
            .map(|item| WriteRequest::Put(stamp(item, &timestamps)))
            .collect();

        let unprocessed = self.batch(requests).await?;
        Ok(unprocessed
            .into_iter()
            .filter_map(|request| match request {
                WriteRequest::Put(item) => Some(item),
                WriteRequest::Delete(_) => None,
            })
            .collect())
    }

    /// Deletes keys without atomicity and returns the ones left unprocessed.
    pub async fn batch_delete(&self, keys: Vec<Key>) -> Result<Vec<Key>> {
        let requests = keys.into_iter().map(WriteRequest::Delete).collect();

        let unprocessed = self.batch(requests).await?;
        Ok(unprocessed
            .into_iter()
            .filter_map(|request| match request {
                WriteRequest::Delete(key) => Some(key),
                WriteRequest::Put(_) => None,
            })
            .collect())
    }

    /// Writes all items or none. Every item gets the same timestamps.
    pub async fn transact_write(&self, items: Vec<Item>) -> Result<Timestamps> {
        let timestamps = Timestamps::fresh(self.now());
        let items = items
            .into_iter()
            .map(|item| stamp(item, &timestamps))
            .collect::<Vec<_>>();
        tracing::trace!(count = items.len(), "Transact write items");

        self.backend.transact_write(items).await?;
        Ok(timestamps)
    }

    async fn batch(&self, mut requests: Vec<WriteRequest>) -> Result<Vec<WriteRequest>> {
        let mut unprocessed = Vec::new();

        while !requests.is_empty() {
            let rest = requests.split_off(requests.len().min(MAX_BATCH_WRITE_ITEMS));
            let chunk = std::mem::replace(&mut requests, rest);
            tracing::trace!(count = chunk.len(), "Batch write chunk");

            unprocessed.extend(self.backend.batch_write(chunk).await?);
        }

        if !unprocessed.is_empty() {
            tracing::debug!(count = unprocessed.len(), "Batch write left items unprocessed");
        }

        Ok(unprocessed)
    }
}

fn stamp(mut item: Item, timestamps: &Timestamps) -> Item {
    item.insert(
        CREATED_AT.to_string(),
        AttrValue::S(format_timestamp(timestamps.created_at)),
    );
    item.insert(
        UPDATED_AT.to_string(),
        AttrValue::S(format_timestamp(timestamps.updated_at)),
    );
    item
}
