use async_trait::async_trait;

use super::condition::Condition;
use super::types::{Item, Key, QueryInput, QueryPage, WriteRequest};
use super::update::UpdateExpression;
use super::Result;

/// Most requests a single batch write may carry.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// A range-queryable key-value backend holding the single table.
///
/// Implementations execute exactly one backend call per method and report
/// failures as-is: no retries, no translation beyond converting the backend's
/// error into a [`StoreError`](super::StoreError).
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Writes an item, replacing any item with the same key.
    async fn put_item(&self, item: Item) -> Result<()>;

    /// Reads an item by key. A missing item is `Ok(None)`.
    async fn get_item(&self, key: &Key) -> Result<Option<Item>>;

    /// Applies a partial update, optionally guarded by a condition.
    ///
    /// A failed guard is reported as `StoreError::ConditionalCheckFailed`.
    async fn update_item(
        &self,
        key: &Key,
        update: &UpdateExpression,
        condition: Option<&Condition>,
    ) -> Result<()>;

    /// Runs a range query and returns one page.
    async fn query(&self, input: &QueryInput) -> Result<QueryPage>;

    /// Deletes an item by key. Deleting a missing key succeeds.
    async fn delete_item(&self, key: &Key) -> Result<()>;

    /// Writes a batch of puts and deletes without atomicity.
    ///
    /// Callers pass at most [`MAX_BATCH_WRITE_ITEMS`] requests.
    /// Returns the requests the backend left unprocessed.
    async fn batch_write(&self, requests: Vec<WriteRequest>) -> Result<Vec<WriteRequest>>;

    /// Writes all items or none.
    async fn transact_write(&self, items: Vec<Item>) -> Result<()>;
}
