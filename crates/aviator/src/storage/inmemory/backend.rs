//! In-memory backend implementation.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use aviator_core::keys::{PK, SK};
use aviator_core::storage::{
    AttrValue, Condition, Item, Key, KvBackend, QueryInput, QueryPage, Result, StoreError,
    UpdateExpression, WriteRequest, VALIDATION,
};

/// In-memory single table.
///
/// Items are kept in a `BTreeMap` keyed by primary key, wrapped in
/// `Arc<RwLock<_>>` for shared access. Clones share the same table.
/// Data is not persisted and will be lost when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    items: Arc<RwLock<BTreeMap<Key, Item>>>,
    /// Requests accepted per batch write call; the rest come back unprocessed.
    batch_capacity: Option<usize>,
    failure: Arc<RwLock<Option<StoreError>>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            batch_capacity: None,
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Limits how many requests a batch write processes, like a throttled table.
    pub fn with_batch_capacity(mut self, capacity: usize) -> Self {
        self.batch_capacity = Some(capacity);
        self
    }

    /// Makes every following call fail with `error`, or succeed again with `None`.
    pub async fn set_failure(&self, error: Option<StoreError>) {
        *self.failure.write().await = error;
    }

    /// Number of items in the table.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn check_failure(&self) -> Result<()> {
        match self.failure.read().await.as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn key_of(item: &Item) -> Result<Key> {
    Key::from_item(item).ok_or_else(|| {
        StoreError::service(
            VALIDATION,
            "One or more parameter values were invalid: missing the key PK or SK",
        )
    })
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    item.get(name).and_then(AttrValue::as_s)
}

/// Position of an item in a query: its sort attribute, then its primary key.
type Position = (String, Key);

fn position(item: &Item, sort_attribute: &str) -> Option<Position> {
    let sort = string_attr(item, sort_attribute)?.to_string();
    Some((sort, Key::from_item(item)?))
}

/// Key attributes identifying where a page stopped.
fn last_evaluated_key(item: &Item, input: &QueryInput) -> Item {
    let mut key = Item::new();
    for attribute in [
        PK,
        SK,
        input.partition_attribute(),
        input.sort_attribute(),
    ] {
        if let Some(value) = item.get(attribute) {
            key.insert(attribute.to_string(), value.clone());
        }
    }
    key
}

#[async_trait]
impl KvBackend for InMemoryBackend {
    async fn put_item(&self, item: Item) -> Result<()> {
        self.check_failure().await?;
        let key = key_of(&item)?;
        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn get_item(&self, key: &Key) -> Result<Option<Item>> {
        self.check_failure().await?;
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn update_item(
        &self,
        key: &Key,
        update: &UpdateExpression,
        condition: Option<&Condition>,
    ) -> Result<()> {
        self.check_failure().await?;
        let mut items = self.items.write().await;

        let existing = items.get(key).cloned();
        if let Some(condition) = condition {
            let current = existing.clone().unwrap_or_default();
            if !condition.matches(&current) {
                return Err(StoreError::ConditionalCheckFailed);
            }
        }

        // Like DynamoDB, an update of a missing item creates it.
        let mut item = existing.unwrap_or_else(|| key.to_item());
        update.apply(&mut item)?;
        items.insert(key.clone(), item);
        Ok(())
    }

    async fn query(&self, input: &QueryInput) -> Result<QueryPage> {
        self.check_failure().await?;
        let items = self.items.read().await;

        let partition_attribute = input.partition_attribute();
        let sort_attribute = input.sort_attribute();

        let mut candidates = items
            .values()
            .filter(|item| string_attr(item, partition_attribute) == Some(input.partition.as_str()))
            .filter_map(|item| position(item, sort_attribute).map(|pos| (pos, item)))
            .filter(|((sort, _), _)| input.sort.as_ref().is_none_or(|c| c.matches(sort)))
            .collect::<Vec<_>>();
        candidates.sort_by(|(a, _), (b, _)| a.cmp(b));
        if !input.direction.is_forward() {
            candidates.reverse();
        }

        if let Some(start) = &input.exclusive_start_key {
            let start = position(start, sort_attribute).ok_or_else(|| {
                StoreError::service(VALIDATION, "The provided starting key is invalid")
            })?;
            candidates.retain(|(pos, _)| {
                if input.direction.is_forward() {
                    *pos > start
                } else {
                    *pos < start
                }
            });
        }

        // The limit caps the items evaluated, before the filter is applied.
        let limit = input
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        let truncated = candidates.len() > limit;
        candidates.truncate(limit);

        let last_evaluated_key = match candidates.last() {
            Some((_, item)) if truncated => Some(last_evaluated_key(item, input)),
            _ => None,
        };

        let items = candidates
            .into_iter()
            .map(|(_, item)| item)
            .filter(|item| input.filter.as_ref().is_none_or(|f| f.matches(item)))
            .cloned()
            .collect();

        Ok(QueryPage {
            items,
            last_evaluated_key,
        })
    }

    async fn delete_item(&self, key: &Key) -> Result<()> {
        self.check_failure().await?;
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn batch_write(&self, mut requests: Vec<WriteRequest>) -> Result<Vec<WriteRequest>> {
        self.check_failure().await?;

        // A malformed request rejects the whole batch before anything is written.
        let keys = requests
            .iter()
            .map(|request| match request {
                WriteRequest::Put(item) => key_of(item),
                WriteRequest::Delete(key) => Ok(key.clone()),
            })
            .collect::<Result<Vec<_>>>()?;

        let capacity = self.batch_capacity.unwrap_or(usize::MAX).min(requests.len());
        let unprocessed = requests.split_off(capacity);

        let mut items = self.items.write().await;
        for (key, request) in keys.into_iter().zip(requests) {
            match request {
                WriteRequest::Put(item) => {
                    items.insert(key, item);
                }
                WriteRequest::Delete(_) => {
                    items.remove(&key);
                }
            }
        }

        Ok(unprocessed)
    }

    async fn transact_write(&self, puts: Vec<Item>) -> Result<()> {
        self.check_failure().await?;

        let keys = puts.iter().map(key_of).collect::<Result<Vec<_>>>()?;
        if keys.iter().collect::<HashSet<_>>().len() != keys.len() {
            return Err(StoreError::service(
                VALIDATION,
                "Transaction request cannot include multiple operations on one item",
            ));
        }

        let mut items = self.items.write().await;
        for (key, item) in keys.into_iter().zip(puts) {
            items.insert(key, item);
        }
        Ok(())
    }
}
