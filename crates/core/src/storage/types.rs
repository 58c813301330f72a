use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::condition::{Condition, SortKeyCondition};
use crate::keys::{GSI1PK, GSI1SK, PK, SK};

/// A stored item: attribute name to attribute value.
pub type Item = HashMap<String, AttrValue>;

/// A backend-neutral attribute value.
///
/// Mirrors the subset of DynamoDB attribute types the application stores.
/// Numbers keep their decimal string representation, as DynamoDB does.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    S(String),
    N(String),
    Bool(bool),
    Null,
    L(Vec<AttrValue>),
    M(HashMap<String, AttrValue>),
}

impl AttrValue {
    /// Returns the string value if this is a string attribute.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the decimal representation if this is a number attribute.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttrValue::N(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a boolean attribute.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested map if this is a map attribute.
    pub fn as_m(&self) -> Option<&HashMap<String, AttrValue>> {
        match self {
            AttrValue::M(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::S(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::S(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::N(value.to_string())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::N(value.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// Composite primary key of an item in the single table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
}

impl Key {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }

    /// Converts the key into an item holding only the `PK`/`SK` attributes.
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(PK.to_string(), AttrValue::S(self.pk.clone()));
        item.insert(SK.to_string(), AttrValue::S(self.sk.clone()));
        item
    }

    /// Extracts the primary key from an item, if both attributes are strings.
    pub fn from_item(item: &Item) -> Option<Self> {
        let pk = item.get(PK)?.as_s()?;
        let sk = item.get(SK)?.as_s()?;
        Some(Self::new(pk, sk))
    }
}

/// Creation and update instants stamped by the store on a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Timestamps of a first write: both instants are the same.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }
}

/// Secondary indexes projected from base items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// Lists items by entity type (`GSI1PK` / `GSI1SK`).
    Gsi1,
}

impl Index {
    pub fn name(&self) -> &'static str {
        match self {
            Index::Gsi1 => "GSI1",
        }
    }

    pub fn partition_attribute(&self) -> &'static str {
        match self {
            Index::Gsi1 => GSI1PK,
        }
    }

    pub fn sort_attribute(&self) -> &'static str {
        match self {
            Index::Gsi1 => GSI1SK,
        }
    }
}

/// Order in which a query walks the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanDirection {
    #[default]
    Forward,
    Backward,
}

impl ScanDirection {
    pub fn is_forward(&self) -> bool {
        matches!(self, ScanDirection::Forward)
    }
}

/// A range query against the table or one of its indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryInput {
    pub index: Option<Index>,
    /// Value the partition attribute must equal.
    pub partition: String,
    pub sort: Option<SortKeyCondition>,
    pub filter: Option<Condition>,
    pub limit: Option<i32>,
    pub exclusive_start_key: Option<Item>,
    pub direction: ScanDirection,
}

impl QueryInput {
    /// Queries the base table partition `PK = partition`.
    pub fn partition(partition: impl Into<String>) -> Self {
        Self {
            index: None,
            partition: partition.into(),
            sort: None,
            filter: None,
            limit: None,
            exclusive_start_key: None,
            direction: ScanDirection::Forward,
        }
    }

    /// Queries an index partition.
    pub fn on_index(index: Index, partition: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            ..Self::partition(partition)
        }
    }

    pub fn sort(mut self, condition: SortKeyCondition) -> Self {
        self.sort = Some(condition);
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    pub fn limit(mut self, limit: Option<i32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn start_after(mut self, key: Option<Item>) -> Self {
        self.exclusive_start_key = key;
        self
    }

    pub fn direction(mut self, direction: ScanDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Name of the attribute the partition condition applies to.
    pub fn partition_attribute(&self) -> &'static str {
        self.index.map_or(PK, |index| index.partition_attribute())
    }

    /// Name of the attribute the sort condition applies to.
    pub fn sort_attribute(&self) -> &'static str {
        self.index.map_or(SK, |index| index.sort_attribute())
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryPage {
    pub items: Vec<Item>,
    /// Present when the backend stopped before the end of the range.
    pub last_evaluated_key: Option<Item>,
}

/// One element of a batch write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    Put(Item),
    Delete(Key),
}
