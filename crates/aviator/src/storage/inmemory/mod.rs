//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of [`KvBackend`] that
//! keeps the whole table in a `BTreeMap` wrapped in `Arc<RwLock<_>>`. It
//! evaluates key conditions, filters, paging and conditional writes the way
//! DynamoDB does, which makes it suitable for service tests and local runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use aviator::storage::inmemory::InMemoryBackend;
//! use aviator::store::KvStore;
//!
//! let store = KvStore::new(InMemoryBackend::new());
//! // Use store for testing...
//! ```
//!
//! [`KvBackend`]: aviator_core::storage::KvBackend

mod backend;

pub use backend::InMemoryBackend;
