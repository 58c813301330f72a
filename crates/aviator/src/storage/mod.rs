//! Storage backend implementations.
//!
//! This module provides concrete implementations of the
//! [`KvBackend`](aviator_core::storage::KvBackend) trait. The in-memory
//! backend is always available; the DynamoDB backend is selected at compile
//! time via the `dynamodb` feature flag (on by default).
//!
//! # Examples
//!
//! Build without DynamoDB (library and tests only):
//! ```bash
//! cargo build -p aviator --no-default-features
//! ```

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbBackend;

pub use inmemory::InMemoryBackend;
