//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the
//! [`KvBackend`](aviator_core::storage::KvBackend) trait using `aws-sdk-dynamodb`.

mod backend;
mod conversions;
mod error;

pub use backend::DynamoDbBackend;
