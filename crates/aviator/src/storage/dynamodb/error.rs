//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `aviator_core::storage`, keeping
//! the error code DynamoDB reported so callers can classify it.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aviator_core::storage::StoreError;

/// Code used when the service did not report one.
const UNKNOWN_CODE: &str = "Unknown";

fn map_sdk_error<E, R>(
    err: SdkError<E, R>,
    operation: &'static str,
    is_conditional_check: impl Fn(&E) -> bool,
) -> StoreError
where
    E: ProvideErrorMetadata + Debug,
    R: Debug,
{
    match &err {
        SdkError::ServiceError(service_err) => {
            let e = service_err.err();
            if is_conditional_check(e) {
                return StoreError::ConditionalCheckFailed;
            }
            StoreError::service(
                e.code().unwrap_or(UNKNOWN_CODE),
                e.message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{operation} failed")),
            )
        }
        SdkError::TimeoutError(_) => {
            StoreError::ConnectionFailed(format!("{operation} timed out"))
        }
        SdkError::DispatchFailure(_) => {
            StoreError::ConnectionFailed(format!("{operation} could not reach DynamoDB: {err:?}"))
        }
        _ => StoreError::service(UNKNOWN_CODE, format!("{operation} failed: {err:?}")),
    }
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug>(err: SdkError<GetItemError, R>) -> StoreError {
    map_sdk_error(err, "GetItem", |_| false)
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug>(err: SdkError<PutItemError, R>) -> StoreError {
    map_sdk_error(err, "PutItem", |e| {
        matches!(e, PutItemError::ConditionalCheckFailedException(_))
    })
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug>(err: SdkError<UpdateItemError, R>) -> StoreError {
    map_sdk_error(err, "UpdateItem", |e| {
        matches!(e, UpdateItemError::ConditionalCheckFailedException(_))
    })
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug>(err: SdkError<QueryError, R>) -> StoreError {
    map_sdk_error(err, "Query", |_| false)
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug>(err: SdkError<DeleteItemError, R>) -> StoreError {
    map_sdk_error(err, "DeleteItem", |e| {
        matches!(e, DeleteItemError::ConditionalCheckFailedException(_))
    })
}

/// Map a BatchWriteItem SDK error to StoreError.
pub fn map_batch_write_error<R: Debug>(err: SdkError<BatchWriteItemError, R>) -> StoreError {
    map_sdk_error(err, "BatchWriteItem", |_| false)
}

/// Map a TransactWriteItems SDK error to StoreError.
///
/// A cancelled transaction keeps its `TransactionCanceledException` code.
pub fn map_transact_write_error<R: Debug>(
    err: SdkError<TransactWriteItemsError, R>,
) -> StoreError {
    map_sdk_error(err, "TransactWriteItems", |_| false)
}

/// Map a request builder error to StoreError.
pub fn map_build_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::InvalidData(format!("Invalid request: {err}"))
}
