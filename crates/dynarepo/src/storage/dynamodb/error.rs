//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `dynarepo_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use dynarepo_core::storage::RepositoryError;

/// Requests that never produced a response.
fn map_transport_error<E, R>(err: &SdkError<E, R>, operation: &str) -> Option<RepositoryError> {
    match err {
        SdkError::TimeoutError(_) => Some(RepositoryError::ConnectionFailed(format!(
            "{operation} timed out"
        ))),
        SdkError::DispatchFailure(failure) => Some(RepositoryError::ConnectionFailed(format!(
            "{operation} could not be dispatched: {failure:?}"
        ))),
        _ => None,
    }
}

fn throttled() -> RepositoryError {
    RepositoryError::Throttled("Throughput exceeded, please retry".to_string())
}

fn request_limit() -> RepositoryError {
    RepositoryError::Throttled("Request limit exceeded, please retry".to_string())
}

fn internal_server_error() -> RepositoryError {
    RepositoryError::QueryFailed("DynamoDB internal server error".to_string())
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, "GetItem") {
        return mapped;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            RepositoryError::TableNotFound(table.to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => throttled(),
        GetItemError::RequestLimitExceeded(_) => request_limit(),
        GetItemError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::QueryFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, "PutItem") {
        return mapped;
    }
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            RepositoryError::TableNotFound(table.to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => throttled(),
        PutItemError::RequestLimitExceeded(_) => request_limit(),
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            RepositoryError::Throttled("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::QueryFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, "DeleteItem") {
        return mapped;
    }
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => {
            RepositoryError::TableNotFound(table.to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => throttled(),
        DeleteItemError::RequestLimitExceeded(_) => request_limit(),
        DeleteItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            RepositoryError::Throttled("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::QueryFailed(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, "Query") {
        return mapped;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => RepositoryError::TableNotFound(table.to_string()),
        QueryError::ProvisionedThroughputExceededException(_) => throttled(),
        QueryError::RequestLimitExceeded(_) => request_limit(),
        QueryError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::QueryFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(mapped) = map_transport_error(&err, "Scan") {
        return mapped;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => RepositoryError::TableNotFound(table.to_string()),
        ScanError::ProvisionedThroughputExceededException(_) => throttled(),
        ScanError::RequestLimitExceeded(_) => request_limit(),
        ScanError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::QueryFailed(format!("Scan failed: {:?}", err)),
    }
}
