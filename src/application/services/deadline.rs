use std::future::Future;
use std::time::Duration;

use crate::domain::DomainError;

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs one store operation under `limit`. On expiry the operation future is
/// dropped, which cancels the in-flight driver call.
pub(crate) async fn bounded<T, F>(limit: Duration, op: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "store operation timed out");
            Err(DomainError::DeadlineExceeded(limit))
        }
    }
}
