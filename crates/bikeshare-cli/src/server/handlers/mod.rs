//! API request handlers.

mod meta;
mod predict;
mod views;

pub use meta::*;
pub use predict::*;
pub use views::*;

use super::error::ApiError;

/// Run a dashboard call off the async workers; loads may block on I/O.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> bikeshare::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Task failed: {}", e)))?
        .map_err(ApiError::from)
}
