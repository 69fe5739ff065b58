//! Route handlers organized by audience

pub mod admin;
pub mod assets;
pub mod health;
pub mod public;

use super::error::ApiError;

/// Run blocking store work off the async runtime.
pub(crate) async fn run_blocking<T, E, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(Into::into),
        Err(err) => Err(ApiError::Internal {
            message: format!("blocking task failed: {err}"),
        }),
    }
}
