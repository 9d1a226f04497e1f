//! Bounded waits for collaborator calls.

use std::future::Future;
use std::time::Duration;

/// Runs `fut` with a deadline, mapping expiry to an error of the caller's type.
///
/// `on_timeout` receives the deadline in whole seconds for error messages.
pub(crate) async fn with_deadline<T, E, F>(
    deadline: Duration,
    fut: F,
    on_timeout: impl FnOnce(u64) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(deadline.as_secs())),
    }
}
